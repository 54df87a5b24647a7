use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One dataset entry. Field order is the order the fields were read in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn set_text(&mut self, field: &str, text: String) {
        self.data.insert(field.to_string(), Value::String(text));
    }
}

impl From<Map<String, Value>> for Record {
    fn from(data: Map<String, Value>) -> Self {
        Self::new(data)
    }
}

/// Ordered field allow-list. Empty means every field is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedFields {
    fields: Vec<String>,
}

impl AcceptedFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Self { fields: unique }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn allows(&self, field: &str) -> bool {
        self.is_unrestricted() || self.fields.iter().any(|f| f == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Back-reference from a flattened text to the record field it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub record_index: usize,
    pub field_name: String,
}

impl Position {
    pub fn new(record_index: usize, field_name: impl Into<String>) -> Self {
        Self {
            record_index,
            field_name: field_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub index: usize,
    pub texts: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// What the router returned for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationResult {
    Sequence(Vec<String>),
    Scalar(String),
}

impl TranslationResult {
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(texts) => texts.len(),
            Self::Scalar(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_texts(self) -> Vec<String> {
        match self {
            Self::Sequence(texts) => texts,
            Self::Scalar(text) => vec![text],
        }
    }

    /// Resolves a raw router response body.
    pub fn from_response(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items.into_iter().map(value_to_text).collect()),
            Value::String(text) => Self::Scalar(text),
            Value::Object(mut obj) if obj.contains_key("response") => {
                Self::from_response(obj.remove("response").unwrap_or(Value::Null))
            }
            other => Self::Scalar(other.to_string()),
        }
    }
}

/// Strings keep their raw content, everything else becomes compact JSON text.
pub fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Outcome of one transform phase.
#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub serialized_records: Vec<String>,
    pub stats: RunStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records: usize,
    pub texts: usize,
    pub batches: usize,
}
