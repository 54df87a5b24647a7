use crate::domain::model::{value_to_text, AcceptedFields, Position, Record};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedTexts {
    pub texts: Vec<String>,
    pub positions: Vec<Position>,
}

impl FlattenedTexts {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn push(&mut self, record_index: usize, field: &str, text: String) {
        self.texts.push(text);
        self.positions.push(Position::new(record_index, field));
    }
}

/// Pulls translatable texts out of records in record order, then field order.
///
/// With an explicit allow-list every listed field that is present is taken
/// (non-string values as compact JSON). An empty allow-list takes every
/// string-valued field in the record's own order and leaves the rest alone.
pub fn flatten(records: &[Record], accepted_fields: &AcceptedFields) -> FlattenedTexts {
    let mut flat = FlattenedTexts::default();

    for (record_index, record) in records.iter().enumerate() {
        if accepted_fields.is_unrestricted() {
            for (field, value) in &record.data {
                if let Value::String(text) = value {
                    flat.push(record_index, field, text.clone());
                }
            }
            continue;
        }

        for field in accepted_fields.iter() {
            if let Some(value) = record.get(field) {
                flat.push(record_index, field, value_to_text(value.clone()));
            }
        }
    }

    tracing::debug!(
        "Flattened {} texts from {} records",
        flat.len(),
        records.len()
    );
    flat
}
