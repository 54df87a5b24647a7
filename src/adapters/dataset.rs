use crate::domain::model::Record;
use crate::domain::ports::{DatasetType, Storage};
use crate::utils::error::{Result, TranslateError};
use serde_json::Value;
use std::path::Path;

pub fn infer_dataset_type(path: &str) -> Result<DatasetType> {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(DatasetType::Json),
        Some("jsonl") => Ok(DatasetType::Jsonl),
        Some(other) => Err(TranslateError::UnrecognizedFormat {
            path: path.to_string(),
            reason: format!("cannot infer dataset type from extension '.{}'", other),
        }),
        None => Err(TranslateError::UnrecognizedFormat {
            path: path.to_string(),
            reason: "file has no extension".to_string(),
        }),
    }
}

/// Reads JSON-array and JSON-Lines dataset files into records.
pub struct DatasetLoader<S: Storage> {
    storage: S,
    dataset_type: Option<DatasetType>,
}

impl<S: Storage> DatasetLoader<S> {
    pub fn new(storage: S, dataset_type: Option<DatasetType>) -> Self {
        Self {
            storage,
            dataset_type,
        }
    }

    /// Loads every path in order and concatenates the records.
    pub async fn load_all(&self, paths: &[String]) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for path in paths {
            let loaded = self.load(path).await?;
            tracing::info!("Loaded {} records from {}", loaded.len(), path);
            records.extend(loaded);
        }
        Ok(records)
    }

    pub async fn load(&self, path: &str) -> Result<Vec<Record>> {
        let dataset_type = match self.dataset_type {
            Some(explicit) => explicit,
            None => infer_dataset_type(path)?,
        };

        let bytes = self.storage.read_file(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| TranslateError::Dataset {
            path: path.to_string(),
            message: format!("file is not valid UTF-8: {}", e),
        })?;

        match dataset_type {
            DatasetType::Json => parse_json_array(path, &content),
            DatasetType::Jsonl => parse_json_lines(path, &content),
        }
    }
}

pub fn parse_json_array(path: &str, content: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(content).map_err(|e| TranslateError::Dataset {
        path: path.to_string(),
        message: format!("invalid JSON: {}", e),
    })?;

    let Value::Array(items) = value else {
        return Err(TranslateError::Dataset {
            path: path.to_string(),
            message: "expected a top-level JSON array of records".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| into_record(item).ok_or_else(|| not_an_object(path, &format!("entry {}", i))))
        .collect()
}

pub fn parse_json_lines(path: &str, content: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line).map_err(|e| TranslateError::Dataset {
            path: path.to_string(),
            message: format!("line {}: invalid JSON: {}", line_no + 1, e),
        })?;
        let record = into_record(value)
            .ok_or_else(|| not_an_object(path, &format!("line {}", line_no + 1)))?;
        records.push(record);
    }
    Ok(records)
}

fn into_record(value: Value) -> Option<Record> {
    match value {
        Value::Object(obj) => Some(Record::new(obj)),
        _ => None,
    }
}

fn not_an_object(path: &str, location: &str) -> TranslateError {
    TranslateError::Dataset {
        path: path.to_string(),
        message: format!("{} is not a JSON object", location),
    }
}
