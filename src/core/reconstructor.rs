use crate::domain::model::{AcceptedFields, Position, Record};
use crate::utils::error::{Result, TranslateError};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::io;

/// Writes translated texts back into their records and serializes each record.
///
/// `positions` and `translated` must pair up one to one; a length difference
/// is reported instead of truncated. Only allow-listed fields are serialized
/// (all of them when the allow-list is empty), in the record's field order.
pub fn reconstruct(
    records: &mut [Record],
    positions: &[Position],
    translated: Vec<String>,
    accepted_fields: &AcceptedFields,
) -> Result<Vec<String>> {
    if positions.len() != translated.len() {
        return Err(TranslateError::ReconstructionMismatch {
            expected: positions.len(),
            actual: translated.len(),
        });
    }

    let total_records = records.len();
    for (position, text) in positions.iter().zip(translated) {
        let record = records.get_mut(position.record_index).ok_or(
            TranslateError::PositionOutOfRange {
                record_index: position.record_index,
                records: total_records,
            },
        )?;
        record.set_text(&position.field_name, text);
    }

    records
        .iter()
        .map(|record| serialize_record(record, accepted_fields))
        .collect()
}

pub fn serialize_record(record: &Record, accepted_fields: &AcceptedFields) -> Result<String> {
    let kept: Map<String, Value> = record
        .data
        .iter()
        .filter(|(field, _)| accepted_fields.allows(field))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();

    to_spaced_json(&Value::Object(kept))
}

/// `{"a": 1, "b": [1, 2]}` style output; non-ASCII text is written as is.
pub fn to_spaced_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
