//! Persisted note format codec.
//!
//! Wire shape: a JSON array with one object per segment, tagged by `type`.
//! `null` decodes to an empty document.

use crate::document::DocumentBuffer;
use crate::model::record::{SegmentRecord, KNOWN_SEGMENT_TYPES};
use crate::model::table::check_dimension;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Encoding/decoding errors for the persisted note format.
#[derive(Debug)]
pub enum PersistError {
    /// Text is not valid JSON, or encoding failed.
    Json(serde_json::Error),
    /// Top-level value is not an array (or `null`).
    NotAnArray(&'static str),
    /// A record with a known type tag has malformed fields.
    InvalidRecord {
        index: usize,
        kind: String,
        message: String,
    },
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid note JSON: {err}"),
            Self::NotAnArray(found) => {
                write!(f, "note content must be a JSON array, found {found}")
            }
            Self::InvalidRecord {
                index,
                kind,
                message,
            } => write!(f, "invalid `{kind}` record at index {index}: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Encodes records as the persisted JSON array.
pub fn encode_records(records: &[SegmentRecord]) -> PersistResult<Value> {
    Ok(serde_json::to_value(records)?)
}

/// Serializes a document (live object state) to the persisted JSON array.
pub fn encode_document(document: &DocumentBuffer) -> PersistResult<Value> {
    encode_records(&document.serialize())
}

/// Pretty-printed file text for records.
pub fn records_to_string(records: &[SegmentRecord]) -> PersistResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Decodes the persisted JSON array into typed records.
///
/// Elements that are not objects, lack a string `type`, or carry an unknown
/// `type` are skipped. Missing optional fields take record defaults.
///
/// # Errors
/// - `NotAnArray` when the top-level value is neither an array nor `null`.
/// - `InvalidRecord` when a known record has fields of the wrong shape, or a
///   table larger than `MAX_TABLE_DIMENSION` in either direction.
pub fn decode_records(value: &Value) -> PersistResult<Vec<SegmentRecord>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => return Err(PersistError::NotAnArray(json_type_name(other))),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for (index, item) in items.iter().enumerate() {
        let kind = match item.get("type").and_then(Value::as_str) {
            Some(kind) if KNOWN_SEGMENT_TYPES.contains(&kind) => kind,
            Some(_) => {
                skipped += 1;
                debug!("event=record_skip module=persist status=skip index={index} reason=unknown_type");
                continue;
            }
            None => {
                skipped += 1;
                debug!("event=record_skip module=persist status=skip index={index} reason=untyped");
                continue;
            }
        };

        let invalid = |message: String| PersistError::InvalidRecord {
            index,
            kind: kind.to_string(),
            message,
        };
        let record = SegmentRecord::deserialize(item).map_err(|err| invalid(err.to_string()))?;
        if let SegmentRecord::Table(table) = &record {
            check_dimension(table.rows, "rows")
                .and_then(|()| check_dimension(table.cols, "columns"))
                .map_err(|err| invalid(err.to_string()))?;
        }
        records.push(record);
    }

    if skipped > 0 {
        info!(
            "event=records_decode module=persist status=ok records={} skipped={}",
            records.len(),
            skipped
        );
    }
    Ok(records)
}

/// Parses file text and decodes it into typed records.
pub fn records_from_str(raw: &str) -> PersistResult<Vec<SegmentRecord>> {
    let value: Value = serde_json::from_str(raw)?;
    decode_records(&value)
}

/// Builds a fresh document from the persisted JSON array.
pub fn decode_document(value: &Value) -> PersistResult<DocumentBuffer> {
    decode_records(value).map(DocumentBuffer::from_records)
}

/// Replaces `document` content with the persisted JSON array.
///
/// `document` is untouched when decoding fails.
pub fn load_into(document: &mut DocumentBuffer, value: &Value) -> PersistResult<()> {
    let records = decode_records(value)?;
    document.deserialize(records);
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
