//! JSON text encoding for FSRS records.
//!
//! Cards, review logs and schedulers already carry their record shape through
//! serde; this crate turns those records into text and back. The compact
//! layout puts `", "` between items and `": "` after keys, the same text
//! Python's `json.dumps` produces for these records.

use fsrs_core::{Card, ReviewLog, Scheduler};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod layout;

pub use layout::Layout;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoded json is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("expected a json object, got {0}")]
    NotAnObject(&'static str),
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Records that can be written to and read from JSON.
pub trait JsonRecord: Serialize + DeserializeOwned {
    fn to_json(&self, layout: Layout) -> Result<String, JsonError> {
        layout::write(self, layout)
    }

    fn from_json(text: &str) -> Result<Self, JsonError> {
        let value = serde_json::from_str(text)?;
        tracing::trace!(len = text.len(), "decoded json record");
        Ok(value)
    }

    /// Key-value form of the record.
    fn to_value(&self) -> Result<Map<String, Value>, JsonError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(JsonError::NotAnObject(kind(&other))),
        }
    }

    fn from_value(map: Map<String, Value>) -> Result<Self, JsonError> {
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

impl JsonRecord for Card {}
impl JsonRecord for ReviewLog {}
impl JsonRecord for Scheduler {}

pub fn logs_to_json(logs: &[ReviewLog], layout: Layout) -> Result<String, JsonError> {
    layout::write(logs, layout)
}

pub fn logs_from_json(text: &str) -> Result<Vec<ReviewLog>, JsonError> {
    let logs: Vec<ReviewLog> = serde_json::from_str(text)?;
    tracing::trace!(count = logs.len(), "decoded review logs");
    Ok(logs)
}
