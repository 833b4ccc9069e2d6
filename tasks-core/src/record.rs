use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// The partition key attribute. Identity lives here and nowhere else.
pub const PK: &str = "pk";

/// A stored task: the partition key plus an open set of JSON fields.
/// Field values are opaque to this crate; nested structures are stored
/// and returned as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub pk: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Validate a request body into a record. The body must be a JSON
    /// object carrying a non-empty string `pk`.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(Error::validation("Request body must be a JSON object"));
        };
        let pk = match fields.remove(PK) {
            Some(Value::String(pk)) if !pk.is_empty() => pk,
            Some(_) => return Err(Error::validation("pk must be a non-empty string")),
            None => return Err(Error::validation("Missing required field: pk")),
        };
        Ok(Record { pk, fields })
    }
}

/// A sparse set of field assignments for a merge update. Construction
/// enforces the update invariants: at least one field, no `pk`, no empty
/// field names. A `Patch` in hand is always safe to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(Error::validation("Request body must be a JSON object"));
        };
        if fields.is_empty() {
            return Err(Error::validation(
                "Request body must contain at least one field to update",
            ));
        }
        if fields.contains_key(PK) {
            return Err(Error::validation("pk is immutable and cannot be updated"));
        }
        if fields.keys().any(|name| name.is_empty()) {
            return Err(Error::validation("Field names must be non-empty"));
        }
        Ok(Patch(fields))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
