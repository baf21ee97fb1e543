//! Client record and its JSON shape.
//!
//! # Design
//! A client is a store-assigned `id` plus an open set of business attributes
//! (name, contact info, ...). The attributes are kept as a flat map of scalar
//! values and serialized next to `id`, so `{"id":1,"name":"Acme"}` is both the
//! wire format and what the store round-trips. Nested arrays or objects fail
//! to deserialize, which is the only structural check performed on input.
//!
//! Numbers are kept as their original JSON text (serde_json
//! `arbitrary_precision`), so `12345678901234567890123` or `1.50` come back
//! exactly as they were sent. Scalars are read through `serde_json::Value`
//! because that keeps the number text intact across flatten buffering.

use std::collections::BTreeMap;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Store-assigned client identifier.
pub type ClientId = i64;

/// Business attributes of a client, keyed by attribute name.
pub type ClientFields = BTreeMap<String, FieldValue>;

/// Key that never appears inside `ClientFields`.
pub const ID_FIELD: &str = "id";

/// A single scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(FieldValue::Null),
            Value::Bool(b) => Some(FieldValue::Bool(b)),
            Value::Number(n) => Some(FieldValue::Number(n)),
            Value::String(s) => Some(FieldValue::Text(s)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FieldValue::from_json(Value::deserialize(deserializer)?)
            .ok_or_else(|| D::Error::custom("expected null, a boolean, a number or a string"))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

/// A stored client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(flatten)]
    pub fields: ClientFields,
}

#[derive(Debug, Error)]
#[error("field {name:?} must be null, a boolean, a number or a string")]
pub struct NestedFieldError {
    pub name: String,
}

/// Payload for creating or replacing a client.
///
/// An `id` key in the incoming JSON is dropped whatever its value: ids come
/// from the store on create and from the request path on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ClientDraft {
    #[serde(flatten)]
    pub fields: ClientFields,
}

impl TryFrom<Map<String, Value>> for ClientDraft {
    type Error = NestedFieldError;

    fn try_from(mut raw: Map<String, Value>) -> Result<Self, Self::Error> {
        raw.remove(ID_FIELD);
        let fields = raw
            .into_iter()
            .map(|(name, value)| match FieldValue::from_json(value) {
                Some(value) => Ok((name, value)),
                None => Err(NestedFieldError { name }),
            })
            .collect::<Result<ClientFields, _>>()?;
        Ok(Self { fields })
    }
}

impl ClientDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and seeding. `id` is ignored.
    pub fn field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        if name != ID_FIELD {
            self.fields.insert(name.to_string(), value.into());
        }
        self
    }
}
