//! JSON interop for [`Value`], enabled by the `serde` feature.
//!
//! Serialization goes through [`Value::to_json`] so both paths agree: sets and
//! typed arrays become JSON arrays, maps become arrays of `[key, value]`
//! pairs, non-finite floats become `null`, and lazy sequences and reducers
//! (which have no data to show) become `null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Value;

impl Value {
    /// Converts the value into a `serde_json::Value`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null | Self::Iterator(_) | Self::AsyncIterator(_) | Self::Reducer(_) => {
                serde_json::Value::Null
            }
            Self::Bool(flag) => serde_json::Value::Bool(*flag),
            Self::Int(number) => serde_json::Value::Number((*number).into()),
            Self::Float(number) => serde_json::Number::from_f64(*number)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(text) => serde_json::Value::String(text.clone()),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Set(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Binary(array) => serde_json::Value::Array(
                array.to_values().iter().map(Self::to_json).collect(),
            ),
            Self::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Self::Map(entries) => serde_json::Value::Array(
                entries
                    .iter()
                    .map(|(key, value)| serde_json::Value::Array(vec![key.to_json(), value.to_json()]))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float))
                .unwrap_or_else(|| Self::String(number.to_string())),
            serde_json::Value::String(text) => Self::String(text),
            serde_json::Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}
