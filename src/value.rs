use std::ops::Index;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::num::canonical_f64;

/// Top-level result of a parse: bare field name to value, in first-seen order.
pub type FormMap = IndexMap<String, FormValue>;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum FormValue {
    /// An unfilled sequence slot.
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Sequence(Vec<FormValue>),
    Mapping(FormMap),
}

impl FormValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, FormValue::Null)
    }

    pub const fn is_container(&self) -> bool {
        matches!(self, FormValue::Sequence(_) | FormValue::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FormValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FormValue::Integer(value) => Some(*value as f64),
            FormValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<FormValue>> {
        match self {
            FormValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&FormMap> {
        match self {
            FormValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        match self {
            FormValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    pub fn take(&mut self) -> FormValue {
        std::mem::take(self)
    }

    /// Scalar rendering used for flat transports. Containers have none.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FormValue::Null => Some(String::new()),
            FormValue::Text(text) => Some(text.clone()),
            FormValue::Integer(value) => Some(crate::num::canonical_i64(*value)),
            FormValue::Float(value) => Some(canonical_f64(*value)),
            FormValue::Sequence(_) | FormValue::Mapping(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FormValue::Null => "null",
            FormValue::Text(_) => "text",
            FormValue::Integer(_) => "integer",
            FormValue::Float(_) => "float",
            FormValue::Sequence(_) => "sequence",
            FormValue::Mapping(_) => "mapping",
        }
    }
}

impl Index<usize> for FormValue {
    type Output = FormValue;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            FormValue::Sequence(items) => items.get(index).unwrap_or_else(|| {
                panic!(
                    "index {index} out of bounds for sequence of length {}",
                    items.len()
                )
            }),
            _ => panic!(
                "cannot index into non-sequence value of type {}",
                self.type_name()
            ),
        }
    }
}

impl Index<&str> for FormValue {
    type Output = FormValue;

    fn index(&self, key: &str) -> &Self::Output {
        match self {
            FormValue::Mapping(map) => map
                .get(key)
                .unwrap_or_else(|| panic!("key {key:?} not found in mapping")),
            _ => panic!(
                "cannot index into non-mapping value of type {}",
                self.type_name()
            ),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Integer(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Float(value)
    }
}

impl From<Vec<FormValue>> for FormValue {
    fn from(items: Vec<FormValue>) -> Self {
        FormValue::Sequence(items)
    }
}

impl From<FormMap> for FormValue {
    fn from(map: FormMap) -> Self {
        FormValue::Mapping(map)
    }
}

impl From<FormValue> for serde_json::Value {
    fn from(value: FormValue) -> Self {
        match value {
            FormValue::Null => serde_json::Value::Null,
            FormValue::Text(text) => serde_json::Value::String(text),
            FormValue::Integer(value) => serde_json::Value::Number(value.into()),
            FormValue::Float(value) => serde_json::Number::from_f64(value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FormValue::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            FormValue::Mapping(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<&FormValue> for serde_json::Value {
    fn from(value: &FormValue) -> Self {
        value.clone().into()
    }
}

impl Serialize for FormValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormValue::Null => serializer.serialize_unit(),
            FormValue::Text(text) => serializer.serialize_str(text),
            FormValue::Integer(value) => serializer.serialize_i64(*value),
            FormValue::Float(value) => serializer.serialize_f64(*value),
            FormValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FormValue::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

/// Converts a whole result into a JSON object.
pub fn to_value(map: &FormMap) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), value.into()))
            .collect(),
    )
}
