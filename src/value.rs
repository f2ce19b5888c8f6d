use serde_json::{Map, Number, Value};

use crate::dirty::{DirtyList, DirtyMap};

/// An attribute value.
///
/// Wire JSON becomes this sum type at the deserialization boundary; nested
/// arrays and objects are wrapped in dirty-tracking containers so mutating a
/// nested collection is recorded like any other write.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(DirtyList<AttrValue>),
    Object(DirtyMap<String, AttrValue>),
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&DirtyList<AttrValue>> {
        match self {
            AttrValue::Array(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DirtyMap<String, AttrValue>> {
        match self {
            AttrValue::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => AttrValue::Number(n),
            Value::String(s) => AttrValue::String(s),
            Value::Array(items) => AttrValue::Array(DirtyList::from_data(
                items.into_iter().map(AttrValue::from).collect(),
            )),
            Value::Object(entries) => AttrValue::Object(DirtyMap::from_data(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, AttrValue::from(v)))
                    .collect(),
            )),
        }
    }
}

impl From<&Value> for AttrValue {
    fn from(value: &Value) -> Self {
        AttrValue::from(value.clone())
    }
}

impl From<&AttrValue> for Value {
    fn from(value: &AttrValue) -> Self {
        match value {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Number(n) => Value::Number(n.clone()),
            AttrValue::String(s) => Value::String(s.clone()),
            AttrValue::Array(list) => {
                Value::Array(list.iter().map(Value::from).collect())
            }
            AttrValue::Object(map) => {
                // serde_json's map keeps keys sorted, which also makes the
                // serialized form deterministic.
                let mut entries = Map::new();
                for (k, v) in map.iter() {
                    entries.insert(k.clone(), Value::from(v));
                }
                Value::Object(entries)
            }
        }
    }
}

impl From<AttrValue> for Value {
    fn from(value: AttrValue) -> Self {
        Value::from(&value)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n.into())
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Number(n.into())
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(AttrValue::Null, AttrValue::Number)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl<T> From<Option<T>> for AttrValue
where
    T: Into<AttrValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}
