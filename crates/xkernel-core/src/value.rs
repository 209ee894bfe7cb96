//! JSON-safe values.
//!
//! Metadata, witnesses, claims, verdict details and receipts are all
//! dynamically shaped. They are modelled as a closed enum so that anything
//! the canonical encoder cannot reproduce exactly (floats above all) is
//! unrepresentable instead of being checked at hashing time.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A string-keyed mapping of JSON-safe values, held in key order.
pub type Map = BTreeMap<String, Value>;

/// A JSON-safe value: null, boolean, integer, string, or nested
/// sequences/mappings of those. No floating point.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Seq(Vec<Value>),
    Map(Map),
}

impl Value {
    /// An empty mapping.
    pub fn empty_map() -> Self {
        Value::Map(Map::new())
    }

    /// A sequence of integers.
    pub fn ints(xs: &[i64]) -> Self {
        Value::Seq(xs.iter().copied().map(Value::Int).collect())
    }

    /// Build a mapping from key/value pairs. Later duplicates win.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Convert a `serde_json::Value`, naming offending locations relative to `path`.
    pub fn from_json_at(value: serde_json::Value, path: &str) -> Result<Self, CoreError> {
        Ok(match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match json_integer(&n) {
                Some(i) => Value::Int(i),
                None => {
                    let text = n.to_string();
                    let found = if is_integer_literal(&text) {
                        format!("integer out of range ({text})")
                    } else {
                        format!("float ({text})")
                    };
                    return Err(CoreError::NonJsonSafe {
                        path: path.to_string(),
                        found,
                    });
                }
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::Seq(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| Value::from_json_at(v, &format!("{path}[{i}]")))
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| {
                        let child = format!("{path}.{k}");
                        Value::from_json_at(v, &child).map(|v| (k, v))
                    })
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::Seq(_) => "list",
            Value::Map(_) => "dict",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable access to a mapping.
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up `key` if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Interpret as a list of integers. `None` if any element is not an integer.
    pub fn as_int_list(&self) -> Option<Vec<i64>> {
        self.as_seq()?.iter().map(Value::as_i64).collect()
    }
}

fn is_integer_literal(text: &str) -> bool {
    !text.contains(['.', 'e', 'E'])
}

/// Read a JSON number as an integer, judged by its literal text.
///
/// A literal without fraction or exponent that fits `i64` is an integer, so
/// `-0` reads as `0` while `1.0` and `1e3` are refused. Relies on
/// serde_json's `arbitrary_precision` feature to keep the original text.
pub fn json_integer(n: &serde_json::Number) -> Option<i64> {
    let text = n.to_string();
    if !is_integer_literal(&text) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Seq(items) => f.debug_list().entries(items).finish(),
            Value::Map(m) => f.debug_map().entries(m).finish(),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CoreError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Value::from_json_at(value, "$")
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Seq(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(m) => {
                serde_json::Value::Object(m.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

/// Saturates at `i64::MAX`.
impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
