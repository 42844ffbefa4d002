//! Untyped, order-preserving values for manifest metadata and install descriptors.
//!
//! Callers hand over arbitrary nested metadata; [`DescriptorValue`] keeps the
//! type of every scalar and the order of every mapping so the renderer can
//! reproduce it exactly.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// Key the `toml` deserializer uses to smuggle datetimes through serde.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// A scalar, sequence or string-keyed mapping.
///
/// An empty list and an empty map are the same PHP `array ()` and compare
/// equal.
#[derive(Debug, Clone)]
pub enum DescriptorValue {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered sequence
    List(Vec<DescriptorValue>),
    /// Insertion-ordered mapping
    Map(DescriptorMap),
}

impl DescriptorValue {
    /// Returns the string if this is a [`DescriptorValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DescriptorValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the mapping if this is a [`DescriptorValue::Map`].
    pub fn as_map(&self) -> Option<&DescriptorMap> {
        match self {
            DescriptorValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`DescriptorValue::List`].
    pub fn as_list(&self) -> Option<&[DescriptorValue]> {
        match self {
            DescriptorValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            DescriptorValue::Null => "null",
            DescriptorValue::Bool(_) => "bool",
            DescriptorValue::Int(_) => "int",
            DescriptorValue::Float(_) => "float",
            DescriptorValue::String(_) => "string",
            DescriptorValue::List(_) => "list",
            DescriptorValue::Map(_) => "map",
        }
    }
}

impl PartialEq for DescriptorValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::List(items), Self::Map(map)) | (Self::Map(map), Self::List(items)) => {
                items.is_empty() && map.is_empty()
            }
            _ => false,
        }
    }
}

impl From<&str> for DescriptorValue {
    fn from(s: &str) -> Self {
        DescriptorValue::String(s.to_string())
    }
}

impl From<String> for DescriptorValue {
    fn from(s: String) -> Self {
        DescriptorValue::String(s)
    }
}

impl From<bool> for DescriptorValue {
    fn from(b: bool) -> Self {
        DescriptorValue::Bool(b)
    }
}

impl From<i64> for DescriptorValue {
    fn from(n: i64) -> Self {
        DescriptorValue::Int(n)
    }
}

impl From<i32> for DescriptorValue {
    fn from(n: i32) -> Self {
        DescriptorValue::Int(n.into())
    }
}

impl From<f64> for DescriptorValue {
    fn from(n: f64) -> Self {
        DescriptorValue::Float(n)
    }
}

impl From<Vec<DescriptorValue>> for DescriptorValue {
    fn from(items: Vec<DescriptorValue>) -> Self {
        DescriptorValue::List(items)
    }
}

impl From<DescriptorMap> for DescriptorValue {
    fn from(map: DescriptorMap) -> Self {
        DescriptorValue::Map(map)
    }
}

/// String-keyed mapping that remembers insertion order.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorMap {
    entries: Vec<(String, DescriptorValue)>,
}

impl DescriptorMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DescriptorValue>,
    ) -> Option<DescriptorValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DescriptorValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&DescriptorValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Mutable value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut DescriptorValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DescriptorValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<DescriptorValue>> FromIterator<(K, V)> for DescriptorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = DescriptorMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for DescriptorMap {
    type Item = (String, DescriptorValue);
    type IntoIter = std::vec::IntoIter<(String, DescriptorValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = DescriptorValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, null, sequence or table")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(DescriptorValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DescriptorValue::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        // Out-of-range integers degrade to float, as PHP does on overflow.
        Ok(i64::try_from(v)
            .map(DescriptorValue::Int)
            .unwrap_or(DescriptorValue::Float(v as f64)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(DescriptorValue::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(DescriptorValue::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(DescriptorValue::String(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(DescriptorValue::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(DescriptorValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        DescriptorValue::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(DescriptorValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = DescriptorMap::new();
        while let Some((key, value)) = access.next_entry::<String, DescriptorValue>()? {
            map.insert(key, value);
        }
        if map.len() == 1 {
            if let Some(DescriptorValue::String(stamp)) = map.get(TOML_DATETIME_KEY) {
                return Ok(DescriptorValue::String(stamp.clone()));
            }
        }
        Ok(DescriptorValue::Map(map))
    }
}

impl<'de> Deserialize<'de> for DescriptorValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for DescriptorMap {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match DescriptorValue::deserialize(d)? {
            DescriptorValue::Map(map) => Ok(map),
            // An empty JSON array is the only empty container PHP-minded callers write.
            DescriptorValue::List(items) if items.is_empty() => Ok(DescriptorMap::new()),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.type_name()),
                &"a table",
            )),
        }
    }
}
