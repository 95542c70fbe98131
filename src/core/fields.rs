//! Structured key/value context attached to entries
//!
//! This module provides:
//! - `FieldValue`: the typed value stored under a key
//! - `Fields`: an insertion-ordered map from keys to values

use super::error::Result;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Textual description of an error, captured when the field was added
    Error(String),
    Null,
    /// Arbitrary structured value
    Json(serde_json::Value),
}

impl FieldValue {
    /// Capture an error by its description
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        FieldValue::Error(err.to_string())
    }

    /// Serialize any value into an opaque structured field
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(FieldValue::Json(serde_json::to_value(value)?))
    }

    /// True for plain string values
    pub fn is_string(&self) -> bool {
        matches!(self, FieldValue::String(_))
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) | FieldValue::Error(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::UInt(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) | FieldValue::Error(s) => f.write_str(s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => f.write_str("null"),
            FieldValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<char> for FieldValue {
    fn from(c: char) -> Self {
        FieldValue::String(c.to_string())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(i: $t) -> Self {
                FieldValue::Int(i as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(u: $t) -> Self {
                FieldValue::UInt(u as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Json(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Insertion-ordered key/value set.
///
/// Inserting an existing key replaces the value in place, so iteration
/// order depends only on the order keys were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: IndexMap<String, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Add a field, consuming and returning the set
    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field, returning the previous value
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<FieldValue>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a field; the remaining fields keep their order
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Copy of `self` with every field of `other` applied on top
    #[must_use]
    pub fn merged(&self, other: &Fields) -> Fields {
        let mut merged = Fields::with_capacity(self.len() + other.len());
        merged.entries.extend(self.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
            .entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Convert into a JSON object, keeping insertion order
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json_value()))
            .collect()
    }

    /// Format fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Fields {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_creation() {
        let fields = Fields::new();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_fields_with_values() {
        let fields = Fields::new()
            .with_field("user_id", 123)
            .with_field("username", "john_doe")
            .with_field("active", true);

        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("user_id"), Some(&FieldValue::Int(123)));
        assert_eq!(
            fields.get("username"),
            Some(&FieldValue::String("john_doe".to_string()))
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut fields = Fields::from([("a", 1), ("b", 2), ("c", 3)]);
        let previous = fields.insert("b", 20);

        assert_eq!(previous, Some(FieldValue::Int(2)));
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(fields.get("b"), Some(&FieldValue::Int(20)));
    }

    #[test]
    fn test_merged_leaves_receiver_untouched() {
        let base = Fields::from([("key1", "value1")]);
        let extra = Fields::from([("key1", "override"), ("key2", "value2")]);

        let merged = base.merged(&extra);

        assert_eq!(base.len(), 1);
        assert_eq!(base.get("key1"), Some(&FieldValue::from("value1")));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("key1"), Some(&FieldValue::from("override")));
    }

    #[test]
    fn test_remove() {
        let mut fields = Fields::from([("a", 1), ("b", 2)]);
        assert_eq!(fields.remove("a"), Some(FieldValue::Int(1)));
        assert_eq!(fields.remove("a"), None);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_of_rest() {
        let mut fields = Fields::from([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        fields.remove("b");
        fields.insert("b", 5);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_merge_of_wide_sets_keeps_first_seen_order() {
        let base: Fields = (0..500).map(|i| (format!("k{}", i), i)).collect();
        let extra: Fields = (250..750).map(|i| (format!("k{}", i), -i)).collect();

        let merged = base.merged(&extra);

        assert_eq!(merged.len(), 750);
        assert_eq!(merged.keys().next(), Some("k0"));
        assert_eq!(merged.keys().nth(300), Some("k300"));
        assert_eq!(merged.get("k300"), Some(&FieldValue::Int(-300)));
        assert_eq!(merged.keys().last(), Some("k749"));
    }

    #[test]
    fn test_json_values_keep_types() {
        let fields = Fields::new()
            .with_field("count", 5u32)
            .with_field("ratio", 0.5)
            .with_field("ok", false)
            .with_field("missing", None::<i32>)
            .with_field("nested", serde_json::json!({"a": [1, 2]}));

        let map = fields.to_json_map();
        assert_eq!(map["count"], 5);
        assert_eq!(map["ratio"], 0.5);
        assert_eq!(map["ok"], false);
        assert!(map["missing"].is_null());
        assert_eq!(map["nested"]["a"][1], 2);
    }

    #[test]
    fn test_non_finite_float_serializes_as_null() {
        assert!(FieldValue::Float(f64::NAN).to_json_value().is_null());
    }

    #[test]
    fn test_error_value_uses_description() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let value = FieldValue::error(&io_err);

        assert_eq!(value.to_string(), "no such file");
        assert_eq!(value.to_json_value(), serde_json::json!("no such file"));
    }

    #[test]
    fn test_structured_value() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let value = FieldValue::structured(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(value.to_string(), r#"{"x":1,"y":2}"#);
    }

    #[test]
    fn test_format_fields() {
        let fields = Fields::new()
            .with_field("key1", "value1")
            .with_field("key2", 42);

        assert_eq!(fields.format_fields(), "key1=value1 key2=42");
    }
}
