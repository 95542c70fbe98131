//! Reserved output keys and user-field collision handling

use crate::core::Fields;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prefix given to user fields whose key clashes with a reserved one
pub const CLASH_PREFIX: &str = "fields.";

/// Output keys owned by the formatters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKey {
    Time,
    Level,
    Msg,
    Func,
    File,
}

impl FieldKey {
    pub fn default_name(&self) -> &'static str {
        match self {
            FieldKey::Time => "time",
            FieldKey::Level => "level",
            FieldKey::Msg => "msg",
            FieldKey::Func => "func",
            FieldKey::File => "file",
        }
    }
}

/// Renames for reserved output keys.
///
/// ```
/// use rust_field_logger::{FieldKey, FieldMap};
///
/// let map = FieldMap::new().with(FieldKey::Msg, "message");
/// assert_eq!(map.resolve(FieldKey::Msg), "message");
/// assert_eq!(map.resolve(FieldKey::Time), "time");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    names: HashMap<FieldKey, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output `key` under `name`
    #[must_use]
    pub fn with(mut self, key: FieldKey, name: impl Into<String>) -> Self {
        self.names.insert(key, name.into());
        self
    }

    pub fn resolve(&self, key: FieldKey) -> &str {
        self.names
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_name())
    }
}

/// Copy of `data` with every user key that shadows a reserved output key
/// moved to `fields.<key>`.
///
/// `func` and `file` are reserved only for records that carry a caller.
pub fn prefix_field_clashes(data: &Fields, field_map: &FieldMap, has_caller: bool) -> Fields {
    let mut reserved = vec![
        field_map.resolve(FieldKey::Time),
        field_map.resolve(FieldKey::Msg),
        field_map.resolve(FieldKey::Level),
    ];
    if has_caller {
        reserved.push(field_map.resolve(FieldKey::Func));
        reserved.push(field_map.resolve(FieldKey::File));
    }

    if !reserved.iter().any(|key| data.contains_key(key)) {
        return data.clone();
    }

    let mut fields = data.clone();
    for key in reserved {
        if let Some(value) = fields.remove(key) {
            fields.insert(format!("{}{}", CLASH_PREFIX, key), value);
        }
    }
    fields
}
