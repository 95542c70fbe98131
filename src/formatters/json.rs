//! One JSON object per line

use super::field_map::{prefix_field_clashes, FieldKey, FieldMap};
use crate::core::{Entry, Fields, LoggerError, Result, TimestampFormat};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON formatter configuration.
///
/// Reserved keys come first (`time`, `level`, `msg`, then `func`/`file` when
/// a caller was captured), followed by user fields in insertion order.
/// Numbers and booleans keep their JSON types.
///
/// # Example
///
/// ```
/// use rust_field_logger::{JsonFormatter, Logger, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder()
///     .output(buffer.clone())
///     .formatter(JsonFormatter::new().with_disable_timestamp(true))
///     .build();
///
/// logger.with_field("key", "value").info(&[&"hello world"]);
/// assert_eq!(
///     buffer.contents(),
///     "{\"level\":\"info\",\"msg\":\"hello world\",\"key\":\"value\"}\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFormatter {
    pub timestamp_format: TimestampFormat,
    pub disable_timestamp: bool,
    /// Nest every user field under this key instead of the top level
    pub data_key: Option<String>,
    pub pretty_print: bool,
    pub field_map: FieldMap,
    /// Emit the caller's `file:line` next to `func`
    pub report_caller_file: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }

    #[must_use]
    pub fn with_data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    #[must_use]
    pub fn with_field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = field_map;
        self
    }

    #[must_use]
    pub fn with_report_caller_file(mut self, report: bool) -> Self {
        self.report_caller_file = report;
        self
    }

    /// Render `entry` as a JSON object followed by a newline
    pub fn format(&self, entry: &Entry<'_>) -> Result<Vec<u8>> {
        let caller = entry.caller();
        let user = match self.data_key.as_deref() {
            Some(key) if !key.is_empty() => {
                Fields::new().with_field(key, Value::Object(entry.data().to_json_map()))
            }
            _ => entry.data().clone(),
        };
        let user = prefix_field_clashes(&user, &self.field_map, caller.is_some());

        let mut object = Map::new();

        if !self.disable_timestamp {
            let time = entry.time().unwrap_or_else(Utc::now);
            object.insert(
                self.field_map.resolve(FieldKey::Time).to_string(),
                self.timestamp_format.to_json_value(&time)?,
            );
        }
        object.insert(
            self.field_map.resolve(FieldKey::Level).to_string(),
            Value::String(entry.level().to_str().to_string()),
        );
        object.insert(
            self.field_map.resolve(FieldKey::Msg).to_string(),
            Value::String(entry.message().to_string()),
        );
        if let Some(caller) = caller {
            object.insert(
                self.field_map.resolve(FieldKey::Func).to_string(),
                Value::String(caller.function.clone()),
            );
            if self.report_caller_file {
                object.insert(
                    self.field_map.resolve(FieldKey::File).to_string(),
                    Value::String(caller.file_line()),
                );
            }
        }

        for (key, value) in user.iter() {
            object.insert(key.to_string(), value.to_json_value());
        }

        let value = Value::Object(object);
        let encoded = if self.pretty_print {
            serde_json::to_vec_pretty(&value)
        } else {
            serde_json::to_vec(&value)
        };
        let mut bytes = encoded.map_err(|e| LoggerError::formatter("json", e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
