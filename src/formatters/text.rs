//! Line-oriented `key=value` encoding

use super::field_map::{prefix_field_clashes, FieldKey, FieldMap};
use crate::core::{Entry, FieldValue, Result, TimestampFormat};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Text formatter configuration.
///
/// Produces `time="2024-01-01T00:00:00Z" level=info msg="hello world" key=value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFormatter {
    /// Wrap the level value in an ANSI color sequence
    pub colors: bool,
    pub disable_timestamp: bool,
    /// Keep user fields in insertion order instead of sorting them by key
    pub disable_sorting: bool,
    /// Quote every value
    pub force_quote: bool,
    /// Never quote values; wins over `quote_empty_fields` but not `force_quote`
    pub disable_quote: bool,
    pub quote_empty_fields: bool,
    pub timestamp_format: TimestampFormat,
    pub field_map: FieldMap,
    /// Emit the caller's `file:line` next to `func`
    pub report_caller_file: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }

    #[must_use]
    pub fn with_disable_sorting(mut self, disable: bool) -> Self {
        self.disable_sorting = disable;
        self
    }

    #[must_use]
    pub fn with_force_quote(mut self, force: bool) -> Self {
        self.force_quote = force;
        self
    }

    #[must_use]
    pub fn with_disable_quote(mut self, disable: bool) -> Self {
        self.disable_quote = disable;
        self
    }

    #[must_use]
    pub fn with_quote_empty_fields(mut self, quote: bool) -> Self {
        self.quote_empty_fields = quote;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
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

    /// Render `entry` as one newline-terminated line
    pub fn format(&self, entry: &Entry<'_>) -> Result<Vec<u8>> {
        let caller = entry.caller();
        let data = prefix_field_clashes(entry.data(), &self.field_map, caller.is_some());

        let mut line = String::with_capacity(64 + data.len() * 16);

        if !self.disable_timestamp {
            let time = entry.time().unwrap_or_else(Utc::now);
            let stamp = self.timestamp_format.format(&time)?;
            self.append_pair(&mut line, self.field_map.resolve(FieldKey::Time), &stamp);
        }

        self.append_level(&mut line, entry);

        if !entry.message().is_empty() {
            self.append_pair(&mut line, self.field_map.resolve(FieldKey::Msg), entry.message());
        }

        if let Some(caller) = caller {
            self.append_pair(&mut line, self.field_map.resolve(FieldKey::Func), &caller.function);
            if self.report_caller_file {
                self.append_pair(
                    &mut line,
                    self.field_map.resolve(FieldKey::File),
                    &caller.file_line(),
                );
            }
        }

        let mut user: Vec<(&str, &FieldValue)> = data.iter().collect();
        if !self.disable_sorting {
            user.sort_by(|a, b| a.0.cmp(b.0));
        }
        for (key, value) in user {
            self.append_pair(&mut line, key, &value.to_string());
        }

        line.push('\n');
        Ok(line.into_bytes())
    }

    fn append_level(&self, line: &mut String, entry: &Entry<'_>) {
        let key = self.field_map.resolve(FieldKey::Level);
        let level = entry.level();
        if self.colors {
            separate(line);
            let _ = write!(
                line,
                "{}=\x1b[{}m{}\x1b[0m",
                key,
                level.color_code().to_fg_str(),
                level
            );
        } else {
            self.append_pair(line, key, level.to_str());
        }
    }

    fn append_pair(&self, line: &mut String, key: &str, value: &str) {
        separate(line);
        line.push_str(key);
        line.push('=');
        if self.needs_quoting(value) {
            let _ = write!(line, "{:?}", value);
        } else {
            line.push_str(value);
        }
    }

    fn needs_quoting(&self, text: &str) -> bool {
        if self.force_quote {
            return true;
        }
        if self.quote_empty_fields && text.is_empty() {
            return true;
        }
        if self.disable_quote {
            return false;
        }
        !text
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
    }
}

fn separate(line: &mut String) {
    if !line.is_empty() {
        line.push(' ');
    }
}
