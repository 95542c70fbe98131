//! Record encodings

pub mod field_map;
pub mod json;
pub mod text;

pub use field_map::{prefix_field_clashes, FieldKey, FieldMap, CLASH_PREFIX};
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::core::{Entry, Result};

/// Encoding applied to every record a logger writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    Text(TextFormatter),
    Json(JsonFormatter),
}

impl Formatter {
    /// Render one entry to the bytes handed to the sink
    pub fn format(&self, entry: &Entry<'_>) -> Result<Vec<u8>> {
        match self {
            Formatter::Text(text) => text.format(entry),
            Formatter::Json(json) => json.format(entry),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Formatter::Text(_) => "text",
            Formatter::Json(_) => "json",
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::Text(TextFormatter::default())
    }
}

impl From<TextFormatter> for Formatter {
    fn from(formatter: TextFormatter) -> Self {
        Formatter::Text(formatter)
    }
}

impl From<JsonFormatter> for Formatter {
    fn from(formatter: JsonFormatter) -> Self {
        Formatter::Json(formatter)
    }
}
