//! Hook that renders records to a writer of its own

use crate::core::{Entry, Hook, LogLevel, LoggerError, Result};
use crate::formatters::Formatter;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes fired records to a separate sink with a separate formatter.
///
/// Useful for sending, say, errors as JSON to a file while the logger's
/// main output stays human-readable.
///
/// ```no_run
/// use rust_field_logger::{JsonFormatter, LogLevel, Logger, WriterHook};
///
/// let errors = WriterHook::to_file(
///     "/var/log/app-errors.jsonl",
///     &[LogLevel::Error, LogLevel::Fatal, LogLevel::Panic],
/// )
/// .unwrap()
/// .with_formatter(JsonFormatter::new());
///
/// let logger = Logger::builder().hook(errors).build();
/// logger.error(&[&"lost connection"]);
/// ```
pub struct WriterHook {
    writer: Mutex<Box<dyn Write + Send>>,
    formatter: Formatter,
    levels: Vec<LogLevel>,
}

impl WriterHook {
    pub fn new<W: Write + Send + 'static>(writer: W, levels: &[LogLevel]) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            formatter: Formatter::default(),
            levels: levels.to_vec(),
        }
    }

    /// Append to the file at `path`, creating it when missing
    pub fn to_file(path: impl AsRef<Path>, levels: &[LogLevel]) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file), levels))
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = formatter.into();
        self
    }
}

impl Hook for WriterHook {
    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    fn fire(&self, entry: &Entry<'_>) -> Result<()> {
        let bytes = self.formatter.format(entry)?;
        let mut writer = self.writer.lock();
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(|e| LoggerError::hook(self.name(), e.to_string()))
    }

    fn name(&self) -> &str {
        "writer"
    }
}
