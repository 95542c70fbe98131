//! `io::Write` adapter that turns written lines into log records

use super::entry::Entry;
use super::log_level::LogLevel;
use std::io::{self, Write};

/// Logs each complete line written to it as one record.
///
/// The trailing `\n` (and a preceding `\r`) is stripped. A final line
/// without a newline is logged when the writer is dropped.
///
/// # Example
///
/// ```
/// use rust_field_logger::{LogLevel, Logger, SharedBuffer};
/// use std::io::Write;
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder().output(buffer.clone()).build();
///
/// let mut writer = logger.writer(LogLevel::Warn);
/// writeln!(writer, "disk usage at {}%", 91).unwrap();
///
/// assert!(buffer.contents().contains("level=warning"));
/// ```
pub struct LineWriter<'a> {
    entry: Entry<'a>,
    level: LogLevel,
    pending: Vec<u8>,
}

impl<'a> LineWriter<'a> {
    pub(crate) fn new(entry: Entry<'a>, level: LogLevel) -> Self {
        Self {
            entry,
            level,
            pending: Vec::new(),
        }
    }

    fn emit(&self, line: &[u8]) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let text = String::from_utf8_lossy(line);
        self.entry.log(self.level, &[&text]);
    }
}

impl Write for LineWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line[..line.len() - 1]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest);
        }
    }
}
