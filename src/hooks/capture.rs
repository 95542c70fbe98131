//! Hook that keeps fired records in memory

use crate::core::{CallerInfo, Entry, Fields, Hook, LogLevel, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Owned snapshot of a record as a hook saw it
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEntry {
    pub level: LogLevel,
    pub message: String,
    pub data: Fields,
    pub time: Option<DateTime<Utc>>,
    pub caller: Option<CallerInfo>,
}

impl CapturedEntry {
    fn from_entry(entry: &Entry<'_>) -> Self {
        Self {
            level: entry.level(),
            message: entry.message().to_string(),
            data: entry.data().clone(),
            time: entry.time(),
            caller: entry.caller().cloned(),
        }
    }
}

/// Records every entry fired at it.
///
/// Clones share the same storage, so one handle can be registered with a
/// logger while another is kept for assertions.
///
/// # Example
///
/// ```
/// use rust_field_logger::{CaptureHook, LogLevel, Logger, SharedBuffer};
///
/// let hook = CaptureHook::new();
/// let logger = Logger::builder()
///     .output(SharedBuffer::new())
///     .hook(hook.clone())
///     .build();
///
/// logger.with_field("attempt", 3).error(&[&"retry failed"]);
///
/// let last = hook.last().unwrap();
/// assert_eq!(last.level, LogLevel::Error);
/// assert_eq!(last.message, "retry failed");
/// ```
#[derive(Debug, Clone)]
pub struct CaptureHook {
    levels: Vec<LogLevel>,
    entries: Arc<Mutex<Vec<CapturedEntry>>>,
}

impl CaptureHook {
    /// Capture records at every level
    pub fn new() -> Self {
        Self::with_levels(&LogLevel::ALL)
    }

    pub fn with_levels(levels: &[LogLevel]) -> Self {
        Self {
            levels: levels.to_vec(),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of everything captured so far, oldest first
    pub fn entries(&self) -> Vec<CapturedEntry> {
        self.entries.lock().clone()
    }

    pub fn last(&self) -> Option<CapturedEntry> {
        self.entries.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn reset(&self) {
        self.entries.lock().clear();
    }
}

impl Default for CaptureHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for CaptureHook {
    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    fn fire(&self, entry: &Entry<'_>) -> Result<()> {
        self.entries.lock().push(CapturedEntry::from_entry(entry));
        Ok(())
    }

    fn name(&self) -> &str {
        "capture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldValue, Logger, SharedBuffer};

    #[test]
    fn test_captures_fields_and_message() {
        let hook = CaptureHook::new();
        let logger = Logger::builder()
            .output(SharedBuffer::new())
            .hook(hook.clone())
            .build();

        logger.with_field("user", "bob").infoln(&[&"logged", &"in"]);

        let entries = hook.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "logged in");
        assert_eq!(entries[0].data.get("user"), Some(&FieldValue::from("bob")));
        assert!(entries[0].time.is_some());
        assert!(entries[0].caller.is_none());
    }

    #[test]
    fn test_only_selected_levels() {
        let hook = CaptureHook::with_levels(&[LogLevel::Error]);
        let logger = Logger::builder()
            .output(SharedBuffer::new())
            .hook(hook.clone())
            .build();

        logger.info(&[&"skip"]);
        logger.warn(&[&"skip"]);
        logger.error(&[&"keep"]);

        assert_eq!(hook.len(), 1);
        assert_eq!(hook.last().map(|e| e.message), Some("keep".to_string()));

        hook.reset();
        assert!(hook.is_empty());
    }
}
