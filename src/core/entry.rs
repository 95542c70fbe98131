//! Log record builder with copy-on-extend context
//!
//! An `Entry` carries the fields accumulated through `with_field` /
//! `with_fields` / `with_error`. Extending never touches the receiver: each
//! call returns a new `Entry` owning its own copy of the fields, so a base
//! entry can be shared across threads and reused for any number of calls.

use super::caller::CallerInfo;
use super::error::Result;
use super::fields::{FieldValue, Fields};
use super::log_level::LogLevel;
use super::logger::Logger;
use super::message::{self, LogArg};
use super::writer::LineWriter;
use chrono::{DateTime, Utc};
use std::fmt;

/// Key under which `with_error` stores the error description
pub const ERROR_KEY: &str = "error";

/// One in-flight log record.
///
/// # Example
///
/// ```
/// use rust_field_logger::{Logger, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder().output(buffer.clone()).build();
///
/// let request = logger.with_field("request_id", "abc-123");
/// request.with_field("status", 200).info(&[&"request served"]);
/// request.warn(&[&"slow request"]);
///
/// let lines = buffer.lines();
/// assert!(lines[0].contains("status=200"));
/// assert!(!lines[1].contains("status"));
/// ```
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    logger: &'a Logger,
    data: Fields,
    level: LogLevel,
    message: String,
    time: Option<DateTime<Utc>>,
    caller: Option<CallerInfo>,
}

macro_rules! level_shapes {
    ($($level:expr => $plain:ident, $ln:ident, $f:ident;)*) => {
        $(
            #[doc = concat!("Log at `", stringify!($level), "`, concatenating the operands.")]
            pub fn $plain(&self, args: &[&dyn LogArg]) {
                self.log($level, args);
            }

            #[doc = concat!("Log at `", stringify!($level), "`, space-joining the operands.")]
            pub fn $ln(&self, args: &[&dyn LogArg]) {
                self.logln($level, args);
            }

            #[doc = concat!("Log at `", stringify!($level), "` from `format_args!` output.")]
            pub fn $f(&self, args: fmt::Arguments<'_>) {
                self.logf($level, args);
            }
        )*
    };
}

impl<'a> Entry<'a> {
    /// Root entry with no fields
    pub fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            data: Fields::new(),
            level: LogLevel::Info,
            message: String::new(),
            time: None,
            caller: None,
        }
    }

    pub fn logger(&self) -> &'a Logger {
        self.logger
    }

    /// Fields accumulated so far
    pub fn data(&self) -> &Fields {
        &self.data
    }

    /// Level of the record; `Info` until the entry is logged
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Timestamp fixed with `with_time`, or stamped when the record was logged
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Call site, present only when caller reporting was on at log time
    pub fn caller(&self) -> Option<&CallerInfo> {
        self.caller.as_ref()
    }

    /// Derive an entry with one more field
    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Entry<'a>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut data = self.data.clone();
        data.insert(key, value);
        self.derive(data)
    }

    /// Derive an entry with every field of `fields` applied on top
    #[must_use]
    pub fn with_fields(&self, fields: impl Into<Fields>) -> Entry<'a> {
        let data = self.data.merged(&fields.into());
        self.derive(data)
    }

    /// Derive an entry carrying `err` under [`ERROR_KEY`]
    #[must_use]
    pub fn with_error(&self, err: &(dyn std::error::Error + '_)) -> Entry<'a> {
        self.with_field(ERROR_KEY, FieldValue::error(err))
    }

    /// Derive an entry that is encoded with `time` instead of the log time
    #[must_use]
    pub fn with_time(&self, time: DateTime<Utc>) -> Entry<'a> {
        let mut entry = self.derive(self.data.clone());
        entry.time = Some(time);
        entry
    }

    fn derive(&self, data: Fields) -> Entry<'a> {
        Entry {
            logger: self.logger,
            data,
            level: self.level,
            message: String::new(),
            time: self.time,
            caller: None,
        }
    }

    /// Log at `level`, concatenating the operands
    pub fn log(&self, level: LogLevel, args: &[&dyn LogArg]) {
        self.dispatch(level, || message::concat(args));
    }

    /// Log at `level`, space-joining the operands
    pub fn logln(&self, level: LogLevel, args: &[&dyn LogArg]) {
        self.dispatch(level, || message::join_spaced(args));
    }

    /// Log at `level` from `format_args!` output
    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.dispatch(level, || fmt::format(args));
    }

    level_shapes! {
        LogLevel::Trace => trace, traceln, tracef;
        LogLevel::Debug => debug, debugln, debugf;
        LogLevel::Info => info, infoln, infof;
        LogLevel::Info => print, println, printf;
        LogLevel::Warn => warn, warnln, warnf;
        LogLevel::Warn => warning, warningln, warningf;
        LogLevel::Error => error, errorln, errorf;
        LogLevel::Fatal => fatal, fatalln, fatalf;
        LogLevel::Panic => panic, panicln, panicf;
    }

    /// Writer that logs every line written to it at `level`
    pub fn writer(&self, level: LogLevel) -> LineWriter<'a> {
        LineWriter::new(self.clone(), level)
    }

    /// Render this entry with the logger's formatter without writing it
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.logger.formatter().format(self)
    }

    /// Rendered entry as text
    pub fn to_string_lossy(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.to_bytes()?).into_owned())
    }

    fn dispatch(&self, level: LogLevel, build_message: impl FnOnce() -> String) {
        let enabled = self.logger.is_level_enabled(level);
        let terminal = matches!(level, LogLevel::Fatal | LogLevel::Panic);
        if !enabled && !terminal {
            return;
        }

        let caller = if enabled && self.logger.report_caller() {
            CallerInfo::capture()
        } else {
            None
        };
        let message = build_message();

        if enabled {
            let record = Entry {
                logger: self.logger,
                data: self.data.clone(),
                level,
                message: message.clone(),
                time: Some(self.time.unwrap_or_else(Utc::now)),
                caller,
            };
            self.logger.fire_hooks(level, &record);
            self.logger.write_entry(&record);
        }

        match level {
            LogLevel::Fatal => self.logger.exit(1),
            LogLevel::Panic => panic!("{}", message),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sink::SharedBuffer;

    fn logger_with_buffer() -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .output(buffer.clone())
            .level(LogLevel::Trace)
            .build();
        (logger, buffer)
    }

    #[test]
    fn test_with_field_does_not_mutate_receiver() {
        let (logger, _) = logger_with_buffer();
        let base = logger.with_field("key1", "value1");
        let derived = base.with_field("key2", "value2");

        assert_eq!(base.data().len(), 1);
        assert_eq!(derived.data().len(), 2);
        assert!(!base.data().contains_key("key2"));
    }

    #[test]
    fn test_with_fields_later_keys_win() {
        let (logger, _) = logger_with_buffer();
        let entry = logger
            .with_fields([("a", 1), ("b", 2)])
            .with_fields([("b", 3)]);

        assert_eq!(entry.data().get("a"), Some(&FieldValue::Int(1)));
        assert_eq!(entry.data().get("b"), Some(&FieldValue::Int(3)));
    }

    #[test]
    fn test_with_error_uses_error_key() {
        let (logger, _) = logger_with_buffer();
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let entry = logger.with_error(&err);

        assert_eq!(
            entry.data().get(ERROR_KEY),
            Some(&FieldValue::Error("disk full".to_string()))
        );
    }

    #[test]
    fn test_logging_leaves_base_entry_pristine() {
        let (logger, buffer) = logger_with_buffer();
        let base = logger.with_field("context", "eating raw fish");

        base.info(&[&"looks delicious"]);
        base.warn(&[&"omg it is!"]);

        assert_eq!(base.message(), "");
        assert!(base.time().is_none());
        assert_eq!(base.data().len(), 1);
        assert_eq!(buffer.lines().len(), 2);
    }

    #[test]
    fn test_below_threshold_writes_nothing() {
        let (logger, buffer) = logger_with_buffer();
        logger.set_level(LogLevel::Warn);

        logger.with_field("k", "v").info(&[&"hidden"]);
        logger.with_field("k", "v").debugf(format_args!("hidden {}", 1));

        assert!(buffer.is_empty());
    }

    #[test]
    fn test_with_time_fixes_timestamp() {
        use chrono::TimeZone;

        let (logger, buffer) = logger_with_buffer();
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        logger.with_time(time).info(&[&"hello"]);

        assert!(buffer.contents().starts_with("time=\"2024-01-01T00:00:00Z\""));
    }

    #[test]
    fn test_to_bytes_renders_without_writing() {
        let (logger, buffer) = logger_with_buffer();
        let entry = logger.with_field("key", "value");

        let rendered = entry.to_string_lossy().unwrap();

        assert!(rendered.contains("key=value"));
        assert!(rendered.ends_with('\n'));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_panic_level_unwinds_after_write() {
        let (logger, buffer) = logger_with_buffer();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.with_field("k", "v").panic(&[&"boom"]);
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("boom"));
        assert!(buffer.contents().contains("level=panic"));
    }
}
