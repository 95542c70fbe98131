//! Process-wide standard logger
//!
//! A lazily built [`Logger`] writing text records to stderr at `Info`, with
//! free functions mirroring the logger's own surface. Configuration calls
//! take effect for every thread at once.
//!
//! ```
//! use rust_field_logger::{exported as log, LogLevel, SharedBuffer};
//!
//! let buffer = SharedBuffer::new();
//! log::set_output(buffer.clone());
//! log::set_level(LogLevel::Debug);
//!
//! log::with_field("animal", "walrus").debugf(format_args!("{} tusks", 2));
//! assert!(buffer.contents().contains("animal=walrus"));
//! ```

use crate::core::{
    Entry, FieldValue, Fields, Hook, LineWriter, LogArg, LogLevel, Logger, LoggerError,
};
use crate::formatters::Formatter;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::fmt;
use std::io::Write;

static STANDARD: Lazy<Logger> = Lazy::new(Logger::new);

/// The standard logger itself
pub fn standard_logger() -> &'static Logger {
    &STANDARD
}

/// Current threshold of the standard logger
pub fn level() -> LogLevel {
    STANDARD.level()
}

pub fn set_level(level: LogLevel) {
    STANDARD.set_level(level);
}

pub fn is_level_enabled(level: LogLevel) -> bool {
    STANDARD.is_level_enabled(level)
}

pub fn set_output<W: Write + Send + 'static>(output: W) {
    STANDARD.set_output(output);
}

pub fn set_formatter(formatter: impl Into<Formatter>) {
    STANDARD.set_formatter(formatter);
}

pub fn set_report_caller(enabled: bool) {
    STANDARD.set_report_caller(enabled);
}

pub fn add_hook<H: Hook + 'static>(hook: H) {
    STANDARD.add_hook(hook);
}

pub fn set_exit_func<F>(exit_func: F)
where
    F: Fn(i32) + Send + Sync + 'static,
{
    STANDARD.set_exit_func(exit_func);
}

pub fn set_error_handler<F>(handler: F)
where
    F: Fn(&LoggerError) + Send + Sync + 'static,
{
    STANDARD.set_error_handler(handler);
}

pub fn register_exit_handler<F>(handler: F)
where
    F: Fn() + Send + Sync + 'static,
{
    STANDARD.register_exit_handler(handler);
}

pub fn with_field<K, V>(key: K, value: V) -> Entry<'static>
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    STANDARD.with_field(key, value)
}

pub fn with_fields(fields: impl Into<Fields>) -> Entry<'static> {
    STANDARD.with_fields(fields)
}

pub fn with_error(err: &(dyn std::error::Error + '_)) -> Entry<'static> {
    STANDARD.with_error(err)
}

pub fn with_time(time: DateTime<Utc>) -> Entry<'static> {
    STANDARD.with_time(time)
}

pub fn writer(level: LogLevel) -> LineWriter<'static> {
    STANDARD.writer(level)
}

macro_rules! standard_shapes {
    ($($plain:ident, $ln:ident, $f:ident;)*) => {
        $(
            pub fn $plain(args: &[&dyn LogArg]) {
                STANDARD.$plain(args);
            }

            pub fn $ln(args: &[&dyn LogArg]) {
                STANDARD.$ln(args);
            }

            pub fn $f(args: fmt::Arguments<'_>) {
                STANDARD.$f(args);
            }
        )*
    };
}

standard_shapes! {
    trace, traceln, tracef;
    debug, debugln, debugf;
    info, infoln, infof;
    print, println, printf;
    warn, warnln, warnf;
    warning, warningln, warningf;
    error, errorln, errorf;
    fatal, fatalln, fatalf;
    panic, panicln, panicf;
}
