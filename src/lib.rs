//! # Rust Field Logger
//!
//! A structured logging engine: records carry key/value context, are
//! filtered by severity, passed through level-keyed hooks and rendered as
//! `key=value` text or JSON before being written to any `io::Write` sink.
//!
//! ## Features
//!
//! - **Copy-on-extend context**: `with_field` never mutates the entry it is
//!   called on, so a base entry can be reused across calls and threads
//! - **Lock-free filtering**: the threshold is an atomic read on every call
//! - **Hooks**: synchronous observers per level, isolated from each other
//! - **Two encodings**: logfmt-style text and one-object-per-line JSON, with
//!   reserved keys protected from user fields
//! - **Call-site capture**: optional `func` field naming the caller
//!
//! ```
//! use rust_field_logger::prelude::*;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::builder()
//!     .output(buffer.clone())
//!     .formatter(TextFormatter::new().with_disable_timestamp(true))
//!     .build();
//!
//! let request = logger.with_fields([("method", "GET"), ("path", "/health")]);
//! request.with_field("status", 200).info(&[&"request served"]);
//!
//! assert_eq!(
//!     buffer.contents(),
//!     "level=info msg=\"request served\" method=GET path=/health status=200\n"
//! );
//! ```

pub mod core;
pub mod exported;
pub mod formatters;
pub mod hooks;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Entry, FieldValue, Fields, Hook, LogArg, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, Result, SharedBuffer, TimestampFormat,
    };
    pub use crate::formatters::{FieldKey, FieldMap, Formatter, JsonFormatter, TextFormatter};
    pub use crate::hooks::{CaptureHook, WriterHook};
}

pub use crate::core::{
    AtomicLevel, CallerInfo, Entry, ErrorHandler, ExitFunc, FieldValue, Fields, Hook, LevelHooks,
    LineWriter, LogArg, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, Result, SharedBuffer, TimestampFormat, ERROR_KEY, MAXIMUM_CALLER_DEPTH,
};
pub use formatters::{FieldKey, FieldMap, Formatter, JsonFormatter, TextFormatter};
pub use hooks::{CaptureHook, CapturedEntry, WriterHook};
