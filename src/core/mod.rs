//! Core logger types and traits

pub mod caller;
pub mod config;
pub mod entry;
pub mod error;
pub mod fields;
pub mod hooks;
pub mod log_level;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod sink;
pub mod timestamp;
pub mod writer;

pub use caller::{CallerInfo, MAXIMUM_CALLER_DEPTH};
pub use config::LoggerConfig;
pub use entry::{Entry, ERROR_KEY};
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use hooks::{Hook, LevelHooks};
pub use log_level::{AtomicLevel, LogLevel};
pub use logger::{ErrorHandler, ExitFunc, Logger, LoggerBuilder};
pub use message::LogArg;
pub use metrics::LoggerMetrics;
pub use sink::SharedBuffer;
pub use timestamp::TimestampFormat;
pub use writer::LineWriter;
