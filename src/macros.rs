//! Logging macros for ergonomic log message formatting.
//!
//! Each macro forwards `format!`-style arguments to the formatted shape
//! (`logf`) of a [`Logger`](crate::Logger) or an [`Entry`](crate::Entry),
//! so the message is only rendered when the level passes the threshold.
//!
//! # Examples
//!
//! ```
//! use rust_field_logger::prelude::*;
//! use rust_field_logger::info;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::builder().output(buffer.clone()).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments, on an entry carrying context
//! let port = 8080;
//! info!(logger.with_field("component", "http"), "listening on port {}", port);
//!
//! assert!(buffer.contents().contains("msg=\"listening on port 8080\""));
//! ```

/// Log a formatted message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_field_logger::prelude::*;
/// # let logger = Logger::builder().output(SharedBuffer::new()).build();
/// use rust_field_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.logf($level, ::std::format_args!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the logger's exit path.
///
/// # Examples
///
/// ```
/// # use rust_field_logger::prelude::*;
/// use rust_field_logger::fatal;
/// let logger = Logger::builder()
///     .output(SharedBuffer::new())
///     .exit_func(|code| assert_eq!(code, 1))
///     .build();
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Log a panic-level message, then panic with it.
///
/// # Examples
///
/// ```should_panic
/// # use rust_field_logger::prelude::*;
/// use rust_field_logger::panic_log;
/// let logger = Logger::builder().output(SharedBuffer::new()).build();
/// panic_log!(logger, "invariant broken: {} < 0", -1);
/// ```
#[macro_export]
macro_rules! panic_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Panic, $($arg)+)
    };
}
