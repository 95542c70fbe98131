//! Main logger implementation

use super::{
    entry::Entry,
    error::LoggerError,
    fields::{FieldValue, Fields},
    hooks::{self, Hook, LevelHooks},
    log_level::{AtomicLevel, LogLevel},
    message::LogArg,
    metrics::LoggerMetrics,
    writer::LineWriter,
};
use crate::formatters::Formatter;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::io::{self, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process termination hook invoked after a `Fatal` record is written
pub type ExitFunc = Arc<dyn Fn(i32) + Send + Sync>;

/// Side-channel reporter for hook, formatter and sink failures
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

type ExitHandler = Arc<dyn Fn() + Send + Sync>;

fn default_exit_func() -> ExitFunc {
    Arc::new(|code| std::process::exit(code))
}

fn default_error_handler() -> ErrorHandler {
    Arc::new(|err| eprintln!("[LOGGER ERROR] {}", err))
}

macro_rules! root_shapes {
    ($($plain:ident, $ln:ident, $f:ident;)*) => {
        $(
            #[inline]
            pub fn $plain(&self, args: &[&dyn LogArg]) {
                self.new_entry().$plain(args);
            }

            #[inline]
            pub fn $ln(&self, args: &[&dyn LogArg]) {
                self.new_entry().$ln(args);
            }

            #[inline]
            pub fn $f(&self, args: fmt::Arguments<'_>) {
                self.new_entry().$f(args);
            }
        )*
    };
}

/// Owns the sink, formatter, hooks and threshold.
///
/// All configuration goes through `&self`, so a logger can be shared by
/// reference (or in an `Arc`) between threads and reconfigured while in use.
///
/// # Example
///
/// ```
/// use rust_field_logger::{LogLevel, Logger, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .output(buffer.clone())
///     .build();
///
/// logger.with_field("user", "alice").debugf(format_args!("{} items", 3));
/// assert!(buffer.contents().contains("msg=\"3 items\""));
/// ```
pub struct Logger {
    out: Mutex<Box<dyn Write + Send>>,
    formatter: RwLock<Arc<Formatter>>,
    hooks: RwLock<LevelHooks>,
    level: AtomicLevel,
    report_caller: AtomicBool,
    exit_func: RwLock<ExitFunc>,
    exit_handlers: RwLock<Vec<ExitHandler>>,
    error_handler: RwLock<ErrorHandler>,
    /// Counters for swallowed failures and written records
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger writing text records to stderr at `Info`
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Current threshold
    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level.load()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level);
    }

    /// Returns true when a record at `level` would pass the threshold
    #[inline]
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        level.permits(self.level.load())
    }

    #[inline]
    pub fn report_caller(&self) -> bool {
        self.report_caller.load(Ordering::Relaxed)
    }

    pub fn set_report_caller(&self, enabled: bool) {
        self.report_caller.store(enabled, Ordering::Relaxed);
    }

    /// Formatter in effect for the next record
    pub fn formatter(&self) -> Arc<Formatter> {
        Arc::clone(&*self.formatter.read())
    }

    pub fn set_formatter(&self, formatter: impl Into<Formatter>) {
        *self.formatter.write() = Arc::new(formatter.into());
    }

    /// Swap the sink; records already written stay with the old one
    pub fn set_output<W: Write + Send + 'static>(&self, output: W) {
        *self.out.lock() = Box::new(output);
    }

    /// Register `hook` for every level it declares
    pub fn add_hook<H: Hook + 'static>(&self, hook: H) {
        self.hooks.write().add(Arc::new(hook));
    }

    /// Install `hooks` as the registry, returning the previous one
    pub fn replace_hooks(&self, hooks: LevelHooks) -> LevelHooks {
        std::mem::replace(&mut *self.hooks.write(), hooks)
    }

    pub fn set_exit_func<F>(&self, exit_func: F)
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        *self.exit_func.write() = Arc::new(exit_func);
    }

    pub fn set_error_handler<F>(&self, handler: F)
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        *self.error_handler.write() = Arc::new(handler);
    }

    /// Run `handler` before the exit function when a `Fatal` record is logged.
    ///
    /// Handlers run in registration order.
    pub fn register_exit_handler<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.exit_handlers.write().push(Arc::new(handler));
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Root entry with no fields
    pub fn new_entry(&self) -> Entry<'_> {
        Entry::new(self)
    }

    /// Root entry carrying one field; the logger itself is untouched
    pub fn with_field<K, V>(&self, key: K, value: V) -> Entry<'_>
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.new_entry().with_field(key, value)
    }

    pub fn with_fields(&self, fields: impl Into<Fields>) -> Entry<'_> {
        self.new_entry().with_fields(fields)
    }

    pub fn with_error(&self, err: &(dyn std::error::Error + '_)) -> Entry<'_> {
        self.new_entry().with_error(err)
    }

    pub fn with_time(&self, time: DateTime<Utc>) -> Entry<'_> {
        self.new_entry().with_time(time)
    }

    pub fn log(&self, level: LogLevel, args: &[&dyn LogArg]) {
        self.new_entry().log(level, args);
    }

    pub fn logln(&self, level: LogLevel, args: &[&dyn LogArg]) {
        self.new_entry().logln(level, args);
    }

    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.new_entry().logf(level, args);
    }

    root_shapes! {
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

    /// Writer that logs every line written to it at `level`
    pub fn writer(&self, level: LogLevel) -> LineWriter<'_> {
        self.new_entry().writer(level)
    }

    /// Run the exit handlers, then the exit function
    pub fn exit(&self, code: i32) {
        let handlers = self.exit_handlers.read().clone();
        for handler in handlers {
            if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| handler())) {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                self.report_error(&LoggerError::other(format!(
                    "exit handler panicked: {}",
                    panic_msg
                )));
            }
        }

        let exit_func = Arc::clone(&*self.exit_func.read());
        exit_func(code);
    }

    /// Fire the hooks registered for `level` against a finished record.
    ///
    /// The bucket is cloned so hooks run without holding the registry lock
    /// and may themselves log through this logger.
    pub(crate) fn fire_hooks(&self, level: LogLevel, entry: &Entry<'_>) {
        let bucket: Vec<Arc<dyn Hook>> = self.hooks.read().hooks_for(level).to_vec();
        if bucket.is_empty() {
            return;
        }

        for err in hooks::fire_all(&bucket, entry) {
            self.metrics.record_hook_failure();
            self.report_error(&err);
        }
    }

    /// Encode a finished record and hand it to the sink
    pub(crate) fn write_entry(&self, entry: &Entry<'_>) {
        let bytes = match self.formatter().format(entry) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.metrics.record_format_failure();
                self.report_error(&err);
                return;
            }
        };

        let result = {
            let mut out = self.out.lock();
            out.write_all(&bytes).and_then(|()| out.flush())
        };

        match result {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(e) => {
                self.metrics.record_write_failure();
                self.report_error(&LoggerError::sink_write(e));
            }
        }
    }

    fn report_error(&self, err: &LoggerError) {
        let handler = Arc::clone(&*self.error_handler.read());
        handler(err);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("report_caller", &self.report_caller())
            .field("formatter", &self.formatter().name())
            .field("hooks", &*self.hooks.read())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_field_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .formatter(JsonFormatter::new())
///     .output(std::io::stdout())
///     .report_caller(true)
///     .exit_func(|code| eprintln!("would exit with {}", code))
///     .build();
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    output: Option<Box<dyn Write + Send>>,
    formatter: Formatter,
    hooks: LevelHooks,
    report_caller: bool,
    exit_func: Option<ExitFunc>,
    error_handler: Option<ErrorHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            output: None,
            formatter: Formatter::default(),
            hooks: LevelHooks::new(),
            report_caller: false,
            exit_func: None,
            error_handler: None,
        }
    }

    /// Set the initial threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the sink; defaults to stderr
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: impl Into<Formatter>) -> Self {
        self.formatter = formatter.into();
        self
    }

    /// Add a hook for every level it declares
    #[must_use = "builder methods return a new value"]
    pub fn hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.hooks.add(Arc::new(hook));
        self
    }

    /// Start from a prepared registry instead of an empty one
    #[must_use = "builder methods return a new value"]
    pub fn hooks(mut self, hooks: LevelHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = enabled;
        self
    }

    /// Replace `std::process::exit` as the `Fatal` terminator
    #[must_use = "builder methods return a new value"]
    pub fn exit_func<F>(mut self, exit_func: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.exit_func = Some(Arc::new(exit_func));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            out: Mutex::new(self.output.unwrap_or_else(|| Box::new(io::stderr()))),
            formatter: RwLock::new(Arc::new(self.formatter)),
            hooks: RwLock::new(self.hooks),
            level: AtomicLevel::new(self.level),
            report_caller: AtomicBool::new(self.report_caller),
            exit_func: RwLock::new(self.exit_func.unwrap_or_else(default_exit_func)),
            exit_handlers: RwLock::new(Vec::new()),
            error_handler: RwLock::new(self.error_handler.unwrap_or_else(default_error_handler)),
            metrics: LoggerMetrics::new(),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use crate::core::sink::SharedBuffer;
    use crate::core::timestamp::TimestampFormat;
    use crate::formatters::{JsonFormatter, TextFormatter};
    use std::sync::atomic::AtomicI32;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct CountingHook {
        levels: Vec<LogLevel>,
        fired: Arc<AtomicI32>,
    }

    impl Hook for CountingHook {
        fn levels(&self) -> &[LogLevel] {
            &self.levels
        }

        fn fire(&self, _entry: &Entry<'_>) -> Result<()> {
            self.fired.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();

        assert_eq!(logger.level(), LogLevel::Info);
        assert!(!logger.report_caller());
        assert_eq!(logger.formatter().name(), "text");
        assert_eq!(logger.metrics().records_written(), 0);
    }

    #[test]
    fn test_set_level_changes_filtering() {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder().output(buffer.clone()).build();

        logger.debug(&[&"hidden"]);
        assert!(buffer.is_empty());

        logger.set_level(LogLevel::Debug);
        logger.debug(&[&"shown"]);
        assert!(buffer.contents().contains("msg=shown"));
    }

    #[test]
    fn test_hooks_skip_below_threshold() {
        let fired = Arc::new(AtomicI32::new(0));
        let logger = Logger::builder()
            .output(SharedBuffer::new())
            .level(LogLevel::Warn)
            .hook(CountingHook {
                levels: LogLevel::ALL.to_vec(),
                fired: Arc::clone(&fired),
            })
            .build();

        logger.info(&[&"below"]);
        logger.error(&[&"above"]);

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replace_hooks_returns_previous() {
        let fired = Arc::new(AtomicI32::new(0));
        let logger = Logger::builder().output(SharedBuffer::new()).build();
        logger.add_hook(CountingHook {
            levels: vec![LogLevel::Info],
            fired: Arc::clone(&fired),
        });

        let old = logger.replace_hooks(LevelHooks::new());
        logger.info(&[&"after replace"]);

        assert_eq!(old.hooks_for(LogLevel::Info).len(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_sink_failure_is_reported_not_raised() {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let reported_clone = Arc::clone(&reported);
        let logger = Logger::builder()
            .output(FailingWriter)
            .error_handler(move |err| reported_clone.lock().push(err.to_string()))
            .build();

        logger.info(&[&"lost"]);

        assert_eq!(logger.metrics().write_failures(), 1);
        assert_eq!(logger.metrics().records_written(), 0);
        let reported = reported.lock();
        assert_eq!(reported.len(), 1);
        assert!(reported[0].contains("sink closed"));
    }

    #[test]
    fn test_bad_timestamp_pattern_is_reported_not_raised() {
        let buffer = SharedBuffer::new();
        let reported = Arc::new(Mutex::new(Vec::new()));
        let reported_clone = Arc::clone(&reported);
        let logger = Logger::builder()
            .output(buffer.clone())
            .formatter(
                TextFormatter::new().with_timestamp_format(TimestampFormat::Custom("%Q".into())),
            )
            .error_handler(move |err| reported_clone.lock().push(err.to_string()))
            .build();

        logger.info(&[&"hi"]);
        logger.set_formatter(
            JsonFormatter::new().with_timestamp_format(TimestampFormat::Custom("%Q".into())),
        );
        logger.info(&[&"hi"]);

        assert!(buffer.is_empty());
        assert_eq!(logger.metrics().format_failures(), 2);
        assert_eq!(logger.metrics().records_written(), 0);
        let reported = reported.lock();
        assert_eq!(reported.len(), 2);
        assert!(reported[0].contains("invalid strftime pattern"), "{}", reported[0]);
    }

    #[test]
    fn test_fatal_runs_handlers_then_exit_func() {
        let buffer = SharedBuffer::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let exit_order = Arc::clone(&order);
        let logger = Logger::builder()
            .output(buffer.clone())
            .exit_func(move |code| exit_order.lock().push(format!("exit {}", code)))
            .build();

        let first = Arc::clone(&order);
        logger.register_exit_handler(move || first.lock().push("first".to_string()));
        logger.register_exit_handler(|| panic!("handler failed"));
        let third = Arc::clone(&order);
        logger.register_exit_handler(move || third.lock().push("third".to_string()));
        logger.set_error_handler(|_| {});

        logger.fatal(&[&"shutting down"]);

        assert!(buffer.contents().contains("level=fatal"));
        assert_eq!(*order.lock(), vec!["first", "third", "exit 1"]);
    }

    #[test]
    fn test_fatal_exits_even_below_threshold() {
        let code = Arc::new(AtomicI32::new(-1));
        let code_clone = Arc::clone(&code);
        let buffer = SharedBuffer::new();
        let logger = Logger::builder()
            .output(buffer.clone())
            .level(LogLevel::Panic)
            .exit_func(move |c| code_clone.store(c, Ordering::SeqCst))
            .build();

        logger.fatalf(format_args!("not written"));

        assert!(buffer.is_empty());
        assert_eq!(code.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_formatter_switches_encoding() {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder().output(buffer.clone()).build();

        logger.set_formatter(JsonFormatter::new());
        logger.with_field("k", 1).info(&[&"json now"]);

        let value: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        assert_eq!(value["msg"], "json now");
        assert_eq!(value["k"], 1);
    }

    #[test]
    fn test_set_output_redirects() {
        let first = SharedBuffer::new();
        let second = SharedBuffer::new();
        let logger = Logger::builder().output(first.clone()).build();

        logger.info(&[&"one"]);
        logger.set_output(second.clone());
        logger.info(&[&"two"]);

        assert_eq!(first.lines().len(), 1);
        assert_eq!(second.lines().len(), 1);
        assert_eq!(logger.metrics().records_written(), 2);
    }

    #[test]
    fn test_chained_fields_do_not_taint_logger() {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder().output(buffer.clone()).build();

        logger.with_field("request", 7).info(&[&"first"]);
        logger.info(&[&"second"]);

        let lines = buffer.lines();
        assert!(lines[0].contains("request=7"));
        assert!(!lines[1].contains("request"));
    }
}
