//! Hook trait and the per-level hook registry
//!
//! Hooks are observers fired synchronously, in registration order, before a
//! record is encoded. A failing or panicking hook is reported and never stops
//! its siblings or the log call.

use super::entry::Entry;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Observer invoked for records at the levels it declares.
///
/// # Example
///
/// ```
/// use rust_field_logger::{Entry, Hook, LogLevel, Result};
///
/// struct AlertHook;
///
/// impl Hook for AlertHook {
///     fn levels(&self) -> &[LogLevel] {
///         &[LogLevel::Error, LogLevel::Fatal, LogLevel::Panic]
///     }
///
///     fn fire(&self, entry: &Entry<'_>) -> Result<()> {
///         // page someone with entry.message()
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "alert"
///     }
/// }
/// ```
pub trait Hook: Send + Sync {
    /// Levels this hook wants to observe
    fn levels(&self) -> &[LogLevel];

    /// Called with a read-only view of the record before it is encoded
    fn fire(&self, entry: &Entry<'_>) -> Result<()>;

    /// Name used when reporting failures
    fn name(&self) -> &str {
        "hook"
    }
}

/// Mapping from level to the hooks registered for it, in registration order.
#[derive(Clone, Default)]
pub struct LevelHooks {
    buckets: HashMap<LogLevel, Vec<Arc<dyn Hook>>>,
}

impl LevelHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` for every level it declares
    pub fn add(&mut self, hook: Arc<dyn Hook>) {
        let levels = hook.levels().to_vec();
        self.register(hook, &levels);
    }

    /// Register `hook` for an explicit set of levels.
    ///
    /// Registering the same hook twice fires it twice.
    pub fn register(&mut self, hook: Arc<dyn Hook>, levels: &[LogLevel]) {
        for level in levels {
            self.buckets
                .entry(*level)
                .or_default()
                .push(Arc::clone(&hook));
        }
    }

    /// Hooks registered for `level`
    pub fn hooks_for(&self, level: LogLevel) -> &[Arc<dyn Hook>] {
        self.buckets.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Fire every hook registered for `level`, collecting failures
    pub fn fire(&self, level: LogLevel, entry: &Entry<'_>) -> Vec<LoggerError> {
        fire_all(self.hooks_for(level), entry)
    }
}

impl fmt::Debug for LevelHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for level in LogLevel::ALL {
            let count = self.hooks_for(level).len();
            if count > 0 {
                map.entry(&level, &count);
            }
        }
        map.finish()
    }
}

/// Fire `hooks` in order with per-hook panic isolation
pub(crate) fn fire_all(hooks: &[Arc<dyn Hook>], entry: &Entry<'_>) -> Vec<LoggerError> {
    let mut failures = Vec::new();

    for hook in hooks {
        let result = catch_unwind(AssertUnwindSafe(|| hook.fire(entry)));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(err @ LoggerError::Hook { .. })) => failures.push(err),
            Ok(Err(err)) => failures.push(LoggerError::hook(hook.name(), err.to_string())),
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                failures.push(LoggerError::hook(
                    hook.name(),
                    format!("panicked: {}", panic_msg),
                ));
            }
        }
    }

    failures
}
