//! Call-site capture for records logged with caller reporting enabled

use std::fmt;

/// Frames inspected before giving up on finding a caller
pub const MAXIMUM_CALLER_DEPTH: usize = 25;

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Paths whose frames never count as the call site
const INTERNAL_PREFIXES: [&str; 5] = [CRATE_PREFIX, "backtrace::", "std::", "core::", "alloc::"];

/// Caller information extracted from the call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerInfo {
    /// Source file path.
    pub file: String,
    /// Line number.
    pub line: u32,
    /// Fully qualified function name.
    pub function: String,
}

impl CallerInfo {
    /// Walks the stack to the first frame outside this crate.
    ///
    /// Symbol resolution is expensive, so the walk stops after
    /// [`MAXIMUM_CALLER_DEPTH`] frames and returns `None` when no
    /// external frame was seen by then.
    #[must_use]
    pub fn capture() -> Option<Self> {
        let mut found: Option<CallerInfo> = None;
        let mut depth = 0;

        backtrace::trace(|frame| {
            depth += 1;
            backtrace::resolve_frame(frame, |symbol| {
                if found.is_some() {
                    return;
                }
                let Some(name) = symbol.name() else {
                    return;
                };
                let function = format!("{:#}", name);
                if is_internal_frame(&function) {
                    return;
                }
                found = Some(CallerInfo {
                    file: symbol
                        .filename()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                    line: symbol.lineno().unwrap_or(0),
                    function,
                });
            });
            found.is_none() && depth < MAXIMUM_CALLER_DEPTH
        });

        found
    }

    /// `file:line` rendering used by the `file` output key
    pub fn file_line(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

impl fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.function, self.file, self.line)
    }
}

/// Judges a frame by the path it is defined on.
///
/// `<T as Trait>::method` belongs to `T`, so a user type implementing one
/// of this crate's traits is still a call site.
fn is_internal_frame(function: &str) -> bool {
    let path = function
        .trim_start_matches('<')
        .trim_start_matches('&')
        .trim_start_matches("mut ")
        .trim_start_matches("dyn ");
    INTERNAL_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}
