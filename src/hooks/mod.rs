//! Bundled hook implementations

pub mod capture;
pub mod writer;

pub use capture::{CaptureHook, CapturedEntry};
pub use writer::WriterHook;
