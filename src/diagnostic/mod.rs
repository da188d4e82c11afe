//! Post-processing of engine diagnostics: filtering, remapping and formatting.

mod error;
mod filter;
mod format;
mod promise;
mod remap;

pub use error::CheckError;
pub use filter::{filter_diagnostics, DiagnosticFilter, FilterType, REDECLARED_MARKER};
pub use format::{format_diagnostics, format_diagnostics_with_options, DiagnosticOptions, LINE_MARKER};
pub use promise::is_promise_false_positive;
pub use remap::{remap, RemapError, Remapper};
