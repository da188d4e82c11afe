//! Check error type.

use thiserror::Error;

use super::remap::RemapError;
use crate::expand::ExpandError;

/// Error type for checks that could not run to completion.
///
/// Diagnostics reported by the engine are not errors: they come back as a
/// successful [`CheckOutcome`](crate::CheckOutcome) with `found_errors` set.
/// Every variant here is an infrastructure failure.
///
/// # Example
///
/// ```ignore
/// match checker.check("main.js", &CheckInput::default()) {
///     Ok(outcome) if outcome.found_errors => eprintln!("{}", outcome.report),
///     Ok(_) => {}
///     Err(CheckError::MissingSummary { output }) => {
///         eprintln!("engine did not finish:\n{output}");
///     }
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum CheckError {
    /// The engine output did not end in a summary line.
    #[error("engine output has no summary line:\n{output}")]
    MissingSummary {
        /// Full raw engine output.
        output: String,
    },

    /// The engine process could not be started or waited on.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was run.
        program: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Include expansion failed.
    #[error("expansion failed: {0}")]
    Expand(#[from] ExpandError),

    /// A diagnostic could not be mapped back to its source.
    #[error(transparent)]
    Remap(#[from] RemapError),
}

impl CheckError {
    /// Raw engine output carried by this error, if any.
    pub fn engine_output(&self) -> Option<&str> {
        match self {
            Self::MissingSummary { output } => Some(output),
            _ => None,
        }
    }
}
