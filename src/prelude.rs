//! Prelude module for convenient imports.
//!
//! ```ignore
//! use include_check::prelude::*;
//! ```

// Pipeline
pub use crate::process::{CheckInput, CheckOutcome, Checker};

// Engine
pub use crate::engine::{Engine, EngineOutput, ProcessEngine};

// Configuration
pub use crate::config::{CheckerConfig, CheckerConfigBuilder};

// Diagnostics
pub use crate::diagnostic::{CheckError, DiagnosticFilter, DiagnosticOptions, FilterType};
