//! # include-check
//!
//! Type-check JavaScript sources that use `<include src="...">` directives
//! with an external checker such as the Closure Compiler.
//!
//! The checker cannot read include directives, so every run:
//!
//! - **Expands** the entry file (and its explicit dependencies) into one flat
//!   buffer, recording where each buffer line came from
//! - **Invokes** the engine on that buffer through an argument-list file
//! - **Filters** diagnostics that the inlining itself provokes
//! - **Remaps** buffer locations back to `original_file:line`
//! - **Formats** what is left for the terminal
//!
//! Temporary files created by a run are removed when it ends, whether it
//! passes, reports diagnostics or fails.
//!
//! ## Quick Start
//!
//! ```ignore
//! use include_check::{CheckInput, Checker, CheckerConfig, ProcessEngine};
//!
//! let engine = ProcessEngine::closure_runner("third_party/closure/runner.jar");
//! let config = CheckerConfig::builder().strict(true).build();
//! let checker = Checker::new(engine, config);
//!
//! let outcome = checker.check("settings.js", &CheckInput::new().with_depends(["cr.js"]))?;
//! if outcome.found_errors {
//!     eprintln!("{}", outcome.report);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`expand`]: include expansion and the provenance map
//! - [`engine`]: engine arguments, invocation and output splitting
//! - [`diagnostic`]: filtering, remapping and formatting
//! - [`process`]: the [`Checker`] pipeline
//! - [`config`]: runtime configuration
//! - [`resource`]: source reading and temporary files

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod expand;
pub mod path;
pub mod prelude;
pub mod process;
pub mod resource;

// =============================================================================
// Pipeline
// =============================================================================

pub use process::{is_externs_file, touch_stamp, CheckInput, CheckOutcome, CheckSession, Checker};

// =============================================================================
// Stages
// =============================================================================

pub use diagnostic::{
    // Error type
    CheckError,
    // Filtering
    DiagnosticFilter, FilterType,
    // Remapping
    RemapError, Remapper,
    // Formatting
    format_diagnostics, format_diagnostics_with_options, DiagnosticOptions,
};
pub use engine::{
    invoke, Engine, EngineArgs, EngineOutput, EngineReport, EngineSummary, Invocation,
    ProcessEngine,
};
pub use expand::{
    ExpandError, ExpandedSource, IncludeExpander, Location, ProvenanceEntry, ProvenanceError,
    ProvenanceMap,
};

// =============================================================================
// Infrastructure
// =============================================================================

pub use config::{CheckerConfig, CheckerConfigBuilder};
pub use resource::{FileError, SourceFile, TempFiles};
