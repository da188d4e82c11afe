//! High-level checking API.
//!
//! # Example
//!
//! ```ignore
//! use include_check::{CheckInput, Checker, CheckerConfig, ProcessEngine};
//!
//! let config = CheckerConfig::builder()
//!     .strict(true)
//!     .working_dir("ui/webui")
//!     .success_stamp("out/webui.stamp")
//!     .build();
//! let checker = Checker::new(ProcessEngine::closure_runner("third_party/runner.jar"), config);
//!
//! // One entry file with its dependencies
//! let input = CheckInput::new()
//!     .with_depends(["cr.js"])
//!     .with_externs(["chrome_send_externs.js"]);
//! let outcome = checker.check("settings.js", &input)?;
//! if outcome.found_errors {
//!     eprintln!("{}", outcome.report);
//! }
//!
//! // Several entry files; touches the stamp only if all of them pass
//! let outcomes = checker.check_all(&["a.js", "b.js"], &input)?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CheckerConfig;
use crate::diagnostic::{format_diagnostics_with_options, CheckError, DiagnosticFilter, Remapper};
use crate::engine::{invoke, Engine, EngineArgs, EngineSummary, ProcessEngine};
use crate::expand::IncludeExpander;
use crate::path::normalize_path;

use super::session::CheckSession;
use super::stamp::touch_stamp;

/// Suffix of declaration files, which are never checked themselves.
pub const EXTERNS_SUFFIX: &str = "_externs.js";

// ============================================================================
// Input / Outcome
// ============================================================================

/// Per-run inputs besides the file being checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInput {
    /// Files inlined ahead of the entry file, in order.
    pub depends: Vec<PathBuf>,
    /// Declaration files handed to the engine.
    pub externs: Vec<PathBuf>,
    /// Where the engine writes compiled output, if anywhere.
    pub out_file: Option<PathBuf>,
}

impl CheckInput {
    /// Empty input: no dependencies, no externs, no output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add dependencies.
    pub fn with_depends<I, P>(mut self, depends: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.depends.extend(depends.into_iter().map(Into::into));
        self
    }

    /// Add declaration files.
    pub fn with_externs<I, P>(mut self, externs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.externs.extend(externs.into_iter().map(Into::into));
        self
    }

    /// Set the output file.
    pub fn with_out_file(mut self, out_file: impl Into<PathBuf>) -> Self {
        self.out_file = Some(out_file.into());
        self
    }
}

/// Result of a check that ran to completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckOutcome {
    /// Whether any diagnostic survived filtering.
    pub found_errors: bool,
    /// Untouched engine output.
    pub raw_output: String,
    /// Filtered diagnostics, pointing at original files.
    pub diagnostics: Vec<String>,
    /// `diagnostics` formatted for display; empty when there are none.
    pub report: String,
    /// The engine's summary line.
    pub summary: Option<EngineSummary>,
    /// The file was a declaration file and was not checked.
    pub skipped: bool,
}

impl CheckOutcome {
    /// Outcome for a file that was not checked.
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// Whether the file passed (or was skipped).
    #[inline]
    pub fn passed(&self) -> bool {
        !self.found_errors
    }
}

/// Whether `path` names a declaration file.
pub fn is_externs_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(EXTERNS_SUFFIX)
}

// ============================================================================
// Checker
// ============================================================================

/// Runs the expand → check → filter → remap → format pipeline.
///
/// The checker itself holds only configuration; each run gets its own
/// [`CheckSession`], so one checker can serve any number of runs.
#[derive(Debug, Clone)]
pub struct Checker<E = ProcessEngine> {
    engine: E,
    config: CheckerConfig,
    filter: DiagnosticFilter,
}

impl<E: Engine> Checker<E> {
    /// Create a checker with the built-in diagnostic filter.
    pub fn new(engine: E, config: CheckerConfig) -> Self {
        Self {
            engine,
            config,
            filter: DiagnosticFilter::default(),
        }
    }

    /// Replace the diagnostic filter.
    pub fn with_filter(mut self, filter: DiagnosticFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Engine in use.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Check one entry file with its dependencies inlined ahead of it.
    ///
    /// Declaration files (`*_externs.js`) are skipped. Temporary files are
    /// removed before returning, whatever the result. Touches the success
    /// stamp when the file passes.
    pub fn check(
        &self,
        source: impl AsRef<Path>,
        input: &CheckInput,
    ) -> Result<CheckOutcome, CheckError> {
        let outcome = self.check_file(source.as_ref(), input)?;
        if outcome.passed() {
            self.touch_success_stamp()?;
        }
        Ok(outcome)
    }

    /// Check one entry file without touching the success stamp.
    pub(crate) fn check_file(
        &self,
        source: &Path,
        input: &CheckInput,
    ) -> Result<CheckOutcome, CheckError> {
        if is_externs_file(source) {
            tracing::debug!(source = %source.display(), "skipping declaration file");
            return Ok(CheckOutcome::skipped());
        }

        let mut session = CheckSession::start(&self.config);
        let result = self.check_in(&mut session, source, input);
        finish(session, result)
    }

    /// Check several files in one engine run, without include expansion.
    ///
    /// `input.depends` are passed ahead of `sources`. Diagnostics are
    /// filtered but keep the engine's file references. Touches the success
    /// stamp when nothing is reported.
    pub fn check_multiple<P: AsRef<Path>>(
        &self,
        sources: &[P],
        input: &CheckInput,
    ) -> Result<CheckOutcome, CheckError> {
        let mut session = CheckSession::start(&self.config);
        let result = self.check_multiple_in(&mut session, sources, input);
        let outcome = finish(session, result)?;
        if outcome.passed() {
            self.touch_success_stamp()?;
        }
        Ok(outcome)
    }

    /// Check several entry files one after another.
    ///
    /// Stops after the first file that reports errors; its outcome is the last
    /// one returned. The success stamp is touched only if every file passed.
    pub fn check_all<P: AsRef<Path>>(
        &self,
        sources: &[P],
        input: &CheckInput,
    ) -> Result<Vec<CheckOutcome>, CheckError> {
        let mut outcomes = Vec::with_capacity(sources.len());
        for source in sources {
            let outcome = self.check_file(source.as_ref(), input)?;
            let failed = outcome.found_errors;
            outcomes.push(outcome);
            if failed {
                return Ok(outcomes);
            }
        }
        self.touch_success_stamp()?;
        Ok(outcomes)
    }

    pub(crate) fn touch_success_stamp(&self) -> Result<(), CheckError> {
        if let Some(stamp) = &self.config.success_stamp {
            touch_stamp(stamp)?;
        }
        Ok(())
    }

    fn check_in(
        &self,
        session: &mut CheckSession,
        source: &Path,
        input: &CheckInput,
    ) -> Result<CheckOutcome, CheckError> {
        let base_dir = self.config.base_dir();
        tracing::debug!(source = %source.display(), base_dir = %base_dir.display(), "checking");

        let expanded = IncludeExpander::new(&base_dir).expand(&input.depends, source)?;
        let buffer = session.write_buffer(&expanded)?;
        create_out_dir(input)?;

        let args = EngineArgs::new([buffer.clone()])
            .with_out_file(input.out_file.clone())
            .with_externs(input.externs.iter().cloned());
        let invocation = invoke(&self.engine, session.temps(), &args, self.config.strict)?;

        let kept = self.filter.apply(invocation.report.diagnostics);
        let entry = normalize_path(source, &base_dir);
        let diagnostics =
            Remapper::new(&buffer, &entry, expanded.provenance()).remap_all(&kept)?;

        Ok(self.outcome(
            &source.display().to_string(),
            diagnostics,
            invocation.raw_output,
            invocation.report.summary,
        ))
    }

    fn check_multiple_in<P: AsRef<Path>>(
        &self,
        session: &mut CheckSession,
        sources: &[P],
        input: &CheckInput,
    ) -> Result<CheckOutcome, CheckError> {
        let sources: Vec<PathBuf> = input
            .depends
            .iter()
            .cloned()
            .chain(sources.iter().map(|s| s.as_ref().to_path_buf()))
            .collect();
        tracing::debug!(count = sources.len(), "checking sources together");
        create_out_dir(input)?;

        let label = sources
            .iter()
            .map(|s| s.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let args = EngineArgs::new(sources)
            .with_out_file(input.out_file.clone())
            .with_externs(input.externs.iter().cloned());
        let invocation = invoke(&self.engine, session.temps(), &args, self.config.strict)?;

        let diagnostics = self.filter.apply(invocation.report.diagnostics);
        Ok(self.outcome(
            &label,
            diagnostics,
            invocation.raw_output,
            invocation.report.summary,
        ))
    }

    fn outcome(
        &self,
        label: &str,
        diagnostics: Vec<String>,
        raw_output: String,
        summary: EngineSummary,
    ) -> CheckOutcome {
        let report = format_diagnostics_with_options(&diagnostics, &self.config.diagnostics);
        let found_errors = !diagnostics.is_empty();
        if found_errors {
            tracing::error!("Error in: {label}\n{report}");
        }
        CheckOutcome {
            found_errors,
            raw_output,
            diagnostics,
            report,
            summary: Some(summary),
            skipped: false,
        }
    }
}

/// Release the session, preferring the run's own error over a cleanup error.
fn finish<T>(session: CheckSession, result: Result<T, CheckError>) -> Result<T, CheckError> {
    match (result, session.finish()) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), cleanup) => {
            if let Err(cleanup) = cleanup {
                tracing::warn!("failed to remove temporary files: {cleanup}");
            }
            Err(e)
        }
    }
}

fn create_out_dir(input: &CheckInput) -> Result<(), CheckError> {
    if let Some(out) = &input.out_file
        && let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        tracing::debug!(dir = %parent.display(), "creating output directory");
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
