//! Configuration for include-check.
//!
//! A [`CheckerConfig`] is built once, usually through [`CheckerConfigBuilder`],
//! and shared by every run of a [`Checker`](crate::Checker).

use std::path::{Path, PathBuf};

use crate::diagnostic::DiagnosticOptions;

/// Runtime configuration for a checker.
#[derive(Debug, Clone, Default)]
pub struct CheckerConfig {
    /// Use the strict flag set instead of the lenient one.
    pub strict: bool,
    /// Base directory for root include requests.
    /// Defaults to the process working directory.
    pub working_dir: Option<PathBuf>,
    /// Directory for temporary files. Defaults to the system temp directory.
    pub temp_dir: Option<PathBuf>,
    /// How diagnostic reports are rendered.
    pub diagnostics: DiagnosticOptions,
    /// File touched after a run in which every checked file passed.
    pub success_stamp: Option<PathBuf>,
}

impl CheckerConfig {
    /// Start building a configuration.
    pub fn builder() -> CheckerConfigBuilder {
        CheckerConfigBuilder::new()
    }

    /// Base directory for root include requests, resolved against the
    /// process working directory when unset.
    pub fn base_dir(&self) -> PathBuf {
        match &self.working_dir {
            Some(dir) => crate::path::absolute_path(dir),
            None => crate::path::absolute_path(Path::new(".")),
        }
    }
}

/// Configuration builder for fluent API.
///
/// # Example
///
/// ```
/// use include_check::config::CheckerConfigBuilder;
///
/// let config = CheckerConfigBuilder::new()
///     .strict(true)
///     .working_dir("/src/project")
///     .success_stamp("/out/check.stamp")
///     .build();
///
/// assert!(config.strict);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CheckerConfigBuilder {
    config: CheckerConfig,
}

impl CheckerConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the strict (`true`) or lenient (`false`) flag set.
    ///
    /// Default: lenient.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Set the base directory for root include requests.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    /// Set the directory temporary files are created in.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    /// Set diagnostic formatting options.
    pub fn diagnostics(mut self, options: DiagnosticOptions) -> Self {
        self.config.diagnostics = options;
        self
    }

    /// Set the success stamp file.
    pub fn success_stamp(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.success_stamp = Some(path.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> CheckerConfig {
        self.config
    }
}
