//! Closure Compiler flag sets and argument-list assembly.

use std::path::PathBuf;

/// Flags passed on every run.
pub const COMMON_ARGS: &[&str] = &[
    "--accept_const_keyword",
    "--jscomp_error=accessControls",
    "--jscomp_error=ambiguousFunctionDecl",
    "--jscomp_error=checkStructDictInheritance",
    "--jscomp_error=checkTypes",
    "--jscomp_error=checkVars",
    "--jscomp_error=constantProperty",
    "--jscomp_error=deprecated",
    "--jscomp_error=externsValidation",
    "--jscomp_error=globalThis",
    "--jscomp_error=invalidCasts",
    "--jscomp_error=missingProperties",
    "--jscomp_error=missingReturn",
    "--jscomp_error=nonStandardJsDocs",
    "--jscomp_error=suspiciousCode",
    "--jscomp_error=undefinedNames",
    "--jscomp_error=undefinedVars",
    "--jscomp_error=unknownDefines",
    "--jscomp_error=uselessCode",
    "--jscomp_error=visibility",
    "--language_in=ECMASCRIPT5_STRICT",
    "--summary_detail_level=3",
    "--compilation_level=SIMPLE_OPTIMIZATIONS",
    "--source_map_format=V3",
];

/// Extra checks turned on in strict mode.
pub const STRICT_ARGS: &[&str] = &[
    "--jscomp_error=reportUnknownTypes",
    "--jscomp_error=duplicate",
    "--jscomp_error=misplacedTypeAnnotation",
];

/// Checks turned off in lenient mode.
///
/// `duplicate` fires whenever one file is `<include>`d more than once, and
/// `misplacedTypeAnnotation` fires on annotated `cr.defineProperty()` calls.
pub const DISABLED_ARGS: &[&str] = &[
    "--jscomp_off=duplicate",
    "--jscomp_off=misplacedTypeAnnotation",
];

/// The fixed flags for the given mode.
pub fn flag_set(strict: bool) -> impl Iterator<Item = &'static str> {
    let mode = if strict { STRICT_ARGS } else { DISABLED_ARGS };
    COMMON_ARGS.iter().chain(mode).copied()
}

/// Per-run inputs for one engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineArgs {
    /// Files to check.
    pub sources: Vec<PathBuf>,
    /// Where compiled output goes, if anywhere.
    pub out_file: Option<PathBuf>,
    /// Declaration (externs) files.
    pub externs: Vec<PathBuf>,
}

impl EngineArgs {
    /// Check `sources` with no output file and no externs.
    pub fn new<I, P>(sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Write compiled output (and a `.map` source map) to `out_file`.
    pub fn with_out_file(mut self, out_file: Option<PathBuf>) -> Self {
        self.out_file = out_file;
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

    /// The full argument list: fixed flags, then per-run arguments.
    pub fn to_args(&self, strict: bool) -> Vec<String> {
        let mut args: Vec<String> = flag_set(strict).map(String::from).collect();
        args.extend(self.sources.iter().map(|s| format!("--js={}", s.display())));
        if let Some(out) = &self.out_file {
            args.push(format!("--js_output_file={}", out.display()));
            args.push(format!("--create_source_map={}.map", out.display()));
        }
        args.extend(self.externs.iter().map(|e| format!("--externs={}", e.display())));
        args
    }

    /// Contents of the argument-list file handed to the runner.
    pub fn args_file_contents(&self, strict: bool) -> String {
        format!(" {}", self.to_args(strict).join(" "))
    }
}
