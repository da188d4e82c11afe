//! External checker invocation.
//!
//! The engine is a black box: it receives an argument-list file and returns a
//! diagnostic stream on stderr. [`Engine`] is the seam; [`ProcessEngine`] runs
//! a real subprocess (by default the Closure Compiler runner jar), and any
//! `Fn(&Path) -> io::Result<EngineOutput>` closure works as an in-process
//! engine.

mod args;
mod summary;

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::diagnostic::CheckError;
use crate::resource::TempFiles;

pub use args::{flag_set, EngineArgs, COMMON_ARGS, DISABLED_ARGS, STRICT_ARGS};
pub use summary::{split_output, EngineReport, EngineSummary};

/// JVM invocation used for the runner jar.
const JAR_COMMAND: &[&str] = &["-jar", "-Xms1024m", "-client", "-XX:+TieredCompilation"];

/// What the engine process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Everything written to stderr.
    pub stderr: String,
}

impl EngineOutput {
    /// Output of a process that exited with `exit_code`.
    pub fn new(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stderr: stderr.into(),
        }
    }
}

/// A type-checking engine driven through an argument-list file.
pub trait Engine: Send + Sync {
    /// Run the engine with `--compiler-args-file=<args_file>` and wait for it.
    fn run(&self, args_file: &Path) -> io::Result<EngineOutput>;

    /// Short name for logs and errors.
    fn name(&self) -> String {
        "engine".to_owned()
    }
}

impl<F> Engine for F
where
    F: Fn(&Path) -> io::Result<EngineOutput> + Send + Sync,
{
    fn run(&self, args_file: &Path) -> io::Result<EngineOutput> {
        self(args_file)
    }
}

/// Runs the engine as a blocking subprocess.
///
/// The final argument is always `--compiler-args-file=<file>`. Stdout is
/// discarded and stderr captured. No timeout is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessEngine {
    /// Run `program` with no leading arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Run the Closure Compiler runner jar through `java`.
    pub fn closure_runner(jar: impl AsRef<Path>) -> Self {
        Self::new("java")
            .with_args(JAR_COMMAND.iter().copied())
            .with_arg(jar.as_ref().display().to_string())
    }

    /// Append one leading argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append leading arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program that is spawned.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args_file: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(format!("--compiler-args-file={}", args_file.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Engine for ProcessEngine {
    fn run(&self, args_file: &Path) -> io::Result<EngineOutput> {
        tracing::debug!(
            program = %self.program.display(),
            args = %self.args.join(" "),
            args_file = %args_file.display(),
            "running engine"
        );
        let output = self.command(args_file).output()?;
        Ok(EngineOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }
}

/// A completed engine run whose output ended in a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Diagnostic blocks and summary.
    pub report: EngineReport,
    /// The untouched stderr stream.
    pub raw_output: String,
    /// Process exit code.
    pub exit_code: Option<i32>,
}

/// Write the argument file for `args`, run `engine`, and split its output.
///
/// The argument file is created in `temps` and removed with it. A stream with
/// no recognizable summary is an infrastructure failure and is returned as
/// [`CheckError::MissingSummary`] carrying the full output.
pub fn invoke<E: Engine + ?Sized>(
    engine: &E,
    temps: &mut TempFiles,
    args: &EngineArgs,
    strict: bool,
) -> Result<Invocation, CheckError> {
    let contents = args.args_file_contents(strict);
    tracing::debug!(args = %contents.trim(), "engine arguments");

    let args_file = temps.create("closure-args", ".txt", &contents)?;
    tracing::debug!(args_file = %args_file.display(), "wrote args file");

    let output = engine.run(&args_file).map_err(|source| CheckError::Spawn {
        program: engine.name(),
        source,
    })?;

    match split_output(&output.stderr) {
        Some(report) => {
            tracing::debug!(summary = %report.summary, "engine finished");
            Ok(Invocation {
                report,
                raw_output: output.stderr,
                exit_code: output.exit_code,
            })
        }
        None => {
            tracing::error!(
                exit_code = ?output.exit_code,
                "engine output has no summary:\n{}",
                output.stderr
            );
            Err(CheckError::MissingSummary {
                output: output.stderr,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const SUMMARY: &str = "0 error(s), 0 warning(s), 100.0% typed";

    #[test]
    fn test_closure_runner_command() {
        let engine = ProcessEngine::closure_runner("/opt/closure/runner.jar");
        assert_eq!(engine.program(), Path::new("java"));
        assert_eq!(
            engine.args,
            [
                "-jar",
                "-Xms1024m",
                "-client",
                "-XX:+TieredCompilation",
                "/opt/closure/runner.jar"
            ]
        );
        assert_eq!(engine.name(), "java");
    }

    #[test]
    fn test_invoke_passes_args_file() {
        let dir = TempDir::new().unwrap();
        let mut temps = TempFiles::in_dir(dir.path());
        let seen = Mutex::new(String::new());

        let engine = |path: &Path| -> io::Result<EngineOutput> {
            *seen.lock().unwrap() = fs::read_to_string(path)?;
            Ok(EngineOutput::new(0, SUMMARY))
        };

        let args = EngineArgs::new(["/tmp/expanded.js"]).with_externs(["chrome_externs.js"]);
        let inv = invoke(&engine, &mut temps, &args, false).unwrap();

        assert_eq!(*seen.lock().unwrap(), args.args_file_contents(false));
        assert!(inv.report.diagnostics.is_empty());
        assert_eq!(inv.raw_output, SUMMARY);
        assert_eq!(inv.exit_code, Some(0));
        assert_eq!(temps.len(), 1);
    }

    #[test]
    fn test_invoke_missing_summary() {
        let mut temps = TempFiles::new();
        let engine = |_: &Path| -> io::Result<EngineOutput> {
            Ok(EngineOutput::new(1, "Exception in thread \"main\"\n"))
        };

        let err = invoke(&engine, &mut temps, &EngineArgs::new(["a.js"]), true).unwrap_err();
        match err {
            CheckError::MissingSummary { output } => assert!(output.contains("Exception")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invoke_spawn_failure() {
        let mut temps = TempFiles::new();
        let engine = ProcessEngine::new("/nonexistent/include-check-engine");

        let err = invoke(&engine, &mut temps, &EngineArgs::new(["a.js"]), false).unwrap_err();
        assert!(matches!(err, CheckError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_engine_captures_stderr() {
        let mut temps = TempFiles::new();
        // `sh -c SCRIPT NAME ARGS_FILE`: the script echoes its args-file flag.
        let engine = ProcessEngine::new("sh").with_args([
            "-c",
            "echo \"x.js:1: ERROR - saw $1\" >&2; echo >&2; echo '1 error(s), 0 warning(s), 50.0% typed' >&2; echo ignored",
            "engine",
        ]);

        let inv = invoke(&engine, &mut temps, &EngineArgs::new(["x.js"]), false).unwrap();
        assert_eq!(inv.exit_code, Some(0));
        assert_eq!(inv.report.diagnostics.len(), 1);
        assert!(inv.report.diagnostics[0].contains("saw --compiler-args-file="));
        assert_eq!(inv.report.summary.errors, Some(1));
        assert!(!inv.raw_output.contains("ignored"));
    }
}
