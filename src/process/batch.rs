//! Parallel checking of independent entry files.
//!
//! Every file gets its own [`CheckSession`](super::CheckSession), so runs share
//! nothing but the checker's configuration and engine.
//!
//! # Example
//!
//! ```ignore
//! let results = checker.check_parallel(&files, &CheckInput::new())?;
//! for (file, result) in files.iter().zip(&results) {
//!     match result {
//!         Ok(outcome) if outcome.found_errors => eprintln!("{}", outcome.report),
//!         Ok(_) => {}
//!         Err(e) => eprintln!("{file}: {e}"),
//!     }
//! }
//! ```

use std::path::Path;

use crate::diagnostic::CheckError;
use crate::engine::Engine;

use super::check::{CheckInput, CheckOutcome, Checker};

impl<E: Engine> Checker<E> {
    /// Check multiple entry files in parallel.
    ///
    /// Returns results in the same order as `sources`. Unlike
    /// [`check_all`](Checker::check_all), every file is checked. The success
    /// stamp is touched only if every file ran and passed.
    pub fn check_parallel<P: AsRef<Path> + Sync>(
        &self,
        sources: &[P],
        input: &CheckInput,
    ) -> Result<Vec<Result<CheckOutcome, CheckError>>, CheckError> {
        self.check_parallel_each(sources, input, |_| {})
    }

    /// Check multiple entry files in parallel with a callback per file.
    ///
    /// Like `check_parallel`, but invokes the callback once per file checked.
    /// Useful for progress tracking.
    pub fn check_parallel_each<P, F>(
        &self,
        sources: &[P],
        input: &CheckInput,
        on_each: F,
    ) -> Result<Vec<Result<CheckOutcome, CheckError>>, CheckError>
    where
        P: AsRef<Path> + Sync,
        F: Fn(&Path) + Sync,
    {
        use rayon::prelude::*;

        if sources.is_empty() {
            return Ok(vec![]);
        }

        let results: Vec<_> = sources
            .par_iter()
            .map(|source| {
                let source = source.as_ref();
                let result = self.check_file(source, input);
                on_each(source);
                result
            })
            .collect();

        let all_passed = results
            .iter()
            .all(|r| r.as_ref().is_ok_and(CheckOutcome::passed));
        tracing::debug!(files = results.len(), all_passed, "parallel check finished");
        if all_passed {
            self.touch_success_stamp()?;
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::CheckerConfig;
    use crate::diagnostic::DiagnosticOptions;
    use crate::engine::EngineOutput;
    use crate::process::{CheckInput, Checker};
    use std::fs;
    use std::io;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn engine(args_file: &Path) -> io::Result<EngineOutput> {
        let args = fs::read_to_string(args_file)?;
        let buffer = args
            .split_whitespace()
            .find_map(|a| a.strip_prefix("--js="))
            .unwrap_or_default();
        let text = fs::read_to_string(buffer)?;
        let stderr = if text.contains("bad") {
            format!("{buffer}:1: ERROR - bad\n\n1 error(s), 0 warning(s), 100.0% typed")
        } else {
            "0 error(s), 0 warning(s), 100.0% typed".to_owned()
        };
        Ok(EngineOutput::new(0, stderr))
    }

    fn setup(files: &[(&str, &str)]) -> (TempDir, TempDir, CheckerConfig) {
        let src = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        for (name, text) in files {
            fs::write(src.path().join(name), text).unwrap();
        }
        let config = CheckerConfig::builder()
            .working_dir(src.path())
            .temp_dir(scratch.path())
            .diagnostics(DiagnosticOptions::plain())
            .success_stamp(src.path().join("ok.stamp"))
            .build();
        (src, scratch, config)
    }

    #[test]
    fn test_parallel_all_pass() {
        let names = ["a.js", "b.js", "c.js", "d.js"];
        let (src, scratch, config) = setup(&names.map(|n| (n, "var ok;\n")));
        let checker = Checker::new(engine, config);

        let count = AtomicUsize::new(0);
        let results = checker
            .check_parallel_each(&names, &CheckInput::new(), |_| {
                count.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.as_ref().unwrap().passed()));
        assert_eq!(count.load(Ordering::Relaxed), 4);
        assert!(src.path().join("ok.stamp").is_file());
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_parallel_keeps_order_and_checks_everything() {
        let (src, _scratch, config) =
            setup(&[("a.js", "var ok;\n"), ("b.js", "bad;\n"), ("c.js", "var ok;\n")]);
        let checker = Checker::new(engine, config);

        let results = checker
            .check_parallel(&["a.js", "b.js", "c.js", "missing.js"], &CheckInput::new())
            .unwrap();

        assert!(results[0].as_ref().unwrap().passed());
        assert!(results[1].as_ref().unwrap().found_errors);
        assert!(results[2].as_ref().unwrap().passed());
        assert!(results[3].is_err());
        assert!(!src.path().join("ok.stamp").exists());
    }

    #[test]
    fn test_parallel_empty() {
        let (src, _scratch, config) = setup(&[]);
        let checker = Checker::new(engine, config);
        let none: [&str; 0] = [];
        assert!(checker.check_parallel(&none, &CheckInput::new()).unwrap().is_empty());
        assert!(!src.path().join("ok.stamp").exists());
    }
}
