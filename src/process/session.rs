//! Per-invocation check context.
//!
//! A [`Checker`](super::Checker) holds only immutable configuration. Everything
//! one run creates lives in a [`CheckSession`] and is torn down with it.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::CheckerConfig;
use crate::expand::ExpandedSource;
use crate::resource::TempFiles;

/// Owns the temporary files of one check run.
///
/// Call [`finish`](Self::finish) on every exit path to surface cleanup errors;
/// dropping an unfinished session still removes its files.
///
/// # Example
///
/// ```ignore
/// let mut session = CheckSession::start(&config);
/// let result = run(&mut session);
/// session.finish()?;
/// ```
#[derive(Debug)]
pub struct CheckSession {
    temps: TempFiles,
}

impl CheckSession {
    /// Start a session placing temporary files where `config` asks.
    pub fn start(config: &CheckerConfig) -> Self {
        let temps = match &config.temp_dir {
            Some(dir) => TempFiles::in_dir(dir),
            None => TempFiles::new(),
        };
        Self { temps }
    }

    /// Write the expanded buffer to a temporary file and return its path.
    pub fn write_buffer(&mut self, expanded: &ExpandedSource) -> io::Result<PathBuf> {
        let path = self.temps.create("expanded", ".js", expanded.text())?;
        tracing::debug!(
            buffer = %path.display(),
            lines = expanded.line_count(),
            "wrote expanded buffer"
        );
        Ok(path)
    }

    /// Temporary files owned by this session.
    pub fn temps(&mut self) -> &mut TempFiles {
        &mut self.temps
    }

    /// Paths of the files this session currently owns.
    pub fn temp_paths(&self) -> Vec<&Path> {
        self.temps.paths().collect()
    }

    /// Remove every temporary file.
    #[inline]
    pub fn finish(mut self) -> io::Result<()> {
        self.temps.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::IncludeExpander;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_session_writes_and_removes_buffer() {
        let src = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        fs::write(src.path().join("main.js"), "var a;\nvar b;\n").unwrap();

        let config = CheckerConfig::builder().temp_dir(scratch.path()).build();
        let expanded = IncludeExpander::new(src.path())
            .expand::<&Path>(&[], Path::new("main.js"))
            .unwrap();

        let mut session = CheckSession::start(&config);
        let buffer = session.write_buffer(&expanded).unwrap();
        assert!(buffer.starts_with(scratch.path()));
        assert_eq!(fs::read_to_string(&buffer).unwrap(), "var a;\nvar b;\n");
        assert_eq!(session.temp_paths(), [buffer.as_path()]);

        session.finish().unwrap();
        assert!(!buffer.exists());
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_dropped_session_cleans_up() {
        let scratch = TempDir::new().unwrap();
        let config = CheckerConfig::builder().temp_dir(scratch.path()).build();

        let path = {
            let mut session = CheckSession::start(&config);
            session.temps().create("args", ".txt", "x").unwrap()
        };
        assert!(!path.exists());
    }
}
