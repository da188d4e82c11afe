//! Scoped temporary files.
//!
//! Every file created through [`TempFiles`] is tracked and removed either by an
//! explicit [`TempFiles::release`] or, at the latest, when the set is dropped.
//! Early returns and panics in the pipeline therefore never leak files.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempPath};

/// A batch of owned temporary files.
#[derive(Debug, Default)]
pub struct TempFiles {
    dir: Option<PathBuf>,
    files: Vec<TempPath>,
}

impl TempFiles {
    /// Create an empty set that places files in the system temp directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set that places files in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            files: Vec::new(),
        }
    }

    /// Create, write and close a tracked temporary file.
    ///
    /// Returns the path of the new file. The file stays on disk until the set
    /// is released.
    pub fn create(&mut self, prefix: &str, suffix: &str, contents: &str) -> io::Result<PathBuf> {
        let mut builder = Builder::new();
        builder.prefix(prefix).suffix(suffix);
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(contents.as_bytes())?;
        file.flush()?;

        let path = file.into_temp_path();
        let owned = path.to_path_buf();
        self.files.push(path);
        Ok(owned)
    }

    /// Paths of every file currently tracked.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|p| &**p)
    }

    /// Number of tracked files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are tracked.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Delete every tracked file.
    ///
    /// All files are attempted even if one fails; the first failure is
    /// returned. After this call the set is empty.
    pub fn release(&mut self) -> io::Result<()> {
        if self.files.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            files = %self
                .paths()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            "deleting temp files"
        );

        let mut first_err = None;
        for file in self.files.drain(..) {
            if let Err(e) = file.close()
                && first_err.is_none()
            {
                first_err = Some(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(error = %e, "failed to delete temp files");
        }
    }
}
