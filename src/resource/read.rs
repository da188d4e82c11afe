//! Source file reading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::Utf8Error;

use thiserror::Error;

/// Error raised while reading a source file from disk.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The path names a directory.
    #[error("{} is a directory", path.display())]
    IsDirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// The file is not valid UTF-8.
    #[error("{} is not valid UTF-8", path.display())]
    InvalidUtf8 {
        /// Offending path.
        path: PathBuf,
    },
}

impl FileError {
    fn from_io(source: io::Error, path: &Path) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// An original input file: its path plus its decoded text.
///
/// Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
}

impl SourceFile {
    /// Read and decode a file from disk.
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, FileError> {
        let path = path.into();
        let bytes = read_disk(&path)?;
        let text = decode_utf8(&bytes)
            .map_err(|_| FileError::InvalidUtf8 { path: path.clone() })?
            .to_owned();
        Ok(Self { path, text })
    }

    /// Path the file was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decoded file contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Iterate the file's lines (`\n` or `\r\n` terminated).
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }
}

/// Decode bytes as UTF-8, stripping BOM if present.
pub fn decode_utf8(buf: &[u8]) -> Result<&str, Utf8Error> {
    let buf = buf.strip_prefix(b"\xef\xbb\xbf").unwrap_or(buf);
    std::str::from_utf8(buf)
}

/// Read file from disk.
fn read_disk(path: &Path) -> Result<Vec<u8>, FileError> {
    let map_err = |e| FileError::from_io(e, path);
    fs::metadata(path).map_err(map_err).and_then(|m| {
        if m.is_dir() {
            Err(FileError::IsDirectory {
                path: path.to_path_buf(),
            })
        } else {
            fs::read(path).map_err(map_err)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_decode_utf8_valid() {
        let text = "Hello, 世界!";
        assert_eq!(decode_utf8(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_decode_utf8_strips_bom() {
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(b"var x = 1;");
        assert_eq!(decode_utf8(&bytes).unwrap(), "var x = 1;");
    }

    #[test]
    fn test_decode_utf8_invalid() {
        assert!(decode_utf8(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_read_source_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.js");
        fs::write(&path, "var a;\r\nvar b;\n").unwrap();

        let file = SourceFile::read(&path).unwrap();
        assert_eq!(file.path(), path);
        assert_eq!(file.lines().collect::<Vec<_>>(), ["var a;", "var b;"]);
    }

    #[test]
    fn test_read_directory() {
        let dir = TempDir::new().unwrap();
        let err = SourceFile::read(dir.path()).unwrap_err();
        assert!(matches!(err, FileError::IsDirectory { .. }));
    }

    #[test]
    fn test_read_nonexistent() {
        let err = SourceFile::read("/nonexistent/file.js").unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.js");
        fs::write(&path, b"\xff\xfe\x00").unwrap();
        assert!(matches!(
            SourceFile::read(&path).unwrap_err(),
            FileError::InvalidUtf8 { .. }
        ));
    }
}
