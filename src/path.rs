//! Path utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with `base` if relative
#[inline]
pub fn normalize_path(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    joined.canonicalize().unwrap_or(joined)
}

/// Normalize a path against the process working directory.
pub fn absolute_path(path: &Path) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => normalize_path(path, &cwd),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_absolute_path_kept_when_missing() {
        let path = Path::new("/abs/path/foo.js");
        assert_eq!(normalize_path(path, Path::new("/elsewhere")), path);
    }

    #[test]
    fn test_relative_joined_with_base() {
        let path = normalize_path(Path::new("lib/foo.js"), Path::new("/nonexistent/root"));
        assert_eq!(path, Path::new("/nonexistent/root/lib/foo.js"));
    }

    #[test]
    fn test_existing_path_canonicalized() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();

        let path = normalize_path(Path::new("sub/../a.js"), dir.path());
        assert_eq!(path, dir.path().canonicalize().unwrap().join("a.js"));
    }

    #[test]
    fn test_absolute_path_uses_cwd() {
        let path = absolute_path(Path::new("does-not-exist.js"));
        assert!(path.is_absolute());
        assert!(path.ends_with("does-not-exist.js"));
    }
}
