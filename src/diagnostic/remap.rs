//! Rewriting buffer locations to original-source locations.

use std::fmt::Write;
use std::path::Path;

use thiserror::Error;

use crate::expand::{ProvenanceError, ProvenanceMap};

/// A diagnostic referenced a buffer line the provenance map does not cover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot remap diagnostic: {source}\n{diagnostic}")]
pub struct RemapError {
    /// The diagnostic being rewritten.
    pub diagnostic: String,
    /// The failed lookup.
    #[source]
    pub source: ProvenanceError,
}

/// Rewrites `<buffer>:<line>` references in diagnostic text.
///
/// Two passes run over each diagnostic: every `<buffer>:<line>` becomes
/// `<original file>:<original line>`, then any remaining bare `<buffer>`
/// mention becomes the entry file's path.
#[derive(Debug, Clone)]
pub struct Remapper<'a> {
    buffer: String,
    entry: String,
    provenance: &'a ProvenanceMap,
}

impl<'a> Remapper<'a> {
    /// Create a remapper for diagnostics produced against `buffer_path`.
    ///
    /// `entry_path` should be absolute; it is printed verbatim.
    pub fn new(buffer_path: &Path, entry_path: &Path, provenance: &'a ProvenanceMap) -> Self {
        Self {
            buffer: buffer_path.display().to_string(),
            entry: entry_path.display().to_string(),
            provenance,
        }
    }

    /// Rewrite one diagnostic.
    pub fn remap(&self, diagnostic: &str) -> Result<String, RemapError> {
        let located = self.remap_lines(diagnostic).map_err(|source| RemapError {
            diagnostic: diagnostic.to_owned(),
            source,
        })?;
        Ok(located.replace(&self.buffer, &self.entry))
    }

    /// Rewrite every diagnostic, failing on the first bad reference.
    pub fn remap_all<S: AsRef<str>>(&self, diagnostics: &[S]) -> Result<Vec<String>, RemapError> {
        diagnostics.iter().map(|d| self.remap(d.as_ref())).collect()
    }

    /// Replace each `<buffer>:<digits>` with its original location.
    fn remap_lines(&self, text: &str) -> Result<String, ProvenanceError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(pos) = rest.find(&self.buffer) {
            let after = &rest[pos + self.buffer.len()..];
            let digits = after
                .strip_prefix(':')
                .map_or(0, |s| s.bytes().take_while(u8::is_ascii_digit).count());

            if digits > 0 {
                // A number too large for `usize` is past the end of any buffer.
                let loc = match after[1..1 + digits].parse::<usize>() {
                    Ok(line) => self.provenance.locate(line)?,
                    Err(_) => {
                        return Err(ProvenanceError::NotCovered {
                            line: usize::MAX,
                            total_lines: self.provenance.total_lines(),
                        });
                    }
                };
                out.push_str(&rest[..pos]);
                _ = write!(out, "{loc}");
                rest = &after[1 + digits..];
            } else {
                // Bare mention; left for the second pass.
                let end = pos + self.buffer.len();
                out.push_str(&rest[..end]);
                rest = &rest[end..];
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Rewrite one diagnostic against `provenance`.
pub fn remap(
    diagnostic: &str,
    buffer_path: &Path,
    entry_path: &Path,
    provenance: &ProvenanceMap,
) -> Result<String, RemapError> {
    Remapper::new(buffer_path, entry_path, provenance).remap(diagnostic)
}
