//! Line provenance for an expanded buffer.
//!
//! A [`ProvenanceMap`] is an ordered list of [`ProvenanceEntry`] values that
//! partitions the buffer's lines `1..=total_lines` with no gaps or overlaps.
//! Each entry binds a run of buffer lines to a run of lines in one leaf source
//! file. The map is built once during expansion and read-only afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error raised by provenance construction or lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvenanceError {
    /// A buffer line is outside every entry.
    #[error("expanded line {line} is not covered by the provenance map ({total_lines} lines)")]
    NotCovered {
        /// The line that was looked up (1-based).
        line: usize,
        /// Number of lines the map covers.
        total_lines: usize,
    },

    /// An entry list does not tile the buffer contiguously from line 1.
    #[error("provenance entry {index} starts at line {found}, expected {expected}")]
    Malformed {
        /// Index of the offending entry.
        index: usize,
        /// Line the entry should start at.
        expected: usize,
        /// Line the entry actually starts at.
        found: usize,
    },

    /// An entry spans zero lines or starts at origin line 0.
    #[error("provenance entry {index} is empty or starts at origin line 0")]
    EmptyEntry {
        /// Index of the offending entry.
        index: usize,
    },
}

/// A run of buffer lines bound to a run of lines in an original file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceEntry {
    /// First buffer line of the run (1-based).
    pub expanded_line_start: usize,
    /// Number of lines in the run.
    pub expanded_line_count: usize,
    /// Leaf source file the lines come from.
    pub origin_file: PathBuf,
    /// Line in `origin_file` matching `expanded_line_start` (1-based).
    pub origin_line_start: usize,
}

impl ProvenanceEntry {
    /// Create an entry.
    pub fn new(
        expanded_line_start: usize,
        expanded_line_count: usize,
        origin_file: impl Into<PathBuf>,
        origin_line_start: usize,
    ) -> Self {
        Self {
            expanded_line_start,
            expanded_line_count,
            origin_file: origin_file.into(),
            origin_line_start,
        }
    }

    /// One past the last buffer line of the run.
    #[inline]
    pub fn expanded_line_end(&self) -> usize {
        self.expanded_line_start + self.expanded_line_count
    }

    /// Whether `line` falls inside this run.
    #[inline]
    pub fn contains(&self, line: usize) -> bool {
        (self.expanded_line_start..self.expanded_line_end()).contains(&line)
    }
}

/// A resolved original-source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    /// Original file.
    pub file: &'a Path,
    /// Line in `file` (1-based).
    pub line: usize,
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Ordered, gap-free index from buffer lines to original positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceMap {
    entries: Vec<ProvenanceEntry>,
}

impl ProvenanceMap {
    /// Build a map from hand-written entries, checking that they tile the
    /// buffer from line 1 without gaps or overlaps.
    pub fn from_entries(entries: Vec<ProvenanceEntry>) -> Result<Self, ProvenanceError> {
        let mut expected = 1;
        for (index, entry) in entries.iter().enumerate() {
            if entry.expanded_line_count == 0 || entry.origin_line_start == 0 {
                return Err(ProvenanceError::EmptyEntry { index });
            }
            if entry.expanded_line_start != expected {
                return Err(ProvenanceError::Malformed {
                    index,
                    expected,
                    found: entry.expanded_line_start,
                });
            }
            expected = entry.expanded_line_end();
        }
        Ok(Self { entries })
    }

    /// Map a 1-based buffer line to its original file and line.
    ///
    /// A miss means the diagnostic refers to a line the expander never
    /// emitted, which is a pipeline bug rather than a user error.
    pub fn locate(&self, expanded_line: usize) -> Result<Location<'_>, ProvenanceError> {
        let idx = self
            .entries
            .partition_point(|e| e.expanded_line_end() <= expanded_line);
        match self.entries.get(idx) {
            Some(entry) if entry.contains(expanded_line) => Ok(Location {
                file: &entry.origin_file,
                line: entry.origin_line_start + (expanded_line - entry.expanded_line_start),
            }),
            _ => Err(ProvenanceError::NotCovered {
                line: expanded_line,
                total_lines: self.total_lines(),
            }),
        }
    }

    /// All entries, in buffer order.
    pub fn entries(&self) -> &[ProvenanceEntry] {
        &self.entries
    }

    /// Number of buffer lines covered.
    pub fn total_lines(&self) -> usize {
        self.entries.last().map_or(0, |e| e.expanded_line_end() - 1)
    }

    /// Whether the map covers no lines.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates entries while the expander emits lines.
///
/// Entries are appended strictly in buffer order, so the resulting map is
/// contiguous by construction.
#[derive(Debug)]
pub(crate) struct ProvenanceBuilder {
    entries: Vec<ProvenanceEntry>,
    next_line: usize,
}

impl ProvenanceBuilder {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_line: 1,
        }
    }

    /// Record that `count` lines of `origin`, starting at `origin_line_start`,
    /// were just appended to the buffer.
    pub(crate) fn record(&mut self, origin: &Path, origin_line_start: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.entries.push(ProvenanceEntry::new(
            self.next_line,
            count,
            origin,
            origin_line_start,
        ));
        self.next_line += count;
    }

    /// Number of lines recorded so far.
    pub(crate) fn lines(&self) -> usize {
        self.next_line - 1
    }

    pub(crate) fn finish(self) -> ProvenanceMap {
        ProvenanceMap {
            entries: self.entries,
        }
    }
}
