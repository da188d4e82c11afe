//! Include expansion.
//!
//! Resolves `<include src="...">` directives into one flat buffer, building the
//! buffer text and its [`ProvenanceMap`] in lockstep:
//!
//! ```text
//! main.js                     buffer            provenance
//! ─────────────────────────   ───────────────   ─────────────────
//! 1 var a;                    1 var a;          1..=1 → main.js:1
//! 2 <include src="b.js">      2 var b1;         2..=3 → b.js:1
//! 3 a();                      3 var b2;
//!                             4 a();            4..=4 → main.js:3
//! ```
//!
//! The directive line itself is consumed. A file included from several places
//! is emitted once per inclusion. Root requests (explicit dependencies, then
//! the entry file) are resolved against the expander's base directory; nested
//! directives against the directory of the file that contains them.

mod directive;
mod provenance;

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::path::normalize_path;
use crate::resource::{FileError, SourceFile};

pub use directive::find_include;
pub use provenance::{Location, ProvenanceEntry, ProvenanceError, ProvenanceMap};

use provenance::ProvenanceBuilder;

/// Error raised while expanding includes.
#[derive(Debug, Error)]
pub enum ExpandError {
    /// A source file could not be read.
    #[error(transparent)]
    File(#[from] FileError),

    /// A file (transitively) includes itself.
    #[error("include cycle: {}", IncludeChain(.chain))]
    Cycle {
        /// Inclusion stack, ending with the file that closes the cycle.
        chain: Vec<PathBuf>,
    },
}

struct IncludeChain<'a>(&'a [PathBuf]);

impl fmt::Display for IncludeChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// A flattened buffer plus the provenance of each of its lines.
#[derive(Debug, Clone)]
pub struct ExpandedSource {
    text: String,
    provenance: ProvenanceMap,
}

impl ExpandedSource {
    /// Buffer text, one `\n`-terminated line per emitted source line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Provenance of every buffer line.
    pub fn provenance(&self) -> &ProvenanceMap {
        &self.provenance
    }

    /// Number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.provenance.total_lines()
    }
}

/// Recursive `<include>` expander.
#[derive(Debug, Clone)]
pub struct IncludeExpander {
    base_dir: PathBuf,
}

impl IncludeExpander {
    /// Create an expander resolving root requests against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Expand `depends` (in order) followed by `entry` into one buffer.
    pub fn expand<P: AsRef<Path>>(
        &self,
        depends: &[P],
        entry: &Path,
    ) -> Result<ExpandedSource, ExpandError> {
        let mut expansion = Expansion::default();
        for root in depends.iter().map(|p| p.as_ref()).chain([entry]) {
            expansion.inline_file(normalize_path(root, &self.base_dir))?;
        }
        Ok(expansion.finish())
    }
}

/// State of one expansion run.
struct Expansion {
    text: String,
    provenance: ProvenanceBuilder,
    stack: Vec<PathBuf>,
    active: FxHashSet<PathBuf>,
}

impl Default for Expansion {
    fn default() -> Self {
        Self {
            text: String::new(),
            provenance: ProvenanceBuilder::new(),
            stack: Vec::new(),
            active: FxHashSet::default(),
        }
    }
}

impl Expansion {
    /// Emit `path` at the current buffer position, recursing into its
    /// directives depth-first.
    fn inline_file(&mut self, path: PathBuf) -> Result<(), ExpandError> {
        if !self.active.insert(path.clone()) {
            let mut chain = self.stack.clone();
            chain.push(path);
            return Err(ExpandError::Cycle { chain });
        }
        self.stack.push(path.clone());

        let file = SourceFile::read(&path)?;
        let dir = path.parent().unwrap_or(Path::new(""));

        // Pending run of plain lines: first origin line and length.
        let mut run_start = 1;
        let mut run_len = 0;

        for (idx, line) in file.lines().enumerate() {
            let line_no = idx + 1;
            match find_include(line) {
                Some(src) => {
                    self.provenance.record(&path, run_start, run_len);
                    self.inline_file(normalize_path(Path::new(src), dir))?;
                    run_start = line_no + 1;
                    run_len = 0;
                }
                None => {
                    self.text.push_str(line);
                    self.text.push('\n');
                    run_len += 1;
                }
            }
        }
        self.provenance.record(&path, run_start, run_len);

        self.stack.pop();
        self.active.remove(&path);
        Ok(())
    }

    fn finish(self) -> ExpandedSource {
        ExpandedSource {
            text: self.text,
            provenance: self.provenance.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn write(&self, name: &str, text: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, text).unwrap();
            path.canonicalize().unwrap()
        }

        fn expander(&self) -> IncludeExpander {
            IncludeExpander::new(self.dir.path())
        }
    }

    fn assert_partition(map: &ProvenanceMap, lines: usize) {
        assert_eq!(map.total_lines(), lines);
        let mut next = 1;
        for entry in map.entries() {
            assert_eq!(entry.expanded_line_start, next);
            assert!(entry.expanded_line_count > 0);
            next = entry.expanded_line_end();
        }
        assert_eq!(next, lines + 1);
    }

    #[test]
    fn test_no_directives() {
        let fx = Fixture::new();
        let main = fx.write("main.js", "var a = 1;\nvar b = 2;\n");

        let out = fx.expander().expand::<&Path>(&[], Path::new("main.js")).unwrap();
        assert_eq!(out.text(), "var a = 1;\nvar b = 2;\n");
        assert_eq!(out.line_count(), 2);
        assert_eq!(
            out.provenance().entries(),
            [ProvenanceEntry::new(1, 2, &main, 1)]
        );
    }

    #[test]
    fn test_nested_include() {
        let fx = Fixture::new();
        let a = fx.write(
            "a.js",
            "a1\na2\na3\n<include src=\"lib/b.js\">\na5\n",
        );
        let b = fx.write("lib/b.js", "b1\nb2\n");

        let out = fx.expander().expand::<&Path>(&[], &a).unwrap();
        assert_eq!(out.text(), "a1\na2\na3\nb1\nb2\na5\n");
        assert_partition(out.provenance(), 6);

        let map = out.provenance();
        assert_eq!(map.locate(4).unwrap(), Location { file: &b, line: 1 });
        assert_eq!(map.locate(5).unwrap(), Location { file: &b, line: 2 });
        assert_eq!(map.locate(6).unwrap(), Location { file: &a, line: 5 });
    }

    #[test]
    fn test_nested_relative_to_includer() {
        let fx = Fixture::new();
        let main = fx.write("main.js", "<include src=\"ui/view.js\">\nmain();\n");
        fx.write("ui/view.js", "<include src=\"../util.js\">\nview();\n");
        let util = fx.write("util.js", "util();\n");

        let out = fx.expander().expand::<&Path>(&[], Path::new("main.js")).unwrap();
        assert_eq!(out.text(), "util();\nview();\nmain();\n");
        assert_eq!(out.provenance().locate(1).unwrap().file, util);
        assert_eq!(out.provenance().locate(3).unwrap(), Location { file: &main, line: 2 });
    }

    #[test]
    fn test_depends_prepended_in_order() {
        let fx = Fixture::new();
        let d1 = fx.write("d1.js", "d1\n");
        fx.write("d2.js", "d2a\nd2b\n");
        let main = fx.write("main.js", "m\n");

        let out = fx
            .expander()
            .expand(&["d1.js", "d2.js"], Path::new("main.js"))
            .unwrap();
        assert_eq!(out.text(), "d1\nd2a\nd2b\nm\n");
        assert_partition(out.provenance(), 4);
        assert_eq!(out.provenance().locate(1).unwrap().file, d1);
        assert_eq!(out.provenance().locate(4).unwrap(), Location { file: &main, line: 1 });
    }

    #[test]
    fn test_duplicate_include_is_reemitted() {
        let fx = Fixture::new();
        let shared = fx.write("shared.js", "s\n");
        fx.write(
            "main.js",
            "<include src=\"shared.js\">\nx\n<include src=\"shared.js\">\n",
        );

        let out = fx.expander().expand(&["shared.js"], Path::new("main.js")).unwrap();
        assert_eq!(out.text(), "s\ns\nx\ns\n");
        assert_partition(out.provenance(), 4);
        for line in [1, 2, 4] {
            assert_eq!(out.provenance().locate(line).unwrap(), Location { file: &shared, line: 1 });
        }
    }

    #[test]
    fn test_leaf_origin_only() {
        let fx = Fixture::new();
        let outer = fx.write("outer.js", "<include src=\"inner.js\">\n");
        fx.write("inner.js", "i1\ni2\n");

        let out = fx.expander().expand::<&Path>(&[], &outer).unwrap();
        assert!(out.provenance().entries().iter().all(|e| e.origin_file != outer));
        assert_partition(out.provenance(), 2);
    }

    #[test]
    fn test_empty_files() {
        let fx = Fixture::new();
        fx.write("empty.js", "");
        let main = fx.write("main.js", "<include src=\"empty.js\">\n\nlast\n");

        let out = fx.expander().expand(&["empty.js"], &main).unwrap();
        assert_eq!(out.text(), "\nlast\n");
        assert_partition(out.provenance(), 2);
        assert_eq!(out.provenance().locate(2).unwrap(), Location { file: &main, line: 3 });
    }

    #[test]
    fn test_crlf_and_missing_trailing_newline() {
        let fx = Fixture::new();
        let main = fx.write("main.js", "a\r\n<include src=\"b.js\">\r\nc");
        fx.write("b.js", "b");

        let out = fx.expander().expand::<&Path>(&[], &main).unwrap();
        assert_eq!(out.text(), "a\nb\nc\n");
        assert_eq!(out.provenance().locate(3).unwrap(), Location { file: &main, line: 3 });
    }

    #[test]
    fn test_cycle_detected() {
        let fx = Fixture::new();
        fx.write("a.js", "<include src=\"b.js\">\n");
        fx.write("b.js", "<include src=\"a.js\">\n");

        let err = fx.expander().expand::<&Path>(&[], Path::new("a.js")).unwrap_err();
        let ExpandError::Cycle { chain } = &err else {
            panic!("expected cycle, got {err:?}");
        };
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.first(), chain.last());
        assert!(err.to_string().contains(" -> "));
    }

    #[test]
    fn test_missing_include() {
        let fx = Fixture::new();
        fx.write("main.js", "<include src=\"gone.js\">\n");

        let err = fx.expander().expand::<&Path>(&[], Path::new("main.js")).unwrap_err();
        assert!(matches!(err, ExpandError::File(FileError::Io { .. })));
    }
}
