//! Splitting the engine's diagnostic stream.
//!
//! The engine writes diagnostic blocks separated by blank lines and ends with a
//! summary such as `2 error(s), 0 warning(s), 87.5% typed`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*error.*warning.*typed").expect("summary regex is valid"));

static COUNTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+error\(s\),\s*(\d+)\s+warning\(s\)(?:,\s*([\d.]+)%\s+typed)?")
        .expect("summary counts regex is valid")
});

/// The engine's final summary line.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSummary {
    /// The raw summary block.
    pub line: String,
    /// Reported error count, if it could be parsed.
    pub errors: Option<usize>,
    /// Reported warning count, if it could be parsed.
    pub warnings: Option<usize>,
    /// Reported typed percentage, if present.
    pub typed_percent: Option<f64>,
}

impl EngineSummary {
    /// Recognize `block` as a summary. Returns `None` if it is not one.
    pub fn parse(block: &str) -> Option<Self> {
        if !SUMMARY_RE.is_match(block) {
            return None;
        }

        let caps = COUNTS_RE.captures(block);
        let group = |i| caps.as_ref().and_then(|c| c.get(i)).map(|m| m.as_str());
        Some(Self {
            line: block.to_owned(),
            errors: group(1).and_then(|s| s.parse().ok()),
            warnings: group(2).and_then(|s| s.parse().ok()),
            typed_percent: group(3).and_then(|s| s.parse().ok()),
        })
    }
}

impl fmt::Display for EngineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Diagnostic blocks plus the summary that closed the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineReport {
    /// Diagnostic blocks, in engine order.
    pub diagnostics: Vec<String>,
    /// The stream's summary.
    pub summary: EngineSummary,
}

/// Split raw engine output into diagnostic blocks and the summary.
///
/// Returns `None` when the last block is not a summary, meaning the engine did
/// not run to completion.
pub fn split_output(stderr: &str) -> Option<EngineReport> {
    let mut blocks: Vec<String> = stderr.trim().split("\n\n").map(String::from).collect();
    let summary = EngineSummary::parse(&blocks.pop()?)?;
    Some(EngineReport {
        diagnostics: blocks,
        summary,
    })
}
