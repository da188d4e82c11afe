//! Diagnostic formatting utilities.

// ============================================================================
// Options
// ============================================================================

/// Marker placed in front of every diagnostic line.
pub const LINE_MARKER: &str = "## ";

/// Options for controlling diagnostic formatting.
///
/// # Example
///
/// ```
/// use include_check::diagnostic::DiagnosticOptions;
///
/// // Default: colored markers
/// let opts = DiagnosticOptions::default();
/// assert!(opts.colored);
///
/// // Plain text (no ANSI colors) for logging
/// let opts = DiagnosticOptions::plain();
/// assert!(!opts.colored);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticOptions {
    /// Whether to use ANSI colors in output.
    pub colored: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self { colored: true }
    }
}

impl DiagnosticOptions {
    /// Create options for colored terminal output.
    pub fn colored() -> Self {
        Self::default()
    }

    /// Create options for plain text output (no ANSI colors).
    pub fn plain() -> Self {
        Self { colored: false }
    }

    /// Set whether to use colors.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }
}

// ============================================================================
// Coloring
// ============================================================================

#[cfg(feature = "colored-diagnostics")]
fn colorize(text: &str) -> String {
    use owo_colors::OwoColorize;
    text.red().to_string()
}

#[cfg(not(feature = "colored-diagnostics"))]
fn colorize(text: &str) -> String {
    text.to_owned()
}

// ============================================================================
// Formatting
// ============================================================================

/// Format diagnostics as plain text.
///
/// Diagnostics are separated by a blank line and every line is prefixed with
/// `## `. No diagnostics yields an empty string.
pub fn format_diagnostics<S: AsRef<str>>(diagnostics: &[S]) -> String {
    format_diagnostics_with_options(diagnostics, &DiagnosticOptions::plain())
}

/// Format diagnostics with custom options.
pub fn format_diagnostics_with_options<S: AsRef<str>>(
    diagnostics: &[S],
    options: &DiagnosticOptions,
) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let marker = if options.colored {
        colorize(LINE_MARKER)
    } else {
        LINE_MARKER.to_owned()
    };

    let joined = diagnostics
        .iter()
        .map(|d| d.as_ref())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut out = String::with_capacity(joined.len() + marker.len() * 8);
    for (i, line) in joined.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&marker);
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_empty() {
        let none: [&str; 0] = [];
        assert_eq!(format_diagnostics(&none), "");
        assert_eq!(
            format_diagnostics_with_options(&none, &DiagnosticOptions::colored()),
            ""
        );
    }

    #[test]
    fn test_format_single() {
        let out = format_diagnostics(&["a.js:3: ERROR - variable x is undeclared\nx = 1;\n^"]);
        assert_eq!(
            out,
            "## a.js:3: ERROR - variable x is undeclared\n## x = 1;\n## ^"
        );
    }

    #[test]
    fn test_format_multiple_separated() {
        let out = format_diagnostics(&["a.js:1: ERROR - one", "a.js:2: ERROR - two"]);
        assert_eq!(out, "## a.js:1: ERROR - one\n## \n## a.js:2: ERROR - two");
    }

    #[test]
    fn test_format_plain_has_no_ansi() {
        let out = format_diagnostics_with_options(&["a.js:1: x"], &DiagnosticOptions::plain());
        assert!(!out.contains('\u{1b}'));
    }

    #[cfg(feature = "colored-diagnostics")]
    #[test]
    fn test_format_colored_markers() {
        let out = format_diagnostics_with_options(&["a.js:1: x"], &DiagnosticOptions::default());
        assert!(out.contains('\u{1b}'));
        assert!(out.ends_with("a.js:1: x"));
    }

    #[test]
    fn test_options() {
        assert!(DiagnosticOptions::default().colored);
        assert!(!DiagnosticOptions::plain().colored);
        assert!(DiagnosticOptions::plain().with_colored(true).colored);
    }
}
