//! Diagnostic filtering utilities.
//!
//! Filters are pure text predicates over a single diagnostic block, so applying
//! a filter to its own output changes nothing.

use super::promise::is_promise_false_positive;

/// Marker the engine emits when a symbol is declared again by a second inlined
/// copy of the same file.
pub const REDECLARED_MARKER: &str = " first declared in ";

/// Filter type for matching diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterType {
    /// Match redeclarations caused by a file being inlined more than once.
    RedeclaredInInclude,
    /// Match the Promise-callback type mismatch the engine cannot resolve.
    PromiseCallback,
    /// Match diagnostics containing specific text.
    MessageContains(String),
}

impl FilterType {
    /// Check if a diagnostic matches this filter type.
    fn matches(&self, diagnostic: &str) -> bool {
        match self {
            FilterType::RedeclaredInInclude => diagnostic.contains(REDECLARED_MARKER),
            FilterType::PromiseCallback => is_promise_false_positive(diagnostic),
            FilterType::MessageContains(text) => diagnostic.contains(text.as_str()),
        }
    }
}

/// Filter for excluding diagnostics.
///
/// # Example
///
/// ```
/// use include_check::diagnostic::{DiagnosticFilter, FilterType};
///
/// // The two built-in rules plus a project-specific one.
/// let filter = DiagnosticFilter::default()
///     .with(FilterType::MessageContains("chrome.send".into()));
///
/// let kept = filter.apply(vec![
///     "a.js:1: ERROR - Variable x first declared in /tmp/expanded.js".to_string(),
///     "a.js:2: ERROR - missing return".to_string(),
/// ]);
/// assert_eq!(kept, ["a.js:2: ERROR - missing return"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticFilter {
    filters: Vec<FilterType>,
}

impl Default for DiagnosticFilter {
    /// The rules that always apply to `<include>`-expanded sources.
    fn default() -> Self {
        Self::new([FilterType::RedeclaredInInclude, FilterType::PromiseCallback])
    }
}

impl DiagnosticFilter {
    /// Create a filter from explicit rules.
    pub fn new(filters: impl IntoIterator<Item = FilterType>) -> Self {
        Self {
            filters: filters.into_iter().collect(),
        }
    }

    /// Add a rule.
    pub fn with(mut self, filter: FilterType) -> Self {
        self.filters.push(filter);
        self
    }

    /// Active rules.
    pub fn filters(&self) -> &[FilterType] {
        &self.filters
    }

    /// Check if a diagnostic should be filtered out.
    pub fn matches(&self, diagnostic: &str) -> bool {
        self.filters.iter().any(|f| f.matches(diagnostic))
    }

    /// Keep only the diagnostics no rule matches, preserving order.
    pub fn apply(&self, diagnostics: Vec<String>) -> Vec<String> {
        diagnostics.into_iter().filter(|d| !self.matches(d)).collect()
    }
}

/// Drop known noise using the built-in rules.
pub fn filter_diagnostics(diagnostics: &[String]) -> Vec<String> {
    DiagnosticFilter::default().apply(diagnostics.to_vec())
}
