//! `<include src="...">` directive recognition.

use std::sync::LazyLock;

use regex::Regex;

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<include\s+src="([^"]+)"\s*/?>"#).expect("include directive regex is valid")
});

/// Return the `src` of the include directive on `line`, if any.
///
/// The directive may appear anywhere on the line; the whole line is treated as
/// the directive.
pub fn find_include(line: &str) -> Option<&str> {
    INCLUDE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
