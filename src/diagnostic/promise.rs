//! Matching the engine's Promise-callback false positive.
//!
//! The engine cannot carry template types through `Promise#then`, so passing a
//! callback that returns a Promise reports a mismatch such as:
//!
//! ```text
//! found   : function (VolumeInfo): (Promise<(DirectoryEntry|null)>|null)
//! required: (function (Promise<VolumeInfo>): ?|null|undefined)
//! ```
//!
//! A diagnostic is treated as this false positive when the `found` and
//! `required` types are both function types and either
//! - the found function returns a Promise while the required one returns `?`, or
//! - at least one of them mentions `Promise<...>` and the two are identical
//!   once every Promise wrapper is removed. A `null` / `undefined` member is
//!   discounted only in a union that also holds a Promise.

use std::sync::LazyLock;

use regex::Regex;

static FOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*found\s*:\s*(.+?)\s*$").expect("found regex is valid"));

static REQUIRED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*required\s*:\s*(.+?)\s*$").expect("required regex is valid")
});

/// Whether `diagnostic` is the Promise-callback false positive.
pub fn is_promise_false_positive(diagnostic: &str) -> bool {
    let capture = |re: &Regex| re.captures(diagnostic).and_then(|c| c.get(1)).map(|m| m.as_str());
    let (Some(found), Some(required)) = (capture(&*FOUND_RE), capture(&*REQUIRED_RE)) else {
        return false;
    };
    let (Some(found_fn), Some(required_fn)) = (function_member(found), function_member(required))
    else {
        return false;
    };

    if returns_promise(found_fn.ret) && required_fn.ret.trim() == "?" {
        return true;
    }
    (found_fn.mentions_promise() || required_fn.mentions_promise())
        && found_fn != required_fn
        && found_fn.unwrapped() == required_fn.unwrapped()
}

/// A parsed `function (PARAMS): RET` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FunctionType<'a> {
    params: &'a str,
    ret: &'a str,
}

impl FunctionType<'_> {
    fn mentions_promise(&self) -> bool {
        self.params.contains("Promise<") || self.ret.contains("Promise<")
    }

    /// Canonical spelling with Promise wrappers removed.
    fn unwrapped(&self) -> String {
        let params: Vec<String> = split_top_level(self.params, ',')
            .into_iter()
            .map(unwrap_promises)
            .collect();
        format!("function ({}): {}", params.join(", "), unwrap_promises(self.ret))
    }
}

/// The function-typed member of a (possibly nullable) type.
fn function_member(ty: &str) -> Option<FunctionType<'_>> {
    union_members(ty).into_iter().find_map(parse_function)
}

fn parse_function(ty: &str) -> Option<FunctionType<'_>> {
    let rest = ty.trim().strip_prefix("function")?.trim_start();
    if !rest.starts_with('(') {
        return None;
    }
    let close = matching_close(rest)?;
    let params = &rest[1..close];
    let ret = rest[close + 1..].trim_start().strip_prefix(':')?.trim();
    Some(FunctionType { params, ret })
}

fn returns_promise(ret: &str) -> bool {
    union_members(ret)
        .iter()
        .any(|m| m.trim_start_matches('!').starts_with("Promise<"))
}

fn promise_inner(member: &str) -> Option<&str> {
    member
        .trim_start_matches('!')
        .strip_prefix("Promise<")
        .and_then(|s| s.strip_suffix('>'))
}

/// Canonical spelling with Promise wrappers removed.
///
/// Nullability is dropped only from a union that holds a Promise member.
fn unwrap_promises(ty: &str) -> String {
    let members = union_members(ty);
    let has_promise = members.iter().any(|m| promise_inner(m).is_some());
    let mut members: Vec<String> = members
        .into_iter()
        .filter(|m| !(has_promise && matches!(*m, "null" | "undefined")))
        .map(|m| {
            if let Some(inner) = promise_inner(m) {
                unwrap_promises(inner)
            } else if let Some(f) = parse_function(m) {
                f.unwrapped()
            } else {
                m.to_owned()
            }
        })
        .collect();
    members.sort();
    members.dedup();
    match members.len() {
        0 => String::new(),
        1 => members.remove(0),
        _ => format!("({})", members.join("|")),
    }
}

/// Top-level `|` members of a type, with one pair of enclosing parentheses removed.
fn union_members(ty: &str) -> Vec<&str> {
    split_top_level(strip_parens(ty.trim()), '|')
}

/// Remove parentheses that enclose the whole type.
fn strip_parens(ty: &str) -> &str {
    let mut ty = ty;
    while ty.starts_with('(') && matching_close(ty) == Some(ty.len() - 1) {
        ty = ty[1..ty.len() - 1].trim();
    }
    ty
}

/// Split on `sep` outside of any brackets. Empty pieces are dropped.
fn split_top_level(ty: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in ty.char_indices() {
        match c {
            '(' | '<' | '{' | '[' => depth += 1,
            ')' | '>' | '}' | ']' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(ty[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(ty[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Byte index of the bracket closing the one `s` starts with.
fn matching_close(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '<' | '{' | '[' => depth += 1,
            ')' | '>' | '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
