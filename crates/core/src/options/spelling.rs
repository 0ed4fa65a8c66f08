//! Literal identifier matching with explicit boundary checks.
//!
//! Each surface form of a dimension-typed identifier is a literal word plus a
//! rule about which characters may surround it. Matching scans left to right
//! and replaces non-overlapping occurrences, checking the characters of the
//! original text on both sides of each candidate.

/// Which characters may surround a matched spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// Class name, e.g. `Integer`. Rejects a preceding identifier char, `#` or
    /// `.` (inner and qualified names) and a following identifier char. A
    /// following `#` is allowed for doc links like `{@link Integer#valueOf}`.
    ClassName,
    /// Standalone keyword, e.g. `int`. Rejects identifier chars and `#` on
    /// either side.
    Standalone,
    /// lowerCamel head, e.g. `int` in `intValue` or `ints`.
    Lower,
    /// UpperCamel part, e.g. `Int` in `getAsInt`.
    Title,
    /// Like `Title`, but a leading `$` marker is consumed with the match.
    MarkedTitle,
    /// UPPER_SNAKE part, e.g. `INT` in `MAX_INT_VALUE`.
    Upper,
}

impl Boundary {
    fn accepts(self, before: Option<char>, after: &str) -> bool {
        let mut rest = after.chars();
        let c1 = rest.next();
        let c2 = rest.next();
        match self {
            Boundary::ClassName => {
                !before.is_some_and(|c| is_java_id_char(c) || c == '#' || c == '.')
                    && !c1.is_some_and(is_java_id_char)
            }
            Boundary::Standalone => {
                !before.is_some_and(|c| is_java_id_char(c) || c == '#')
                    && !c1.is_some_and(|c| is_java_id_char(c) || c == '#')
            }
            Boundary::Lower => {
                !before.is_some_and(|c| c.is_ascii_alphabetic()) && !continues_lower(c1, c2)
            }
            Boundary::Title | Boundary::MarkedTitle => !continues_lower(c1, c2),
            Boundary::Upper => {
                !before.is_some_and(|c| c.is_ascii_uppercase()) && !continues_upper(c1, c2)
            }
        }
    }
}

fn is_java_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// `[a-rt-z].` or `s[a-z]`: the word goes on as a longer lowercase word.
/// A lone trailing `s` is a plural and does not block the match.
fn continues_lower(c1: Option<char>, c2: Option<char>) -> bool {
    match c1 {
        Some('s') => c2.is_some_and(|c| c.is_ascii_lowercase()),
        Some(c) if c.is_ascii_lowercase() => c2.is_some_and(|c| !is_line_terminator(c)),
        _ => false,
    }
}

fn continues_upper(c1: Option<char>, c2: Option<char>) -> bool {
    match c1 {
        Some('S') => c2.is_some_and(|c| c.is_ascii_uppercase()),
        Some(c) if c.is_ascii_uppercase() => c2.is_some_and(|c| !is_line_terminator(c)),
        _ => false,
    }
}

/// Replace every occurrence of `word` in `text` that satisfies `boundary`.
pub(crate) fn replace(text: &str, word: &str, boundary: Boundary, replacement: &str) -> String {
    if word.is_empty() || !text.contains(word) {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut from = 0;
    while let Some(rel) = text[from..].find(word) {
        let start = from + rel;
        let end = start + word.len();
        let before = text[..start].chars().next_back();
        if boundary.accepts(before, &text[end..]) {
            let marked = boundary == Boundary::MarkedTitle && before == Some('$');
            let match_start = if marked && start > copied {
                start - 1
            } else {
                start
            };
            out.push_str(&text[copied..match_start]);
            out.push_str(replacement);
            copied = end;
            from = end;
        } else {
            from = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
    }
    out.push_str(&text[copied..]);
    out
}

/// First occurrence of `word` satisfying `boundary`, if any.
pub(crate) fn find(text: &str, word: &str, boundary: Boundary) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(rel) = text[from..].find(word) {
        let start = from + rel;
        let end = start + word.len();
        if boundary.accepts(text[..start].chars().next_back(), &text[end..]) {
            return Some(start);
        }
        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// `int` -> `Int`.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Integer` -> `integer`.
pub(crate) fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `HashMap` -> `HASH_MAP`.
pub(crate) fn to_underscored_upper(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            out.push('_');
        }
        out.extend(c.to_uppercase());
        prev = Some(c);
    }
    out
}
