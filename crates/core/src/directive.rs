//! Directive matching shared by the processors.
//!
//! A [`CheckingPattern`] pairs a loose probe with the full directive grammar.
//! Whatever the probe finds must parse as a whole directive at the same
//! position, so a misspelled directive is reported instead of being copied
//! to the output silently.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::dimensions::DIMENSIONS_PATTERN;
use crate::error::GenError;

#[derive(Debug)]
pub struct CheckingPattern {
    directive: String,
    probe: Regex,
    full: Regex,
}

impl CheckingPattern {
    pub fn new(directive: impl Into<String>, probe: &str, full: &str) -> Result<Self, GenError> {
        let directive = directive.into();
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                GenError::internal(format!("invalid `{directive}` directive pattern: {e}"))
            })
        };
        let probe = compile(probe)?;
        let full = compile(full)?;
        Ok(CheckingPattern {
            directive,
            probe,
            full,
        })
    }

    /// Next directive at or after `from`.
    pub fn find_at<'t>(
        &self,
        text: &'t str,
        from: usize,
    ) -> Result<Option<Captures<'t>>, GenError> {
        let Some(probe) = self.probe.find_at(text, from) else {
            return Ok(None);
        };
        let at = probe.start();
        match self.full.captures_at(text, at) {
            Some(caps) if caps.get(0).is_some_and(|m| m.start() == at) => Ok(Some(caps)),
            _ => Err(GenError::malformed(
                text,
                probe.start(),
                format!("Malformed `{}` directive", self.directive),
            )),
        }
    }

    /// Replace every directive in `text` with what `replace` makes of it.
    pub fn replace_each<F>(&self, text: &str, mut replace: F) -> Result<String, GenError>
    where
        F: FnMut(&Captures<'_>) -> Result<String, GenError>,
    {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        while let Some(caps) = self.find_at(text, last)? {
            let whole = caps
                .get(0)
                .ok_or_else(|| GenError::internal("directive match without group 0"))?;
            out.push_str(&text[last..whole.start()]);
            out.push_str(&replace(&caps)?);
            last = whole.end();
            if whole.is_empty() {
                let Some(c) = text[last..].chars().next() else {
                    break;
                };
                out.push(c);
                last += c.len_utf8();
            }
        }
        out.push_str(&text[last..]);
        Ok(out)
    }
}

/// A named group that the directive grammar guarantees.
pub(crate) fn group<'t>(caps: &Captures<'t>, name: &str) -> Result<&'t str, GenError> {
    caps.name(name)
        .map(|m| m.as_str())
        .ok_or_else(|| GenError::internal(format!("directive match without `{name}` group")))
}

/// Start offset of the whole directive match.
pub(crate) fn start(caps: &Captures<'_>) -> usize {
    caps.get(0).map_or(0, |m| m.start())
}

// ── Block directives ─────────────────────────────────────────────────

const COND_START: &str = r"if\b\s*(?P<condition>[^/*]+?)";
const COND_PART: &str = r"(?:(?:el)?if\b\s*(?P<condition>[^/*]+?)|endif)";

fn context_start() -> String {
    format!(r"with\b(?P<dimensions>{DIMENSIONS_PATTERN})")
}

fn any_block_part() -> String {
    format!(r"(?:{COND_PART}|{}|endwith)", context_start())
}

static GROUP_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\?P<\w+>").expect("valid group name regex"));

fn strip_group_names(pattern: &str) -> String {
    GROUP_NAME_RE.replace_all(pattern, "(?:").into_owned()
}

fn block(inside: &str) -> String {
    format!(r"/[*/]\s*{inside}\s*[*/]/")
}

/// A block alone on its line matches together with the line's indentation
/// and line break.
fn block_or_whole_line(block: &str) -> String {
    format!(r"(?m:^[^\S\r\n]*{block}[^\S\n]*?\n)|{block}")
}

/// Block directives open with `/*` or `//`, close with `*/` or `//`, and
/// may not span lines when opened with `//`.
fn compile_block(directive: &'static str, inside: &str, keyword: &str) -> CheckingPattern {
    let probe = format!(r"/\*\s*(?:{keyword})\b[^/*]*[*/]/|//\s*(?:{keyword})\b[^/*\n]*[*/]/");
    let probe = block_or_whole_line(&format!("(?:{probe})"));
    let full = block_or_whole_line(&block(&strip_group_names(inside)));
    CheckingPattern::new(directive, &probe, &full).expect("valid block directive pattern")
}

fn wrap_block(inside: &str) -> Regex {
    Regex::new(&format!(r"\A\s*{}\s*\z", block(inside))).expect("valid block wrap pattern")
}

pub(crate) static COND_START_P: Lazy<CheckingPattern> =
    Lazy::new(|| compile_block("if", COND_START, "if"));
pub(crate) static COND_PART_P: Lazy<CheckingPattern> =
    Lazy::new(|| compile_block("if", COND_PART, "(?:el|end)?if"));
pub(crate) static CONTEXT_START_P: Lazy<CheckingPattern> =
    Lazy::new(|| compile_block("with", &context_start(), "with"));
pub(crate) static CONTEXT_PART_P: Lazy<CheckingPattern> = Lazy::new(|| {
    compile_block("with", &format!("(?:{}|endwith)", context_start()), "(?:end)?with")
});
pub(crate) static ANY_BLOCK_PART_P: Lazy<CheckingPattern> = Lazy::new(|| {
    compile_block("block", &any_block_part(), "(?:(?:el|end)?if|(?:end)?with)")
});

static COND_PART_BLOCK: Lazy<Regex> = Lazy::new(|| wrap_block(COND_PART));
static CONTEXT_START_BLOCK: Lazy<Regex> = Lazy::new(|| wrap_block(&context_start()));

/// Kind of a matched block directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockPart {
    If,
    Elif,
    EndIf,
    With,
    EndWith,
}

pub(crate) fn classify(part: &str) -> Option<BlockPart> {
    let rest = part.trim_start();
    let rest = rest
        .strip_prefix("/*")
        .or_else(|| rest.strip_prefix("//"))?
        .trim_start();
    [
        ("endif", BlockPart::EndIf),
        ("elif", BlockPart::Elif),
        ("if", BlockPart::If),
        ("endwith", BlockPart::EndWith),
        ("with", BlockPart::With),
    ]
    .into_iter()
    .find(|(keyword, _)| rest.starts_with(keyword))
    .map(|(_, kind)| kind)
}

/// The condition of an `if` or `elif` directive.
pub(crate) fn condition_of(part: &str) -> Result<&str, GenError> {
    COND_PART_BLOCK
        .captures(part)
        .and_then(|c| c.name("condition"))
        .map(|m| m.as_str())
        .ok_or_else(|| GenError::internal(format!("not a condition block: {part:?}")))
}

/// The dimensions of a `with` directive.
pub(crate) fn dimensions_of(part: &str) -> Result<&str, GenError> {
    CONTEXT_START_BLOCK
        .captures(part)
        .and_then(|c| c.name("dimensions"))
        .map(|m| m.as_str())
        .ok_or_else(|| GenError::internal(format!("not a `with` block: {part:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(text: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut from = 0;
        while let Some(caps) = ANY_BLOCK_PART_P.find_at(text, from).unwrap() {
            let m = caps.get(0).unwrap();
            out.push(m.as_str().to_owned());
            from = m.end();
        }
        out
    }

    #[test]
    fn whole_line_block_takes_its_line() {
        let text = "a\n  /* if int elem */  \nb /* endif */ c\n";
        assert_eq!(parts(text), vec!["  /* if int elem */  \n", "/* endif */"]);
    }

    #[test]
    fn double_slash_blocks() {
        let text = "x // elif Assert mode // y //endif*/";
        assert_eq!(parts(text), vec!["// elif Assert mode //", "//endif*/"]);
    }

    #[test]
    fn ordinary_comments_are_not_blocks() {
        assert!(parts("// if the value is negative\n/* within bounds */").is_empty());
    }

    #[test]
    fn misspelled_block_is_malformed() {
        let err = ANY_BLOCK_PART_P.find_at("x /* with elem */", 0).unwrap_err();
        assert!(matches!(err, GenError::Malformed(m) if m.offset == 2));
    }

    #[test]
    fn classify_and_extract() {
        assert_eq!(classify("  /* elif a b */\n"), Some(BlockPart::Elif));
        assert_eq!(classify("//endwith//"), Some(BlockPart::EndWith));
        assert_eq!(condition_of("/* if int|long elem */").unwrap(), "int|long elem");
        assert_eq!(condition_of("  // elif a=b //\n").unwrap(), "a=b");
        assert_eq!(
            dimensions_of("/* with Preconditions|Assert|No parameterChecks */").unwrap(),
            " Preconditions|Assert|No parameterChecks "
        );
    }

    #[test]
    fn replace_each_keeps_unmatched_text() {
        let p = CheckingPattern::new("x", r"<x", r"<x(?P<n>\d)>").unwrap();
        let out = p
            .replace_each("a <x1> b <x2>", |c| Ok(format!("[{}]", group(c, "n")?)))
            .unwrap();
        assert_eq!(out, "a [1] b [2]");
        assert!(p.replace_each("a <xy>", |_| Ok(String::new())).is_err());
    }
}
