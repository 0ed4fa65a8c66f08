use once_cell::sync::Lazy;
use regex::Regex;

use super::ARTICLE_PRIORITY;
use crate::error::GenError;
use crate::pipeline::{Downstream, Pass, PassState, Processor, Step};

static ARTICLE_P: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/[*/]an?[*/]/").expect("valid article pattern"));

/// Doc tags between an article and its word, as in `/*a*/ {@link Long}`.
const SKIPPED_TAGS: [&str; 2] = ["code", "link"];

/// Whether the word after `text` starts with a vowel. `None` when no letter
/// follows.
fn starts_with_vowel(text: &str) -> Option<bool> {
    let mut rest = text;
    loop {
        let at = rest.find(|c: char| c.is_ascii_alphabetic())?;
        rest = &rest[at..];
        match SKIPPED_TAGS.iter().find(|tag| rest.starts_with(*tag)) {
            Some(tag) => rest = &rest[tag.len()..],
            None => return rest.chars().next().map(|c| "aeiouAEIOU".contains(c)),
        }
    }
}

/// Resolves `/*a*/` and `/*an*/` markers to the article the next word takes.
/// An upper case marker gives `A`/`An`.
pub struct ArticleProcessor;

impl Processor for ArticleProcessor {
    fn name(&self) -> &'static str {
        "article"
    }

    fn priority(&self) -> i32 {
        ARTICLE_PRIORITY
    }

    fn process(
        &self,
        text: &str,
        _pass: &Pass<'_>,
        _rest: Downstream<'_>,
        _state: &mut PassState,
    ) -> Result<Step, GenError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for marker in ARTICLE_P.find_iter(text) {
            out.push_str(&text[last..marker.start()]);
            let vowel = starts_with_vowel(&text[marker.end()..]).ok_or_else(|| {
                GenError::malformed(text, marker.end(), "Expected a word after the article")
            })?;
            let upper = marker.as_str()[2..].starts_with('A');
            out.push_str(match (vowel, upper) {
                (true, false) => "an",
                (false, false) => "a",
                (true, true) => "An",
                (false, true) => "A",
            });
            last = marker.end();
        }
        out.push_str(&text[last..]);
        Ok(Step::Continue(out))
    }
}
