use std::fmt;

use super::intermediate::{IdCase, IdLength, IntermediateOption};
use super::spelling::{self, Boundary};
use super::Substitute;

/// A free-form label option, e.g. `Preconditions` in
/// `with Preconditions|Assert|No parameterChecks`.
///
/// Labels that are not plain camel-case words (missing either a lowercase or
/// an uppercase letter, or containing non-alphanumeric chars) only enrich
/// the context for conditions and never rewrite text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleOption {
    label: String,
}

impl SimpleOption {
    pub fn new(label: impl Into<String>) -> Self {
        SimpleOption {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_context_only(&self) -> bool {
        let mut has_lower = false;
        let mut has_upper = false;
        for c in self.label.chars() {
            if !c.is_alphanumeric() {
                return true;
            }
            has_lower |= c.is_lowercase();
            has_upper |= c.is_uppercase();
        }
        !has_lower || !has_upper
    }

    fn forms(&self) -> [(String, IdCase); 3] {
        let title = spelling::capitalize(&self.label);
        let upper = spelling::to_underscored_upper(&title);
        [
            (spelling::uncapitalize(&self.label), IdCase::Lower),
            (title, IdCase::Title),
            (upper, IdCase::Upper),
        ]
    }
}

fn boundary(case: IdCase) -> Boundary {
    match case {
        IdCase::Lower => Boundary::Lower,
        IdCase::Title => Boundary::Title,
        IdCase::Upper => Boundary::Upper,
    }
}

impl Substitute for SimpleOption {
    fn intermediate_replace(&self, text: &str, dim: &str) -> String {
        if self.is_context_only() {
            return text.to_owned();
        }
        let inter = IntermediateOption::of(dim);
        let mut text = text.to_owned();
        for (word, case) in self.forms() {
            let placeholder = inter.id(IdLength::Neutral, case);
            text = spelling::replace(&text, &word, boundary(case), &placeholder);
        }
        text
    }

    fn final_replace(&self, text: &str, dim: &str) -> String {
        if self.is_context_only() {
            return text.to_owned();
        }
        let inter = IntermediateOption::of(dim);
        let mut text = text.to_owned();
        for (word, case) in self.forms() {
            text = text.replace(&inter.id(IdLength::Neutral, case), &word);
        }
        text
    }

    fn default_value(&self) -> Option<String> {
        None
    }
}

impl fmt::Display for SimpleOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
