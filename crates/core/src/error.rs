use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Longest excerpt of template text quoted in a malformed-template error.
const EXCERPT_CHARS: usize = 60;

/// A directive used incorrectly inside a template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Malformed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Character offset into the text that was being processed.
    pub offset: usize,
    /// 1-based line of `offset`.
    pub line: u32,
    pub message: String,
    /// Template text starting at `offset`.
    pub excerpt: String,
}

impl Malformed {
    pub fn near(template: &str, offset: usize, message: impl Into<String>) -> Self {
        let at = floor_char_boundary(template, offset.min(template.len()));
        let line = template[..at].matches('\n').count() as u32 + 1;
        let excerpt: String = template[at..].chars().take(EXCERPT_CHARS).collect();
        Malformed {
            file: None,
            offset: template[..at].chars().count(),
            line,
            message: message.into(),
            excerpt,
        }
    }
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file)?;
        }
        write!(
            f,
            "{}: malformed template near offset {}: {}",
            self.line, self.offset, self.message
        )?;
        if !self.excerpt.is_empty() {
            write!(f, "\n  near: {:?}", self.excerpt)?;
        }
        Ok(())
    }
}

/// Every failure the generator can report.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A template misuses the directive grammar.
    #[error("{0}")]
    Malformed(Malformed),

    /// The caller declared invalid dimensions or options.
    #[error("configuration error: {0}")]
    Config(String),

    /// A grammar-guaranteed invariant did not hold.
    #[error("internal error: {0}")]
    Internal(String),

    /// A template could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    pub fn malformed(template: &str, offset: usize, message: impl Into<String>) -> Self {
        GenError::Malformed(Malformed::near(template, offset, message))
    }

    pub fn config(message: impl Into<String>) -> Self {
        GenError::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GenError::Internal(message.into())
    }

    /// Attribute a malformed-template error to `file`, unless it already
    /// names one.
    pub fn in_file(self, file: &str) -> Self {
        match self {
            GenError::Malformed(mut m) => {
                if m.file.is_none() {
                    m.file = Some(file.to_owned());
                }
                GenError::Malformed(m)
            }
            other => other,
        }
    }

    /// Serialize for `--output json`. All fields are always present (null
    /// for missing) so consumers can rely on a fixed shape.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            GenError::Malformed(m) => serde_json::json!({
                "kind":    "malformed",
                "file":    m.file,
                "line":    m.line,
                "offset":  m.offset,
                "message": m.message,
                "excerpt": m.excerpt,
            }),
            GenError::Config(msg) => Self::plain_json("config", None, msg),
            GenError::Internal(msg) => Self::plain_json("internal", None, msg),
            GenError::Io { path, source } => Self::plain_json(
                "io",
                Some(path.display().to_string()),
                &source.to_string(),
            ),
        }
    }

    fn plain_json(kind: &str, file: Option<String>, message: &str) -> serde_json::Value {
        serde_json::json!({
            "kind":    kind,
            "file":    file,
            "line":    null,
            "offset":  null,
            "message": message,
            "excerpt": null,
        })
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_reports_line_and_excerpt() {
        let template = "first line\nsecond /* if */ line";
        let m = Malformed::near(template, 18, "`if` block is not closed");
        assert_eq!(m.line, 2);
        assert_eq!(m.offset, 18);
        assert!(m.excerpt.starts_with("/* if */"));
    }

    #[test]
    fn near_clamps_offset_past_end() {
        let m = Malformed::near("abc", 10, "no letter");
        assert_eq!(m.offset, 3);
        assert_eq!(m.excerpt, "");
    }

    #[test]
    fn offset_counts_characters() {
        let template = "// déjà vu\n/* if */";
        let at = template.find("/*").unwrap();
        let m = Malformed::near(template, at, "`if` block is not closed");
        assert_eq!(m.offset, 11);
        assert_eq!(m.line, 2);
        assert!(m.excerpt.starts_with("/* if */"));
    }

    #[test]
    fn in_file_keeps_first_attribution() {
        let err = GenError::malformed("x", 0, "bad")
            .in_file("First.java")
            .in_file("Second.java");
        match err {
            GenError::Malformed(m) => assert_eq!(m.file.as_deref(), Some("First.java")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn json_shape_has_all_fields() {
        let v = GenError::config("unknown option").to_json_value();
        for key in ["kind", "file", "line", "offset", "message", "excerpt"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
        assert_eq!(v["kind"], "config");
    }
}
