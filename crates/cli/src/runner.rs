//! Example suite runner.
//!
//! Convention:
//!   <any dir>/Template.java            -- a template
//!   <any dir>/generated/Template.java  -- its output for one pass with empty contexts
//!
//! Templates without an expected file are skipped. `generated/` directories
//! are never searched for templates.

use crate::tap::Tap;
use primspec_core::{Context, Generator};
use std::path::{Path, PathBuf};

pub struct RunResult {
    pub failed: usize,
}

/// Run the suite and print its TAP report. `quiet` drops passing points.
pub fn run_suite(suite_dir: &Path, quiet: bool) -> RunResult {
    let mut tap = Tap::new();

    match Generator::builder().build() {
        Ok(generator) => {
            let mut templates = Vec::new();
            collect_templates(suite_dir, &mut templates);
            for template in &templates {
                run_example(&generator, suite_dir, template, &mut tap);
            }
        }
        Err(e) => tap.not_ok("generator", e.to_string()),
    }

    let failed = tap.failure_count();
    tap.finish(quiet);

    RunResult { failed }
}

fn run_example(generator: &Generator, suite_dir: &Path, template: &Path, tap: &mut Tap) {
    let desc = template
        .strip_prefix(suite_dir)
        .unwrap_or(template)
        .display()
        .to_string();
    let Some(expected_path) = expected_path_of(template) else {
        tap.not_ok(desc, "template path has no file name");
        return;
    };
    if !expected_path.exists() {
        tap.skip(desc, format!("no {}", expected_path.display()));
        return;
    }

    let text = match std::fs::read_to_string(template) {
        Ok(t) => t,
        Err(e) => {
            tap.not_ok(desc, format!("cannot read template: {}", e));
            return;
        }
    };
    let expected = match std::fs::read_to_string(&expected_path) {
        Ok(t) => t,
        Err(e) => {
            tap.not_ok(desc, format!("cannot read expected file: {}", e));
            return;
        }
    };

    let empty = Context::empty();
    match generator.generate(&empty, &empty, &text) {
        Ok(generated) if generated.text == expected => tap.ok(desc),
        Ok(generated) => tap.not_ok(desc, first_difference(&expected, &generated.text)),
        Err(e) => tap.not_ok(desc, format!("generation failed: {}", e)),
    }
}

fn expected_path_of(template: &Path) -> Option<PathBuf> {
    let name = template.file_name()?;
    Some(template.parent()?.join("generated").join(name))
}

/// Describe the first line where `actual` departs from `expected`.
fn first_difference(expected: &str, actual: &str) -> String {
    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 1usize;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (None, None) => return "output differs in line endings".to_string(),
            (e, a) => {
                return format!(
                    "line {}:\nexpected: {}\nactual:   {}",
                    line,
                    e.unwrap_or("<end of file>"),
                    a.unwrap_or("<end of file>")
                )
            }
        }
    }
}

fn collect_templates(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(read) = std::fs::read_dir(dir) else {
        return;
    };
    let mut entries: Vec<PathBuf> = read.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    entries.sort();
    for path in entries {
        if path.is_dir() {
            if path.file_name().is_some_and(|n| n != "generated") {
                collect_templates(&path, out);
            }
        } else {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_difference_names_line() {
        let diff = first_difference("a\nb\nc\n", "a\nx\nc\n");
        assert!(diff.starts_with("line 2:"));
        assert!(diff.contains("expected: b"));
        assert!(diff.contains("actual:   x"));
    }

    #[test]
    fn first_difference_at_end() {
        let diff = first_difference("a\nb\n", "a\n");
        assert!(diff.contains("actual:   <end of file>"));
    }

    #[test]
    fn expected_path_is_generated_sibling() {
        assert_eq!(
            expected_path_of(Path::new("suite/a/IntList.java")),
            Some(PathBuf::from("suite/a/generated/IntList.java"))
        );
    }
}
