use std::path::{Path, PathBuf};
use std::process;

use primspec_core::{FileSystemSource, GenError, GeneratedFile, TemplateFailure};

use crate::config::{DEFAULT_SOURCE_DIR, DEFAULT_TARGET_DIR};
use crate::{report_error, report_gen_error, GeneratorArgs, OutputFormat};

/// What happened to one output file.
#[derive(Debug, PartialEq, Eq)]
enum Written {
    New,
    Unchanged,
}

pub(crate) fn cmd_generate(
    source: Option<&Path>,
    target: Option<&Path>,
    args: &GeneratorArgs,
    output: OutputFormat,
    quiet: bool,
) {
    let (config, generator) = super::load_generator(args, output, quiet);
    let source_dir = source
        .map(Path::to_path_buf)
        .or(config.paths.source)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR));
    let target_dir = target
        .map(Path::to_path_buf)
        .or(config.paths.target)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR));

    if !source_dir.is_dir() {
        let msg = format!(
            "template directory not found: {}",
            source_dir.display()
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    let report = match generator.generate_all(&FileSystemSource::new(&source_dir)) {
        Ok(r) => r,
        Err(e) => {
            report_gen_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let mut failures = report.failures;
    let mut written = 0usize;
    let mut unchanged = 0usize;
    for file in &report.files {
        match write_output(&target_dir, file) {
            Ok(Written::New) => written += 1,
            Ok(Written::Unchanged) => unchanged += 1,
            Err(error) => failures.push(TemplateFailure {
                template: file.template.clone(),
                error,
            }),
        }
    }

    match output {
        OutputFormat::Text => {
            if !quiet {
                for failure in &failures {
                    eprintln!("error: {}", failure_line(failure));
                }
                println!(
                    "Generated {} files ({} unchanged) into {}",
                    written,
                    unchanged,
                    target_dir.display()
                );
            }
        }
        OutputFormat::Json => {
            let failure_values: Vec<serde_json::Value> =
                failures.iter().map(failure_json).collect();
            let summary = serde_json::json!({
                "target": target_dir.display().to_string(),
                "written": written,
                "unchanged": unchanged,
                "failures": failure_values,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).unwrap_or_else(|_| summary.to_string())
            );
        }
    }

    if !failures.is_empty() {
        process::exit(1);
    }
}

/// `Template.java: message`, unless the message already names the template.
fn failure_line(failure: &TemplateFailure) -> String {
    match &failure.error {
        GenError::Malformed(m) if m.file.is_some() => failure.error.to_string(),
        other => format!("{}: {}", failure.template.display(), other),
    }
}

fn failure_json(failure: &TemplateFailure) -> serde_json::Value {
    let mut value = failure.error.to_json_value();
    if let Some(fields) = value.as_object_mut() {
        fields.insert(
            "template".to_string(),
            serde_json::Value::String(failure.template.display().to_string()),
        );
    }
    value
}

/// Write `file` under `target_dir`, leaving an identical existing file alone.
fn write_output(target_dir: &Path, file: &GeneratedFile) -> Result<Written, GenError> {
    let path = target_dir.join(&file.path);
    let io_error = |source| GenError::Io {
        path: path.clone(),
        source,
    };
    if let Ok(existing) = std::fs::read_to_string(&path) {
        if existing == file.text {
            log::warn!("Already generated: {}", path.display());
            return Ok(Written::Unchanged);
        }
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(&path, &file.text).map_err(io_error)?;
    log::info!("Wrote {} for {}", path.display(), file.context);
    Ok(Written::New)
}

#[cfg(test)]
mod tests {
    use super::*;
    use primspec_core::Context;

    fn generated(path: &str, text: &str) -> GeneratedFile {
        GeneratedFile {
            template: PathBuf::from("IntBox.java"),
            path: PathBuf::from(path),
            context: Context::empty(),
            text: text.to_string(),
        }
    }

    #[test]
    fn writes_nested_then_skips_identical() {
        let dir = tempfile::tempdir().unwrap();
        let file = generated("pkg/LongBox.java", "class LongBox {}\n");
        assert_eq!(write_output(dir.path(), &file).unwrap(), Written::New);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("pkg/LongBox.java")).unwrap(),
            "class LongBox {}\n"
        );
        assert_eq!(write_output(dir.path(), &file).unwrap(), Written::Unchanged);
    }

    #[test]
    fn failures_name_their_template() {
        let failure = TemplateFailure {
            template: PathBuf::from("pkg/IntBox.java"),
            error: GenError::internal("missing capture"),
        };
        assert_eq!(
            failure_line(&failure),
            "pkg/IntBox.java: internal error: missing capture"
        );
        let json = failure_json(&failure);
        assert_eq!(json["template"], "pkg/IntBox.java");
        assert_eq!(json["kind"], "internal");
    }

    #[test]
    fn malformed_failure_is_not_named_twice() {
        let failure = TemplateFailure {
            template: PathBuf::from("IntBox.java"),
            error: GenError::malformed("x /*a*/", 7, "Expected a word after the article")
                .in_file("IntBox.java"),
        };
        assert!(failure_line(&failure).starts_with("IntBox.java:1: malformed"));
    }

    #[test]
    fn changed_text_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        write_output(dir.path(), &generated("LongBox.java", "old")).unwrap();
        let status = write_output(dir.path(), &generated("LongBox.java", "new")).unwrap();
        assert_eq!(status, Written::New);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("LongBox.java")).unwrap(),
            "new"
        );
    }
}
