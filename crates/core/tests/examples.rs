//! Runs every template under tests/fixtures/ through one pass with empty
//! contexts and compares it with the file of the same name in the sibling
//! `generated/` directory.

use std::path::{Path, PathBuf};

use primspec_core::{Context, Generator};

fn collect_templates(dir: &Path, out: &mut Vec<PathBuf>) {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    for path in entries {
        if path.is_dir() {
            if path.file_name().map_or(false, |n| n != "generated") {
                collect_templates(&path, out);
            }
        } else {
            out.push(path);
        }
    }
}

#[test]
fn fixtures_generate_expected_output() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut templates = Vec::new();
    collect_templates(&root, &mut templates);
    assert!(!templates.is_empty(), "no fixtures under {}", root.display());

    let generator = Generator::builder().build().unwrap();
    let empty = Context::empty();
    let mut failures = Vec::new();
    for template in &templates {
        let text = std::fs::read_to_string(template).unwrap();
        let expected_path = template
            .parent()
            .unwrap()
            .join("generated")
            .join(template.file_name().unwrap());
        let expected = std::fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("missing {}: {}", expected_path.display(), e));
        match generator.generate(&empty, &empty, &text) {
            Ok(generated) if generated.text == expected => {}
            Ok(generated) => failures.push(format!(
                "{}:\n--- expected\n{}\n--- actual\n{}",
                template.display(),
                expected,
                generated.text
            )),
            Err(e) => failures.push(format!("{}: {}", template.display(), e)),
        }
    }
    assert!(
        failures.is_empty(),
        "{} of {} fixtures failed:\n{}",
        failures.len(),
        templates.len(),
        failures.join("\n")
    );
}
