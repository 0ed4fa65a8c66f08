use std::path::Path;
use std::process;

pub(crate) fn cmd_examples(suite_dir: &Path, quiet: bool) {
    if !suite_dir.is_dir() {
        eprintln!(
            "error: example suite directory not found: {}",
            suite_dir.display()
        );
        process::exit(1);
    }

    let result = crate::runner::run_suite(suite_dir, quiet);
    if result.failed > 0 {
        process::exit(1);
    }
}
