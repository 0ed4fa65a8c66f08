use std::path::PathBuf;
use std::process;

use crate::{report_error, report_gen_error, GeneratorArgs, OutputFormat};

pub(crate) fn cmd_render(files: &[PathBuf], args: &GeneratorArgs, output: OutputFormat, quiet: bool) {
    let (_, generator) = super::load_generator(args, output, quiet);

    let mut failed = false;
    let mut rendered = Vec::new();
    for file in files {
        let text = match std::fs::read_to_string(file) {
            Ok(t) => t,
            Err(e) => {
                let msg = format!("error reading '{}': {}", file.display(), e);
                report_error(&msg, output, quiet);
                failed = true;
                continue;
            }
        };
        match generator.generate_template(file, &text) {
            Ok(outputs) => rendered.extend(outputs),
            Err(e) => {
                report_gen_error(&e, output, quiet);
                failed = true;
            }
        }
    }

    match output {
        OutputFormat::Text => {
            for file in &rendered {
                if !quiet {
                    println!("// ---- {} {}", file.path.display(), file.context);
                }
                print!("{}", file.text);
            }
        }
        OutputFormat::Json => {
            let outputs: Vec<serde_json::Value> = rendered
                .iter()
                .map(|file| {
                    serde_json::json!({
                        "template": file.template.display().to_string(),
                        "path": file.path.display().to_string(),
                        "context": file.context.to_string(),
                        "text": file.text,
                    })
                })
                .collect();
            let value = serde_json::Value::Array(outputs);
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            );
        }
    }

    if failed {
        process::exit(1);
    }
}
