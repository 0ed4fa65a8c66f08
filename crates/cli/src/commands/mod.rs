pub(crate) mod examples;
pub(crate) mod generate;
pub(crate) mod render;

use std::process;

use primspec_core::Generator;

use crate::config::{self, Config};
use crate::{report_error, report_gen_error, GeneratorArgs, OutputFormat};

/// Load the configuration and build the generator, exiting on failure.
pub(crate) fn load_generator(
    args: &GeneratorArgs,
    output: OutputFormat,
    quiet: bool,
) -> (Config, Generator) {
    let config = match config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match config::build_generator(&config.generator, args) {
        Ok(generator) => (config, generator),
        Err(e) => {
            report_gen_error(&e, output, quiet);
            process::exit(1);
        }
    }
}
