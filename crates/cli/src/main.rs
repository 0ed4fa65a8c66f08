mod commands;
mod config;
mod runner;
mod tap;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use primspec_core::GenError;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Java primitive specialization generator.
#[derive(Parser)]
#[command(
    name = "primspec",
    version,
    about = "Java primitive specialization generator"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Generator options shared by `generate` and `render`. Values given here are
/// added to those of the configuration file.
#[derive(Args, Debug, Default)]
pub(crate) struct GeneratorArgs {
    /// Configuration file (default: ./primspec.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Options of the dimensions inferred from file names, e.g. int|long
    #[arg(long)]
    pub default_types: Option<String>,
    /// Fixed dimensions, e.g. parameterChecks=Assert
    #[arg(long)]
    pub with: Vec<String>,
    /// Options never generated, e.g. float|double
    #[arg(long)]
    pub never: Vec<String>,
    /// Only generate combinations matching one of these, e.g. t=int|long
    #[arg(long)]
    pub include: Vec<String>,
    /// Skip combinations matching any of these, e.g. t=char,u=char
    #[arg(long)]
    pub exclude: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every template of a directory into a target directory
    Generate {
        /// Template directory
        #[arg(long)]
        source: Option<PathBuf>,
        /// Output directory
        #[arg(long)]
        target: Option<PathBuf>,
        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// Print the outputs of single templates to stdout
    Render {
        /// Template files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// Run an example suite (templates beside `generated/` expected outputs)
    Examples {
        /// Path to the example suite directory
        dir: PathBuf,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Generate {
            source,
            target,
            generator,
        } => {
            commands::generate::cmd_generate(
                source.as_deref(),
                target.as_deref(),
                &generator,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Render { files, generator } => {
            commands::render::cmd_render(&files, &generator, cli.output, cli.quiet);
        }
        Commands::Examples { dir } => {
            commands::examples::cmd_examples(&dir, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}", msg);
            }
        }
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

pub(crate) fn report_gen_error(err: &GenError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&err.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", err));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", err);
            }
        }
    }
}
