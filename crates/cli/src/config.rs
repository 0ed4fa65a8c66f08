//! `primspec.toml` loading and generator construction.

use std::path::{Path, PathBuf};

use primspec_core::{GenError, Generator};
use serde::Deserialize;

use crate::GeneratorArgs;

/// Config file picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "primspec.toml";
pub(crate) const DEFAULT_SOURCE_DIR: &str = "src/main/javaTemplates";
pub(crate) const DEFAULT_TARGET_DIR: &str = "build/generated-src";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub generator: GeneratorSection,
    pub paths: PathsSection,
}

/// `[generator]`: descriptors in template form (`opt1|opt2 dim`).
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GeneratorSection {
    pub default_types: Option<String>,
    pub with: Vec<String>,
    pub never: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PathsSection {
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
}

/// Load `explicit`, or `primspec.toml` when it exists, or nothing.
pub(crate) fn load(explicit: Option<&Path>) -> Result<Config, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(Config::default());
            }
            default
        }
    };
    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
    log::debug!("Loaded config {}", path.display());
    parse(&text).map_err(|e| format!("invalid config {}: {}", path.display(), e))
}

fn parse(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Configure a generator from the file section plus the command line. Flags
/// are appended to the file values; `--default-types` replaces the file's.
pub(crate) fn build_generator(
    section: &GeneratorSection,
    args: &GeneratorArgs,
) -> Result<Generator, GenError> {
    let mut builder = Generator::builder();
    if let Some(types) = args.default_types.as_ref().or(section.default_types.as_ref()) {
        builder = builder.default_types(types.as_str());
    }
    for dims in &section.with {
        builder = builder.with(dims.as_str());
    }
    for dims in &args.with {
        builder = builder.with_cli(dims.as_str());
    }
    for options in section.never.iter().chain(&args.never) {
        builder = builder.never(options.as_str());
    }
    for dims in &section.include {
        builder = builder.include(dims.as_str());
    }
    for dims in &args.include {
        builder = builder.include_cli(dims.as_str());
    }
    for dims in &section.exclude {
        builder = builder.exclude(dims.as_str());
    }
    for dims in &args.exclude {
        builder = builder.exclude_cli(dims.as_str());
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = parse(
            r#"
[generator]
default_types = "int|long"
with = ["Preconditions parameterChecks"]
never = ["char"]
exclude = ["float|double elem"]

[paths]
source = "templates"
target = "out"
"#,
        )
        .unwrap();
        assert_eq!(config.generator.default_types.as_deref(), Some("int|long"));
        assert_eq!(config.generator.with, vec!["Preconditions parameterChecks"]);
        assert_eq!(config.generator.never, vec!["char"]);
        assert!(config.generator.include.is_empty());
        assert_eq!(config.paths.source, Some(PathBuf::from("templates")));
        assert_eq!(config.paths.target, Some(PathBuf::from("out")));
    }

    #[test]
    fn empty_config_is_default() {
        let config = parse("").unwrap();
        assert!(config.generator.default_types.is_none());
        assert!(config.paths.source.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[generator]\nnevr = [\"char\"]\n").is_err());
    }

    #[test]
    fn flags_extend_file_values() {
        let section = GeneratorSection {
            default_types: Some("byte|int|long".to_string()),
            with: vec!["Assert checks".to_string()],
            never: vec!["byte".to_string()],
            ..Default::default()
        };
        let args = GeneratorArgs {
            with: vec!["mode=Fast".to_string()],
            ..Default::default()
        };
        let generator = build_generator(&section, &args).unwrap();
        assert_eq!(generator.default_context().to_string(), "{checks=Assert, mode=Fast}");
    }

    #[test]
    fn invalid_flag_is_config_error() {
        let args = GeneratorArgs {
            with: vec!["no equals sign".to_string()],
            ..Default::default()
        };
        let err = build_generator(&GeneratorSection::default(), &args).unwrap_err();
        assert!(matches!(err, GenError::Config(_)));
    }
}
