//! The generator: runs every template under every combination of its
//! dimensions.
//!
//! A template's dimensions come from its file name (`IntCharMap.java` spans
//! two dimensions `t` and `u` over the default types) unless it opens with a
//! `with` block. An `if` block right at the start is a file condition.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::condition::Condition;
use crate::context::Context;
use crate::dimensions::Dimensions;
use crate::directive::{condition_of, dimensions_of, COND_START_P, CONTEXT_START_P};
use crate::error::GenError;
use crate::filter::ContextFilter;
use crate::options::{parse_options, DimOption, PrimitiveType, Substitute};
use crate::pipeline::{Pass, PassState, Pipeline, Processor};
use crate::processors::{DimFilter, Modifier, TypeMapper};
use crate::source::TemplateSource;

/// A dimension descriptor in either accepted form.
#[derive(Debug, Clone)]
enum Descriptor {
    /// `opt1|opt2 dim1 opt3 dim2`
    Template(String),
    /// `dim1=opt1|opt2,dim2=opt3`
    Cli(String),
}

impl Descriptor {
    fn parse(&self) -> Result<Dimensions, GenError> {
        match self {
            Descriptor::Template(s) => Dimensions::parse_for_context(s).map_err(|e| match e {
                GenError::Malformed(m) => {
                    GenError::config(format!("invalid dimensions `{s}`: {}", m.message))
                }
                other => other,
            }),
            Descriptor::Cli(s) => Dimensions::parse_cli(s),
        }
    }
}

/// Collects the generator configuration. Nothing is parsed until
/// [`build`](GeneratorBuilder::build).
#[derive(Default)]
pub struct GeneratorBuilder {
    default_types: Option<String>,
    with: Vec<Descriptor>,
    never: Vec<String>,
    include: Vec<Descriptor>,
    exclude: Vec<Descriptor>,
    modifiers: Vec<(String, TypeMapper, DimFilter)>,
    processors: Vec<Box<dyn Processor>>,
}

impl GeneratorBuilder {
    /// Options of the dimensions inferred from file names, e.g.
    /// `byte|char|short|int|long|float|double` (the default).
    pub fn default_types(mut self, types: impl Into<String>) -> Self {
        self.default_types = Some(types.into());
        self
    }

    /// Fixed dimensions every template sees, e.g. `Preconditions
    /// parameterChecks`. Each dimension takes exactly one option.
    pub fn with(mut self, dims: impl Into<String>) -> Self {
        self.with.push(Descriptor::Template(dims.into()));
        self
    }

    /// [`with`](Self::with) in the form `parameterChecks=Preconditions`.
    pub fn with_cli(mut self, dims: impl Into<String>) -> Self {
        self.with.push(Descriptor::Cli(dims.into()));
        self
    }

    /// Options no combination may use, e.g. `float|double`.
    pub fn never(mut self, options: impl Into<String>) -> Self {
        self.never.push(options.into());
        self
    }

    /// When any inclusions are declared, combinations must match one of them.
    pub fn include(mut self, dims: impl Into<String>) -> Self {
        self.include.push(Descriptor::Template(dims.into()));
        self
    }

    pub fn include_cli(mut self, dims: impl Into<String>) -> Self {
        self.include.push(Descriptor::Cli(dims.into()));
        self
    }

    /// Combinations matching an exclusion are skipped.
    pub fn exclude(mut self, dims: impl Into<String>) -> Self {
        self.exclude.push(Descriptor::Template(dims.into()));
        self
    }

    pub fn exclude_cli(mut self, dims: impl Into<String>) -> Self {
        self.exclude.push(Descriptor::Cli(dims.into()));
        self
    }

    /// Register a primitive type modifier: `/* KEYWORD DIM */ident` names
    /// `mapper` applied to the option of `DIM`, for the dimensions
    /// `dim_filter` accepts. `bits` is always registered.
    pub fn modifier(
        mut self,
        keyword: impl Into<String>,
        mapper: impl Fn(PrimitiveType) -> PrimitiveType + Send + Sync + 'static,
        dim_filter: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        let mapper: TypeMapper = Arc::new(mapper);
        let dim_filter: DimFilter = Arc::new(dim_filter);
        self.modifiers.push((keyword.into(), mapper, dim_filter));
        self
    }

    /// Register a processor next to the standard ones.
    pub fn processor(mut self, processor: Box<dyn Processor>) -> Self {
        self.processors.push(processor);
        self
    }

    pub fn build(self) -> Result<Generator, GenError> {
        let default_types = match &self.default_types {
            Some(types) => {
                let options = parse_options(types);
                if let Some(simple) = options.iter().find(|o| matches!(o, DimOption::Simple(_))) {
                    return Err(GenError::config(format!(
                        "Simple options like {simple} are not allowed in default types"
                    )));
                }
                if options.is_empty() {
                    return Err(GenError::config("default types must not be empty"));
                }
                options
            }
            None => PrimitiveType::NUMERIC_WITH_SHORT_IDS
                .into_iter()
                .map(DimOption::from)
                .collect(),
        };

        let mut default_context = Context::empty();
        for descriptor in &self.with {
            let dims = descriptor.parse()?;
            if let (Descriptor::Template(_), Some((dim, options))) =
                (descriptor, dims.iter().find(|(_, o)| o.len() > 1))
            {
                return Err(GenError::config(format!(
                    "with accepts only dimensions with a single option, {dim} has {}",
                    options_list(options)
                )));
            }
            let contexts = dims.generate_contexts();
            match contexts.as_slice() {
                [context] => default_context = default_context.join(context),
                _ => {
                    return Err(GenError::config(format!(
                        "Default context should have only trivial dimensions, found {dims}"
                    )))
                }
            }
        }

        let filter = ContextFilter {
            never: self.never.iter().flat_map(|o| parse_options(o)).collect(),
            include: parse_all(&self.include)?,
            exclude: parse_all(&self.exclude)?,
        };
        let mut extra = self.processors;
        for (keyword, mapper, dim_filter) in self.modifiers {
            if keyword.eq_ignore_ascii_case(Modifier::bits().keyword()) {
                return Err(GenError::config("the `bits` modifier is built in"));
            }
            extra.extend(Modifier::from_shared(keyword, mapper, dim_filter)?.processors());
        }
        let pipeline = Pipeline::standard(extra);
        log::debug!("Processors: {:?}", pipeline.stage_names());

        Ok(Generator {
            default_types,
            default_context,
            filter,
            pipeline,
        })
    }
}

fn parse_all(descriptors: &[Descriptor]) -> Result<Vec<Dimensions>, GenError> {
    descriptors.iter().map(Descriptor::parse).collect()
}

fn options_list(options: &[DimOption]) -> String {
    let names: Vec<String> = options.iter().map(ToString::to_string).collect();
    format!("[{}]", names.join(", "))
}

/// Output of one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub text: String,
    /// Expansion of the template's `ClassName` definition.
    pub class_name: Option<String>,
}

/// One generated file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    /// Template the file was generated from.
    pub template: PathBuf,
    /// Output path, relative like the template path.
    pub path: PathBuf,
    /// The combination the file was generated for.
    pub context: Context,
    pub text: String,
}

/// A template that could not be generated.
#[derive(Debug)]
pub struct TemplateFailure {
    pub template: PathBuf,
    pub error: GenError,
}

/// Outcome of [`Generator::generate_all`].
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub files: Vec<GeneratedFile>,
    pub failures: Vec<TemplateFailure>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Generator {
    default_types: Vec<DimOption>,
    default_context: Context,
    filter: ContextFilter,
    pipeline: Pipeline,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("default_types", &self.default_types)
            .field("default_context", &self.default_context)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::default()
    }

    pub fn default_context(&self) -> &Context {
        &self.default_context
    }

    pub fn filter(&self) -> &ContextFilter {
        &self.filter
    }

    /// Run one pass of the pipeline over `text`.
    pub fn generate(
        &self,
        source: &Context,
        target: &Context,
        text: &str,
    ) -> Result<Generated, GenError> {
        let pass = Pass {
            source,
            target,
            filter: &self.filter,
        };
        let mut state = PassState::default();
        let text = self.pipeline.run(text, &pass, &mut state)?;
        Ok(Generated {
            text,
            class_name: state.class_name,
        })
    }

    /// Generate every permitted combination of the template at `path`.
    /// Malformed-template errors name the template.
    pub fn generate_template(
        &self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<GeneratedFile>, GenError> {
        self.expand_template(path, text)
            .map_err(|e| e.in_file(&path.display().to_string()))
    }

    fn expand_template(&self, path: &Path, text: &str) -> Result<Vec<GeneratedFile>, GenError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GenError::config(format!("no file name in {}", path.display())))?;

        let mut dims = Dimensions::from_class_name(file_name, &self.default_types);
        let mut content = text.to_owned();
        if let Some(caps) = CONTEXT_START_P.find_at(text, 0)? {
            if let Some(header) = caps.get(0).filter(|m| m.start() == 0) {
                dims = explicit_dimensions(text, header.as_str(), file_name)?;
                content = format!("{}\n", text[header.end()..].trim());
            }
        }
        log::info!("Target dimensions of {}: {dims}", path.display());

        let contexts = dims.generate_contexts();
        let main_context = match contexts.first() {
            Some(first) => self.default_context.join(first),
            None => self.default_context.clone(),
        };

        let mut file_condition = None;
        if let Some(caps) = COND_START_P.find_at(&content, 0)? {
            if let Some(header) = caps.get(0).filter(|m| m.start() == 0) {
                let condition = condition_of(header.as_str())?;
                file_condition = Some(Condition::parse_checked(
                    condition,
                    &main_context,
                    &content,
                    0,
                )?);
                content = format!("{}\n", content[header.end()..].trim());
            }
        }

        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let mut files = Vec::new();
        for combination in &contexts {
            if !self.filter.permits(combination) {
                log::debug!("Context filtered by generator: {combination}");
                continue;
            }
            let target = self.default_context.join(combination);
            if let Some(condition) = &file_condition {
                if !condition.check(&target) {
                    log::debug!("Context filtered by file condition: {target}");
                    continue;
                }
            }

            let mut name = self.generate(&main_context, &target, file_name)?.text;
            let generated = self.generate(&main_context, &target, &content)?;
            let class_name = class_name_of(&name).to_owned();
            if let Some(redefined) = generated.class_name.filter(|r| *r != class_name) {
                log::info!("Class name redefined: {class_name} -> {redefined}");
                name = name.replace(&class_name, &redefined);
            }
            files.push(GeneratedFile {
                template: path.to_path_buf(),
                path: parent.join(name),
                context: target,
                text: generated.text,
            });
        }
        Ok(files)
    }

    /// Generate every template of `source`. A failing template is recorded
    /// and the others still run.
    pub fn generate_all(&self, source: &dyn TemplateSource) -> Result<GenerationReport, GenError> {
        let templates = source.list_templates().map_err(|e| GenError::Io {
            path: source.location().to_path_buf(),
            source: e,
        })?;
        let mut report = GenerationReport::default();
        for template in templates {
            log::info!("Processing template: {}", template.display());
            let result = source
                .read_template(&template)
                .map_err(|e| GenError::Io {
                    path: source.location().join(&template),
                    source: e,
                })
                .and_then(|text| self.generate_template(&template, &text));
            match result {
                Ok(files) => report.files.extend(files),
                Err(error) => {
                    log::debug!("Template {} failed: {error}", template.display());
                    report.failures.push(TemplateFailure { template, error });
                }
            }
        }
        Ok(report)
    }
}

/// `pkg.IntList.java` -> `IntList`, so service files like
/// `META-INF/services/com.acme.IntCodec` keep their package prefix.
fn class_name_of(file_name: &str) -> &str {
    let base = file_name.strip_suffix(".java").unwrap_or(file_name);
    base.rsplit('.').next().unwrap_or(base)
}

/// Dimensions of a `with` header. The first option of every dimension must
/// be spelled in the file name, since the file name is rewritten from it.
fn explicit_dimensions(
    template: &str,
    header: &str,
    file_name: &str,
) -> Result<Dimensions, GenError> {
    let dims = Dimensions::parse_for_context(dimensions_of(header)?).map_err(|e| match e {
        GenError::Malformed(m) => GenError::malformed(template, 0, m.message),
        other => other,
    })?;
    for (dim, options) in dims.iter() {
        let Some(first) = options.first() else {
            continue;
        };
        if first.intermediate_replace(file_name, "dummy") == file_name {
            return Err(GenError::malformed(
                template,
                0,
                format!(
                    "Dimension {dim} with options {} specified explicitly is not found in \
                     the file name {file_name}",
                    options_list(options)
                ),
            ));
        }
    }
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_error(builder: GeneratorBuilder) -> String {
        match builder.build() {
            Err(GenError::Config(message)) => message,
            Err(other) => panic!("expected a configuration error, got {other}"),
            Ok(_) => panic!("expected a configuration error"),
        }
    }

    #[test]
    fn default_types_reject_simple_options() {
        let message = config_error(Generator::builder().default_types("int|Fast"));
        assert!(message.contains("Simple options like Fast"));
    }

    #[test]
    fn with_takes_single_options() {
        let message = config_error(Generator::builder().with("Preconditions|Assert checks"));
        assert!(message.contains("with accepts only dimensions with a single option"));
        let message = config_error(Generator::builder().with_cli("checks=Preconditions|Assert"));
        assert!(message.contains("only trivial dimensions"));
    }

    #[test]
    fn malformed_descriptors_are_configuration_errors() {
        config_error(Generator::builder().include("int"));
        config_error(Generator::builder().exclude_cli("elem"));
    }

    #[test]
    fn with_builds_default_context() {
        let generator = Generator::builder()
            .with("Preconditions checks")
            .with_cli("mode=Fast")
            .build()
            .unwrap();
        assert_eq!(
            generator.default_context().to_string(),
            "{checks=Preconditions, mode=Fast}"
        );
    }

    #[test]
    fn class_name_of_strips_package_and_extension() {
        assert_eq!(class_name_of("IntList.java"), "IntList");
        assert_eq!(class_name_of("com.acme.IntCodec"), "IntCodec");
        assert_eq!(class_name_of("Plain"), "Plain");
    }
}
