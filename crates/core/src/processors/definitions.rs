use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};

use super::DEFINITIONS_PRIORITY;
use crate::directive::{self, CheckingPattern};
use crate::error::GenError;
use crate::pipeline::{Downstream, Pass, PassState, Processor, Step};

/// Definition whose expansion renames the generated class.
pub const CLASS_NAME: &str = "ClassName";

static DEF_P: Lazy<CheckingPattern> = Lazy::new(|| {
    CheckingPattern::new(
        "define",
        r"(?i)/[*/]\s*define\b",
        r"(?is)/[*/]\s*define\s+(?P<name>[a-z_0-9]+)(?:\s+(?P<param>[a-z_0-9]+))?\s*[*/]/(?P<body>.+?)/[*/]\s*enddefine\s*[*/]/",
    )
    .expect("valid define pattern")
});

#[derive(Debug)]
struct Definition {
    name: String,
    param: Option<(String, Regex)>,
    body: String,
    uses: CheckingPattern,
}

impl Definition {
    fn new(name: String, param: Option<String>, body: String) -> Result<Self, GenError> {
        let prefix = format!(r"/[*/]\s*{}\b", regex::escape(&name));
        let uses = CheckingPattern::new(
            name.clone(),
            &prefix,
            &format!(
                r"(?s){prefix}(?:\s+(?P<argument>[^/*\s][^/* ]*)\s*|\s*)[*/]/(?:[^/]+?/[*/][*/]/)?"
            ),
        )?;
        let param = match param {
            Some(param) => {
                let re = Regex::new(&format!(r"\b{}\b", regex::escape(&param)))
                    .map_err(|e| GenError::internal(format!("parameter pattern: {e}")))?;
                Some((param, re))
            }
            None => None,
        };
        Ok(Definition {
            name,
            param,
            body,
            uses,
        })
    }

    fn parse(template: &str, caps: &Captures<'_>) -> Result<Self, GenError> {
        let name = directive::group(caps, "name")?.to_owned();
        let body = directive::group(caps, "body")?.trim().to_owned();
        let param = caps.name("param").map(|m| m.as_str().to_owned());
        if let (CLASS_NAME, Some(param)) = (name.as_str(), &param) {
            return Err(GenError::malformed(
                template,
                directive::start(caps),
                format!("{CLASS_NAME} must not have a parameter, {param} specified"),
            ));
        }
        Definition::new(name, param, body)
    }

    /// Replace every use of the definition in `template` with `body`.
    fn replace_uses(&self, template: &str, body: &str) -> Result<String, GenError> {
        self.uses.replace_each(template, |caps| {
            let argument = caps.name("argument").map(|m| m.as_str());
            match (&self.param, argument) {
                (None, None) => Ok(body.to_owned()),
                (Some((_, re)), Some(argument)) => {
                    Ok(re.replace_all(body, NoExpand(argument)).into_owned())
                }
                (Some((param, _)), None) => Err(GenError::malformed(
                    template,
                    directive::start(caps),
                    format!("Definition {} requires an argument {}", self.name, param),
                )),
                (None, Some(argument)) => Err(GenError::malformed(
                    template,
                    directive::start(caps),
                    format!(
                        "Definition {} doesn't have a parameter, {} given",
                        self.name, argument
                    ),
                )),
            }
        })
    }
}

/// The body of `definition` with every other definition expanded in it.
fn expanded_body(definitions: &[&Definition], definition: &Definition) -> Result<String, GenError> {
    let others: Vec<&Definition> = definitions
        .iter()
        .copied()
        .filter(|d| d.name != definition.name)
        .collect();
    replace_definitions(&others, &definition.body)
}

fn replace_definitions(definitions: &[&Definition], template: &str) -> Result<String, GenError> {
    // every use starts with a slash
    if !template.contains('/') {
        return Ok(template.to_owned());
    }
    let mut template = template.to_owned();
    for definition in definitions {
        let body = expanded_body(definitions, definition)?;
        template = definition.replace_uses(&template, &body)?;
    }
    Ok(template)
}

/// Strips `define NAME [PARAM] ... enddefine` blocks and expands their uses.
pub struct DefinitionProcessor;

impl Processor for DefinitionProcessor {
    fn name(&self) -> &'static str {
        "definitions"
    }

    fn priority(&self) -> i32 {
        DEFINITIONS_PRIORITY
    }

    fn process(
        &self,
        text: &str,
        pass: &Pass<'_>,
        rest: Downstream<'_>,
        state: &mut PassState,
    ) -> Result<Step, GenError> {
        let mut definitions = vec![Definition::new("comment".to_owned(), None, String::new())?];
        let stripped = DEF_P.replace_each(text, |caps| {
            let definition = Definition::parse(text, caps)?;
            if definitions.iter().any(|d| d.name == definition.name) {
                return Err(GenError::malformed(
                    text,
                    directive::start(caps),
                    format!(
                        "Definition with name {} already exists in this context",
                        definition.name
                    ),
                ));
            }
            definitions.push(definition);
            Ok(String::new())
        })?;

        let all: Vec<&Definition> = definitions.iter().collect();
        let mut template = stripped;
        for definition in &all {
            let body = expanded_body(&all, definition)?;
            if definition.name == CLASS_NAME {
                let class_name = rest.run(&body, pass, state)?.trim().to_owned();
                log::debug!("{CLASS_NAME} defined as {class_name}");
                state.class_name = Some(class_name);
            }
            template = definition.replace_uses(&template, &body)?;
        }
        Ok(Step::Continue(template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::filter::ContextFilter;
    use crate::pipeline::Pipeline;

    fn run(text: &str) -> Result<(String, Option<String>), GenError> {
        let pipeline = Pipeline::from_stages(vec![Box::new(DefinitionProcessor)]);
        let ctx = Context::empty();
        let filter = ContextFilter::default();
        let pass = Pass {
            source: &ctx,
            target: &ctx,
            filter: &filter,
        };
        let mut state = PassState::default();
        let out = pipeline.run(text, &pass, &mut state)?;
        Ok((out, state.class_name))
    }

    #[test]
    fn parameter_replaced_at_word_boundaries() {
        let text = "/* define check x */assert x != null; // x\n/* enddefine */\
                    /* check arg1 */ /* check x1 */";
        let (out, _) = run(text).unwrap();
        assert_eq!(out, "assert arg1 != null; // arg1 assert x1 != null; // x1");
    }

    #[test]
    fn argument_is_literal() {
        let text = "/* define get v */v.get()/* enddefine *//* get $1 */";
        assert_eq!(run(text).unwrap().0, "$1.get()");
    }

    #[test]
    fn comment_is_built_in() {
        let text = "a /* comment // anything at all //*/b";
        assert_eq!(run(text).unwrap().0, "a b");
    }

    #[test]
    fn closed_use_drops_fallback_text() {
        let text = "/* define name */Foo/* enddefine */new /* name */Bar/**/();";
        assert_eq!(run(text).unwrap().0, "new Foo();");
    }

    #[test]
    fn nested_definitions_expand() {
        let text = "/* define inner */I/* enddefine */\
                    /* define outer */[/* inner */]/* enddefine */\
                    /* outer */";
        assert_eq!(run(text).unwrap().0, "[I]");
    }

    #[test]
    fn class_name_goes_to_pass_state() {
        let text = "/* define ClassName */  IntThings /* enddefine */class /* ClassName */ {}";
        let (out, class_name) = run(text).unwrap();
        assert_eq!(out, "class IntThings {}");
        assert_eq!(class_name.as_deref(), Some("IntThings"));
    }

    #[test]
    fn missing_argument_is_malformed() {
        let text = "/* define check x */x/* enddefine */\n/* check */";
        let err = run(text).unwrap_err();
        assert!(err.to_string().contains("Definition check requires an argument x"));
    }

    #[test]
    fn unexpected_argument_is_malformed() {
        let text = "/* define flag */1/* enddefine */\n/* flag on */";
        let err = run(text).unwrap_err();
        assert!(err
            .to_string()
            .contains("Definition flag doesn't have a parameter, on given"));
    }

    #[test]
    fn duplicate_definition_is_malformed() {
        let text = "/* define a */1/* enddefine *//* define a */2/* enddefine */";
        let err = run(text).unwrap_err();
        assert!(err.to_string().contains("Definition with name a already exists"));
    }

    #[test]
    fn class_name_with_parameter_is_malformed() {
        let text = "/* define ClassName x */x/* enddefine */";
        assert!(matches!(run(text), Err(GenError::Malformed(_))));
    }
}
