//! The ordered chain of template processors.
//!
//! Stages run in ascending priority. A stage either hands its output to the
//! next stage ([`Step::Continue`]) or, having run the rest of the chain
//! itself through [`Downstream`], ends the pass ([`Step::Done`]).

use crate::context::Context;
use crate::error::GenError;
use crate::filter::ContextFilter;
use crate::processors;

/// The contexts one pass runs under.
#[derive(Debug, Clone, Copy)]
pub struct Pass<'a> {
    /// Options the template is written for.
    pub source: &'a Context,
    /// Options being generated.
    pub target: &'a Context,
    pub filter: &'a ContextFilter,
}

impl<'a> Pass<'a> {
    /// The same pass under other contexts, e.g. inside a `with` block.
    pub fn with_contexts(&self, source: &'a Context, target: &'a Context) -> Pass<'a> {
        Pass {
            source,
            target,
            filter: self.filter,
        }
    }
}

/// State scoped to one template x combination pass.
#[derive(Debug, Default)]
pub struct PassState {
    /// Expansion of the `ClassName` definition, if the template has one.
    pub class_name: Option<String>,
}

pub enum Step {
    Continue(String),
    Done(String),
}

pub trait Processor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower runs earlier.
    fn priority(&self) -> i32;

    fn process(
        &self,
        text: &str,
        pass: &Pass<'_>,
        rest: Downstream<'_>,
        state: &mut PassState,
    ) -> Result<Step, GenError>;
}

/// The stages after the running one.
#[derive(Clone, Copy)]
pub struct Downstream<'a> {
    stages: &'a [Box<dyn Processor>],
}

impl<'a> Downstream<'a> {
    pub fn run(&self, text: &str, pass: &Pass<'_>, state: &mut PassState) -> Result<String, GenError> {
        let mut text = text.to_owned();
        for (i, stage) in self.stages.iter().enumerate() {
            let rest = Downstream {
                stages: &self.stages[i + 1..],
            };
            match stage.process(&text, pass, rest, state)? {
                Step::Continue(next) => text = next,
                Step::Done(done) => return Ok(done),
            }
        }
        Ok(text)
    }
}

pub struct Pipeline {
    stages: Vec<Box<dyn Processor>>,
}

impl Pipeline {
    /// Sort `stages` by priority, keeping registration order for ties.
    pub fn from_stages(mut stages: Vec<Box<dyn Processor>>) -> Self {
        stages.sort_by_key(|s| s.priority());
        Pipeline { stages }
    }

    /// The standard processors plus `extra`.
    pub fn standard(extra: Vec<Box<dyn Processor>>) -> Self {
        let mut stages = processors::standard();
        stages.extend(extra);
        Pipeline::from_stages(stages)
    }

    pub fn run(&self, text: &str, pass: &Pass<'_>, state: &mut PassState) -> Result<String, GenError> {
        Downstream {
            stages: &self.stages,
        }
        .run(text, pass, state)
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}
