use super::SUBSTITUTION_PRIORITY;
use crate::error::GenError;
use crate::options::Substitute;
use crate::pipeline::{Downstream, Pass, PassState, Processor, Step};

/// Rewrites the source spellings of every dimension into the target ones.
///
/// All dimensions move to their placeholders before any placeholder is
/// resolved, so a target spelling written for one dimension is never picked
/// up as the source spelling of another.
pub struct SubstitutionProcessor;

impl Processor for SubstitutionProcessor {
    fn name(&self) -> &'static str {
        "substitution"
    }

    fn priority(&self) -> i32 {
        SUBSTITUTION_PRIORITY
    }

    fn process(
        &self,
        text: &str,
        pass: &Pass<'_>,
        _rest: Downstream<'_>,
        _state: &mut PassState,
    ) -> Result<Step, GenError> {
        let mut text = text.to_owned();
        for (dim, _) in pass.target.iter() {
            if let Some(source) = pass.source.get(dim) {
                text = source.intermediate_replace(&text, dim);
            }
        }
        for (dim, target) in pass.target.iter() {
            text = target.final_replace(&text, dim);
        }
        Ok(Step::Continue(text))
    }
}
