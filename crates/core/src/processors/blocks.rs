use regex::Match;

use super::BLOCKS_PRIORITY;
use crate::condition::Condition;
use crate::dimensions::Dimensions;
use crate::directive::{
    classify, condition_of, dimensions_of, BlockPart, ANY_BLOCK_PART_P, COND_PART_P,
    CONTEXT_PART_P,
};
use crate::error::GenError;
use crate::pipeline::{Downstream, Pass, PassState, Processor, Step};

/// Evaluates `if`/`elif`/`endif` and `with`/`endwith` blocks. The text
/// between blocks goes through the rest of the chain one segment at a time,
/// each under the contexts of its enclosing blocks.
pub struct BlocksProcessor;

impl Processor for BlocksProcessor {
    fn name(&self) -> &'static str {
        "blocks"
    }

    fn priority(&self) -> i32 {
        BLOCKS_PRIORITY
    }

    fn process(
        &self,
        text: &str,
        pass: &Pass<'_>,
        rest: Downstream<'_>,
        state: &mut PassState,
    ) -> Result<Step, GenError> {
        let mut blocks = Blocks { rest, state };
        Ok(Step::Done(blocks.expand(text, pass)?))
    }
}

struct Blocks<'r, 's> {
    rest: Downstream<'r>,
    state: &'s mut PassState,
}

fn whole<'t>(caps: &regex::Captures<'t>) -> Result<Match<'t>, GenError> {
    caps.get(0)
        .ok_or_else(|| GenError::internal("block match without group 0"))
}

impl Blocks<'_, '_> {
    fn linear(&mut self, text: &str, pass: &Pass<'_>, out: &mut String) -> Result<(), GenError> {
        out.push_str(&self.rest.run(text, pass, self.state)?);
        Ok(())
    }

    fn expand(&mut self, template: &str, pass: &Pass<'_>) -> Result<String, GenError> {
        let mut out = String::with_capacity(template.len());
        let mut prev_end = 0;
        while let Some(caps) = ANY_BLOCK_PART_P.find_at(template, prev_end)? {
            let start = whole(&caps)?;
            self.linear(&template[prev_end..start.start()], pass, &mut out)?;
            prev_end = match classify(start.as_str()) {
                Some(BlockPart::If) => self.expand_if(template, start, pass, &mut out)?,
                Some(BlockPart::With) => self.expand_with(template, start, pass, &mut out)?,
                _ => {
                    return Err(GenError::malformed(
                        template,
                        start.start(),
                        "Block end or `elif` branch without start",
                    ))
                }
            };
        }
        self.linear(&template[prev_end..], pass, &mut out)?;
        Ok(out)
    }

    /// Emit the first branch whose condition holds. Returns the end of the
    /// closing `endif`.
    fn expand_if(
        &mut self,
        template: &str,
        start: Match<'_>,
        pass: &Pass<'_>,
        out: &mut String,
    ) -> Result<usize, GenError> {
        let not_closed = || GenError::malformed(template, start.start(), "`if` block is not closed");
        let mut branch_cond =
            Condition::parse_checked(condition_of(start.as_str())?, pass.source, template, start.start())?;
        let mut branch_start = start.end();
        let mut nest = 0usize;
        let mut from = branch_start;
        while let Some(caps) = COND_PART_P.find_at(template, from)? {
            let part = whole(&caps)?;
            from = part.end();
            let kind = classify(part.as_str());
            if kind == Some(BlockPart::If) {
                nest += 1;
                continue;
            }
            if nest != 0 {
                if kind == Some(BlockPart::EndIf) {
                    nest -= 1;
                }
                continue;
            }
            if branch_cond.check(pass.target) {
                let branch = &template[branch_start..part.start()];
                out.push_str(&self.expand(branch, pass)?);
                if kind == Some(BlockPart::EndIf) {
                    return Ok(part.end());
                }
                return skip_branches(template, from)?.ok_or_else(not_closed);
            }
            if kind == Some(BlockPart::EndIf) {
                return Ok(part.end());
            }
            branch_cond = Condition::parse_checked(
                condition_of(part.as_str())?,
                pass.source,
                template,
                part.start(),
            )?;
            branch_start = part.end();
        }
        Err(not_closed())
    }

    /// Emit the block body once per combination of the block's dimensions.
    /// Returns the end of the closing `endwith`.
    fn expand_with(
        &mut self,
        template: &str,
        start: Match<'_>,
        pass: &Pass<'_>,
        out: &mut String,
    ) -> Result<usize, GenError> {
        let dims = Dimensions::parse_for_context(dimensions_of(start.as_str())?).map_err(|e| {
            match e {
                GenError::Malformed(m) => GenError::malformed(template, start.start(), m.message),
                other => other,
            }
        })?;
        let mut nest = 0usize;
        let mut from = start.end();
        while let Some(caps) = CONTEXT_PART_P.find_at(template, from)? {
            let part = whole(&caps)?;
            from = part.end();
            if classify(part.as_str()) != Some(BlockPart::EndWith) {
                nest += 1;
                continue;
            }
            if nest != 0 {
                nest -= 1;
                continue;
            }
            let block = &template[start.end()..part.start()];
            let contexts = dims.generate_contexts();
            let Some(first) = contexts.first() else {
                return Ok(part.end());
            };
            let source = pass.source.join(first);
            for context in &contexts {
                let target = pass.target.join(context);
                // a single combination only binds names, it is never filtered
                if contexts.len() == 1 || pass.filter.permits(&target) {
                    out.push_str(&self.expand(block, &pass.with_contexts(&source, &target))?);
                } else {
                    log::debug!("Context filtered by generator: {target}");
                }
            }
            return Ok(part.end());
        }
        Err(GenError::malformed(
            template,
            start.start(),
            "`with` block is not closed",
        ))
    }
}

/// Skip the remaining branches of an `if` block. Returns the end of its
/// `endif`, `Ok(None)` when the block never closes.
fn skip_branches(template: &str, mut from: usize) -> Result<Option<usize>, GenError> {
    let mut nest = 0usize;
    while let Some(caps) = COND_PART_P.find_at(template, from)? {
        let part = whole(&caps)?;
        from = part.end();
        match classify(part.as_str()) {
            Some(BlockPart::EndIf) if nest == 0 => return Ok(Some(part.end())),
            Some(BlockPart::EndIf) => nest -= 1,
            Some(BlockPart::If) => nest += 1,
            _ => {}
        }
    }
    Ok(None)
}
