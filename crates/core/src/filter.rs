use crate::context::Context;
use crate::dimensions::Dimensions;
use crate::options::DimOption;

/// Generator-wide restrictions on which combinations are generated.
#[derive(Debug, Clone, Default)]
pub struct ContextFilter {
    /// Options excluded from every dimension.
    pub never: Vec<DimOption>,
    /// When non-empty, a combination must satisfy at least one of these.
    pub include: Vec<Dimensions>,
    /// A combination satisfying any of these is dropped.
    pub exclude: Vec<Dimensions>,
}

impl ContextFilter {
    pub fn permits(&self, context: &Context) -> bool {
        if context.iter().any(|(_, o)| self.never.contains(o)) {
            return false;
        }
        if !self.include.is_empty() && !self.include.iter().any(|c| c.check_as_condition(context))
        {
            return false;
        }
        !self.exclude.iter().any(|c| c.check_as_condition(context))
    }
}
