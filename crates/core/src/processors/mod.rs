//! The standard template processors, in the order they run.

mod article;
mod blocks;
mod constants;
mod definitions;
mod floating;
mod modifier;
mod substitution;

pub use article::ArticleProcessor;
pub use blocks::BlocksProcessor;
pub use constants::ConstProcessor;
pub use definitions::DefinitionProcessor;
pub use floating::FloatingWrappingProcessor;
pub use modifier::{
    DimFilter, Modifier, ModifierPostProcessor, ModifierPreProcessor, TypeMapper,
};
pub use substitution::SubstitutionProcessor;

use crate::pipeline::Processor;

pub const DEFINITIONS_PRIORITY: i32 = 100;
pub const BLOCKS_PRIORITY: i32 = 200;
pub const FLOATING_PRIORITY: i32 = 300;
pub const MODIFIER_PRE_PRIORITY: i32 = 400;
pub const SUBSTITUTION_PRIORITY: i32 = 500;
pub const CONST_PRIORITY: i32 = 600;
pub const MODIFIER_POST_PRIORITY: i32 = 700;
pub const ARTICLE_PRIORITY: i32 = 800;

/// Identifier-like token or numeric literal following a directive.
pub(crate) const JAVA_ID_OR_CONST: &str =
    r"(?:-?[0-9][\w.]*|[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)";

/// The built-in stages, `bits` modifier included.
pub fn standard() -> Vec<Box<dyn Processor>> {
    let mut stages: Vec<Box<dyn Processor>> = vec![
        Box::new(DefinitionProcessor),
        Box::new(BlocksProcessor),
        Box::new(FloatingWrappingProcessor),
        Box::new(SubstitutionProcessor),
        Box::new(ConstProcessor),
        Box::new(ArticleProcessor),
    ];
    stages.extend(Modifier::bits().processors());
    stages
}
