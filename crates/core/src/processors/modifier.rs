//! Primitive type modifiers: `/* KEYWORD DIM */ident` makes `ident` name a
//! type derived from the option of `DIM` instead of that option itself.
//!
//! `bits` is built in: it names the raw-bits type of a floating dimension
//! (`float` -> `int`, `double` -> `long`). Callers register more through
//! [`GeneratorBuilder::modifier`](crate::GeneratorBuilder::modifier).

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{MODIFIER_POST_PRIORITY, MODIFIER_PRE_PRIORITY};
use crate::directive::{self, CheckingPattern};
use crate::error::GenError;
use crate::options::{DimOption, PrimitiveType, Substitute};
use crate::pipeline::{Downstream, Pass, PassState, Processor, Step};

pub type TypeMapper = Arc<dyn Fn(PrimitiveType) -> PrimitiveType + Send + Sync>;
pub type DimFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

static BITS: Lazy<Modifier> = Lazy::new(|| {
    Modifier::new("bits", PrimitiveType::bits_type, |_: &str| true)
        .expect("valid bits modifier")
});

/// One modifier keyword. Primitive options are mapped through `mapper`,
/// other options stand for themselves. Directives on dimensions rejected by
/// the filter only lose their marker.
#[derive(Clone)]
pub struct Modifier {
    keyword: String,
    pattern: Arc<CheckingPattern>,
    mapper: TypeMapper,
    dim_filter: DimFilter,
}

impl Modifier {
    pub fn new(
        keyword: impl Into<String>,
        mapper: impl Fn(PrimitiveType) -> PrimitiveType + Send + Sync + 'static,
        dim_filter: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Result<Self, GenError> {
        Self::from_shared(keyword.into(), Arc::new(mapper), Arc::new(dim_filter))
    }

    pub(crate) fn from_shared(
        keyword: String,
        mapper: TypeMapper,
        dim_filter: DimFilter,
    ) -> Result<Self, GenError> {
        if keyword.is_empty() || !keyword.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(GenError::config(format!(
                "modifier keyword must be a single word, found `{keyword}`"
            )));
        }
        let escaped = regex::escape(&keyword);
        let pattern = CheckingPattern::new(
            keyword.as_str(),
            &format!(r"(?i)/[*/]\s*{escaped}\b"),
            &format!(r"(?i)/[*/]\s*{escaped}\s+(?P<dim>\w+)\s*[*/]/(?P<body>[A-Za-z_$][\w$]*)"),
        )?;
        Ok(Modifier {
            keyword,
            pattern: Arc::new(pattern),
            mapper,
            dim_filter,
        })
    }

    /// The built-in `bits` modifier.
    pub fn bits() -> Self {
        BITS.clone()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The stage pair that applies this modifier around substitution.
    pub fn processors(&self) -> [Box<dyn Processor>; 2] {
        [
            Box::new(ModifierPreProcessor(self.clone())),
            Box::new(ModifierPostProcessor(self.clone())),
        ]
    }

    fn map(&self, option: &DimOption) -> DimOption {
        match option.as_primitive() {
            Some(p) => DimOption::Primitive((self.mapper)(p)),
            None => option.clone(),
        }
    }

    fn modified_dim(&self, dim: &str) -> String {
        format!("{dim}.{}", self.keyword)
    }
}

/// Moves the identifier after the directive into the placeholders of
/// `DIM.KEYWORD`, out of reach of the substitution of `DIM`.
pub struct ModifierPreProcessor(Modifier);

impl Processor for ModifierPreProcessor {
    fn name(&self) -> &'static str {
        "modifier-pre"
    }

    fn priority(&self) -> i32 {
        MODIFIER_PRE_PRIORITY
    }

    fn process(
        &self,
        text: &str,
        pass: &Pass<'_>,
        _rest: Downstream<'_>,
        _state: &mut PassState,
    ) -> Result<Step, GenError> {
        let modifier = &self.0;
        let out = modifier.pattern.replace_each(text, |caps| {
            let dim = directive::group(caps, "dim")?;
            let body = directive::group(caps, "body")?;
            let option = pass.source.get(dim).ok_or_else(|| {
                GenError::malformed(
                    text,
                    directive::start(caps),
                    format!("Nonexistent dimension: {dim}, available dims: {}", pass.source),
                )
            })?;
            if !(modifier.dim_filter)(dim) {
                return Ok(body.to_owned());
            }
            Ok(modifier
                .map(option)
                .intermediate_replace(body, &modifier.modified_dim(dim)))
        })?;
        Ok(Step::Continue(out))
    }
}

/// Resolves the `DIM.KEYWORD` placeholders left after substitution through
/// the mapped type of each target option.
pub struct ModifierPostProcessor(Modifier);

impl Processor for ModifierPostProcessor {
    fn name(&self) -> &'static str {
        "modifier-post"
    }

    fn priority(&self) -> i32 {
        MODIFIER_POST_PRIORITY
    }

    fn process(
        &self,
        text: &str,
        pass: &Pass<'_>,
        _rest: Downstream<'_>,
        _state: &mut PassState,
    ) -> Result<Step, GenError> {
        let modifier = &self.0;
        let mut text = text.to_owned();
        for (dim, option) in pass.target.iter() {
            if (modifier.dim_filter)(dim) {
                text = modifier
                    .map(option)
                    .final_replace(&text, &modifier.modified_dim(dim));
            }
        }
        Ok(Step::Continue(text))
    }
}
