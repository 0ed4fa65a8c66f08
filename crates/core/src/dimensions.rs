//! Dimension declarations and the combinations they span.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::Context;
use crate::error::GenError;
use crate::options::{parse_options, DimOption};

/// `opt1|opt2 dim1 opt3 dim2`
pub(crate) const DIMENSIONS_PATTERN: &str = r"(?:\s*\w+(?:\|\w+)*\s+\w+\s*)+";

static DIMENSIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\A{DIMENSIONS_PATTERN}\z")).expect("valid dimensions regex")
});

static DIMENSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<options>\w+(?:\|\w+)*)\s+(?P<dim>\w+)").expect("valid dimension regex")
});

/// Dimensions with their candidate options, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions {
    dims: Vec<(String, Vec<DimOption>)>,
}

impl Dimensions {
    fn insert(&mut self, dim: String, options: Vec<DimOption>) {
        match self.dims.iter_mut().find(|(d, _)| *d == dim) {
            Some(entry) => entry.1 = options,
            None => self.dims.push((dim, options)),
        }
    }

    /// Parse the template form `opt1|opt2 dim1 opt3 dim2`.
    pub fn parse_for_context(descriptor: &str) -> Result<Dimensions, GenError> {
        if !DIMENSIONS_RE.is_match(descriptor) {
            return Err(GenError::malformed(
                descriptor,
                0,
                "Expected dimensions in `opt1|opt2 dim1 opt3 dim2` format",
            ));
        }
        let mut dims = Dimensions::default();
        for caps in DIMENSION_RE.captures_iter(descriptor) {
            let (Some(options), Some(dim)) = (caps.name("options"), caps.name("dim")) else {
                return Err(GenError::internal("dimension regex matched without groups"));
            };
            dims.insert(dim.as_str().to_owned(), parse_options(options.as_str()));
        }
        Ok(dims)
    }

    /// Parse the command-line form `dim1=opt1|opt2,dim2=opt3`.
    pub fn parse_cli(descriptor: &str) -> Result<Dimensions, GenError> {
        let mut dims = Dimensions::default();
        for part in descriptor.split(',').filter(|p| !p.trim().is_empty()) {
            let Some((dim, options)) = part.split_once('=') else {
                return Err(GenError::config(format!(
                    "expected `dim=opt1|opt2`, found `{part}` in `{descriptor}`"
                )));
            };
            let (dim, options) = (dim.trim(), options.trim());
            if dim.is_empty() || options.is_empty() || options.contains('=') {
                return Err(GenError::config(format!(
                    "expected `dim=opt1|opt2`, found `{part}` in `{descriptor}`"
                )));
            }
            dims.insert(dim.to_owned(), parse_options(options));
        }
        Ok(dims)
    }

    /// Infer dimensions from a template file name: every default type whose
    /// spelling occurs in the name becomes a dimension named `t`, `u`, `v`...
    /// by order of first occurrence, ranging over that type first and then
    /// the other default types.
    pub fn from_class_name(name: &str, default_types: &[DimOption]) -> Dimensions {
        let mut found: Vec<(&DimOption, usize)> = default_types
            .iter()
            .filter_map(|t| t.first_occurrence(name).map(|at| (t, at)))
            .collect();
        found.sort_by_key(|&(_, at)| at);

        let mut dims = Dimensions::default();
        for (i, (main, _)) in found.into_iter().enumerate() {
            let mut options = vec![main.clone()];
            options.extend(default_types.iter().filter(|t| *t != main).cloned());
            dims.insert(class_dim_name(i), options);
        }
        dims
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DimOption])> {
        self.dims.iter().map(|(d, o)| (d.as_str(), o.as_slice()))
    }

    pub fn get(&self, dim: &str) -> Option<&[DimOption]> {
        self.dims
            .iter()
            .find(|(d, _)| d == dim)
            .map(|(_, o)| o.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Every combination of options, the first dimension varying fastest.
    /// No dimensions yield a single empty context.
    pub fn generate_contexts(&self) -> Vec<Context> {
        let total: usize = self.dims.iter().map(|(_, o)| o.len()).product();
        let mut contexts = Vec::with_capacity(total);
        for comb in 0..total {
            let mut rem = comb;
            let mut builder = Context::builder();
            for (dim, options) in &self.dims {
                builder = builder.put(dim.clone(), options[rem % options.len()].clone());
                rem /= options.len();
            }
            contexts.push(builder.build());
        }
        contexts
    }

    /// Whether `context` binds every dimension to one of its options.
    pub fn check_as_condition(&self, context: &Context) -> bool {
        self.dims
            .iter()
            .all(|(dim, options)| context.get(dim).is_some_and(|o| options.contains(o)))
    }
}

fn class_dim_name(index: usize) -> String {
    char::from_u32('t' as u32 + index as u32)
        .map(String::from)
        .unwrap_or_else(|| format!("t{index}"))
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (dim, options)) in self.dims.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dim}=[")?;
            for (j, option) in options.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{option}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("}")
    }
}
