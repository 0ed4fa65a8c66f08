//! Dimension options and the two-phase identifier substitution they drive.
//!
//! Rewriting a template from a source option to a target option happens in
//! two steps per dimension: [`Substitute::intermediate_replace`] turns every
//! source spelling into the dimension's placeholder family
//! ([`IntermediateOption`]), then [`Substitute::final_replace`] turns the
//! placeholders into target spellings. Placeholders never contain letters, so
//! dimensions with overlapping spellings cannot interfere with each other.

mod intermediate;
mod object;
mod primitive;
mod simple;
pub(crate) mod spelling;

use std::fmt;

pub use intermediate::{IdCase, IdLength, IntermediateOption};
pub use object::ObjectStyle;
pub use primitive::{FloatingBits, PrimitiveType};
pub use simple::SimpleOption;

/// Identifier substitution between a source and a target option.
pub trait Substitute {
    /// Rewrite this option's spellings in `text` into the placeholders of
    /// `dim`.
    fn intermediate_replace(&self, text: &str, dim: &str) -> String;

    /// Rewrite the placeholders of `dim` in `text` into this option's
    /// spellings.
    fn final_replace(&self, text: &str, dim: &str) -> String;

    /// Literal of the option's default value, `None` when the option does not
    /// stand for a code type.
    fn default_value(&self) -> Option<String>;
}

/// One concrete choice for a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DimOption {
    Primitive(PrimitiveType),
    Object(ObjectStyle),
    Simple(SimpleOption),
}

impl DimOption {
    /// Parse an option name: primitive names and `obj`/`object` ignore case,
    /// anything else is a simple label.
    pub fn parse(name: &str) -> DimOption {
        if let Some(p) = PrimitiveType::from_name(name) {
            DimOption::Primitive(p)
        } else if let Some(style) = ObjectStyle::from_name(name) {
            DimOption::Object(style)
        } else {
            DimOption::Simple(SimpleOption::new(name))
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            DimOption::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Bit-reinterpretation calls when the option is a floating type.
    pub fn floating_bits(&self) -> Option<FloatingBits> {
        self.as_primitive().and_then(PrimitiveType::floating_bits)
    }
    /// Offset of the earliest own spelling of the option in `text`. Only
    /// primitive options are ever found, other options never act as sources.
    pub(crate) fn first_occurrence(&self, text: &str) -> Option<usize> {
        self.as_primitive().and_then(|p| p.first_occurrence(text))
    }

    fn inner(&self) -> &dyn Substitute {
        match self {
            DimOption::Primitive(p) => p,
            DimOption::Object(o) => o,
            DimOption::Simple(s) => s,
        }
    }
}

impl Substitute for DimOption {
    fn intermediate_replace(&self, text: &str, dim: &str) -> String {
        self.inner().intermediate_replace(text, dim)
    }

    fn final_replace(&self, text: &str, dim: &str) -> String {
        self.inner().final_replace(text, dim)
    }

    fn default_value(&self) -> Option<String> {
        self.inner().default_value()
    }
}

impl fmt::Display for DimOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimOption::Primitive(p) => p.fmt(f),
            DimOption::Object(o) => o.fmt(f),
            DimOption::Simple(s) => s.fmt(f),
        }
    }
}

impl From<PrimitiveType> for DimOption {
    fn from(p: PrimitiveType) -> Self {
        DimOption::Primitive(p)
    }
}

/// Split `opt1|opt2|...` into options.
pub fn parse_options(descriptor: &str) -> Vec<DimOption> {
    descriptor
        .split('|')
        .filter(|s| !s.is_empty())
        .map(DimOption::parse)
        .collect()
}
