#![allow(clippy::result_large_err)]
//! primspec-core: combinatorial specialization of Java templates over
//! primitive types.
//!
//! A template is ordinary Java written for one choice per dimension (say
//! `int` for the element type). The generator rewrites it for every other
//! combination of options, evaluating the directives embedded in comments
//! along the way.
//!
//! # Public API
//!
//! - [`Generator`] / [`GeneratorBuilder`] -- configure and run generation
//! - [`TemplateSource`] with [`FileSystemSource`] and [`InMemorySource`]
//! - [`Pipeline`] and the [`Processor`] trait -- the ordered processor chain
//! - [`Context`], [`Dimensions`], [`DimOption`] -- what a combination is made of
//! - [`GenError`] -- every failure the generator reports

pub mod condition;
pub mod context;
pub mod dimensions;
pub mod directive;
pub mod error;
pub mod filter;
pub mod generate;
pub mod lexer;
pub mod options;
pub mod pipeline;
pub mod processors;
pub mod source;

// ── Convenience re-exports ───────────────────────────────────────────

pub use condition::Condition;
pub use context::Context;
pub use dimensions::Dimensions;
pub use error::{GenError, Malformed};
pub use filter::ContextFilter;
pub use generate::{
    GeneratedFile, Generated, GenerationReport, Generator, GeneratorBuilder, TemplateFailure,
};
pub use options::{DimOption, ObjectStyle, PrimitiveType, SimpleOption, Substitute};
pub use processors::Modifier;
pub use pipeline::{Downstream, Pass, PassState, Pipeline, Processor, Step};
pub use source::{FileSystemSource, InMemorySource, TemplateSource};
