//! Conjunctive filtering over entities
//!
//! A [`FilterPipeline`] holds at most one predicate per [`FilterKind`]; an
//! entity passes when every active predicate accepts it.

pub mod builtin;
pub mod pipeline;
pub mod predicate;

pub use pipeline::FilterPipeline;
pub use predicate::{FilterKind, NamedPredicate, PredicateFn};
