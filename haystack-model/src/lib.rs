//! Entity data model shared across Haystack crates.
//!
//! The list engine treats every tracked object as opaque; the types here are
//! the narrow surface it reads through.
#![allow(missing_docs)]

pub mod entity;
pub mod error;
pub mod group;
pub mod ids;
pub mod kind;
pub mod position;
pub mod prelude;

pub use entity::{Entity, EntityRecord};
pub use error::ModelError;
pub use group::GroupKey;
pub use ids::EntityId;
pub use kind::EntityKind;
pub use position::Position;
