pub use crate::{
    Entity, EntityId, EntityKind, EntityRecord, GroupKey, ModelError,
    Position,
};
