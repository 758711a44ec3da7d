use std::fmt::{self, Display};

/// Errors produced by model constructors and parsing routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownEntityKind(String),
    InvalidId(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownEntityKind(label) => {
                write!(f, "unknown entity kind: {label}")
            }
            ModelError::InvalidId(raw) => write!(f, "invalid entity id: {raw}"),
        }
    }
}

impl std::error::Error for ModelError {}
