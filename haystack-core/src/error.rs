use crate::filtering::FilterKind;
use crate::sorting::ComparatorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Projections have not been computed yet")]
    NotComputed,
}

/// Fatal setup mistakes, surfaced as soon as they are requested.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{feature} requires a group key accessor")]
    MissingGroupKeyAccessor { feature: &'static str },

    #[error("comparator chain holds more than one `{0}` comparator")]
    DuplicateComparatorKind(ComparatorKind),

    #[error("filter pipeline holds more than one `{0}` predicate")]
    DuplicatePredicateKind(FilterKind),
}

/// Failures reported by the host while fetching the master collection.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("entity source unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ListError>;
