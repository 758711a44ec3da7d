use std::fmt;
use std::sync::Arc;

/// Key used to partition entities into buckets, e.g. the body an entity
/// currently orbits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupKey(Arc<str>);

impl GroupKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        GroupKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey::new(value)
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        GroupKey::new(value)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
