use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::DATATYPE_NAMESPACE;

/// Symbolic name of a target element, declared before or after it exists.
///
/// Promise ids are dotted strings: `prefix.Name` for classes and enums,
/// `prefix.Name.Property` for properties and `datatype.Name` for primitive
/// types. They are the join key between the definition tree and the target
/// model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromiseId(String);

impl PromiseId {
    /// Wrap an already-formatted promise id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `prefix.name`
    pub fn qualified(prefix: &str, name: &str) -> Self {
        Self(format!("{prefix}.{name}"))
    }

    /// `datatype.name`
    pub fn datatype(name: &str) -> Self {
        Self::qualified(DATATYPE_NAMESPACE, name)
    }

    /// Promise id of a member (property) of this element.
    pub fn member(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything after the first `.`; the whole id when there is none.
    pub fn local_name(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(_, rest)| rest)
    }
}

impl fmt::Display for PromiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromiseId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PromiseId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
