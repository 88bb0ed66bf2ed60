//! Error types for change-set encoding and application.

use thiserror::Error;

use crate::base::PromiseId;
use crate::model::{ElementId, ModelError};

#[derive(Debug, Error)]
pub enum ChangeSetError {
    /// YAML parsing or serialization error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Well-formed YAML that is not a change-set.
    #[error("invalid change-set: {0}")]
    Invalid(String),

    /// A `sync` key that names no collection.
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    /// A top-level instruction without `parent`.
    #[error("top-level instruction {index} has no parent")]
    MissingParent { index: usize },

    /// `parent` points at an element that does not exist.
    #[error("parent element '{0}' not found")]
    UnknownParent(ElementId),

    /// A promise nothing declares.
    #[error("promise '{0}' is never declared")]
    UnresolvedPromise(PromiseId),

    /// A new element whose type cannot be determined.
    #[error("cannot create element in '{collection}' without a _type")]
    MissingType { collection: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ChangeSetError {
    pub fn yaml(message: impl Into<String>) -> Self {
        Self::Yaml(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
