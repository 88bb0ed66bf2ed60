//! Error types for direct reconciliation.

use thiserror::Error;

use crate::model::{ElementId, ModelError};

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The `abort` policy met an existing element.
    #[error("{kind} '{name}' already exists, aborting")]
    Aborted { kind: &'static str, name: String },

    /// Input ended while waiting for an answer.
    #[error("no answer to overwrite prompt (end of input)")]
    PromptClosed,

    /// Reading the answer or writing the prompt failed.
    #[error("prompt I/O error: {0}")]
    Prompt(#[source] std::io::Error),

    /// A policy name that is not skip, replace, abort or ask.
    #[error("unknown conflict policy '{0}', expected skip, replace, abort or ask")]
    UnknownPolicy(String),

    /// An element handled in the object pass cannot be found again.
    #[error("{kind} '{name}' not found below '{parent}'")]
    Missing {
        kind: &'static str,
        name: String,
        parent: ElementId,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ReconcileError {
    pub fn aborted(kind: &'static str, name: impl Into<String>) -> Self {
        Self::Aborted {
            kind,
            name: name.into(),
        }
    }

    pub fn missing(kind: &'static str, name: &str, parent: &ElementId) -> Self {
        Self::Missing {
            kind,
            name: name.to_string(),
            parent: parent.clone(),
        }
    }
}
