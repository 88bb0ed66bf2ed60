//! Error types for exporting model packages.

use thiserror::Error;

use crate::model::{ElementId, ElementKind};

#[derive(Debug, Error)]
pub enum ExportError {
    /// No package has the given id or name.
    #[error("no data package with id or name '{0}'")]
    NotFound(String),

    /// Several packages share the given name.
    #[error("more than one data package named '{name}':\n{candidates}")]
    Ambiguous { name: String, candidates: String },

    /// The id names an element that is not a package.
    #[error("expected a DataPkg at id '{id}', found a {kind}")]
    NotAPackage { id: ElementId, kind: ElementKind },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
