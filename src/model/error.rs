//! Error types for target model operations.

use std::path::PathBuf;
use thiserror::Error;

use super::element::{Collection, ElementId, ElementKind};

#[derive(Debug, Error)]
pub enum ModelError {
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML parsing or serialization error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// IO error while reading or writing a model file.
    #[error("cannot access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model was never loaded from or saved to a file.
    #[error("model has no file path")]
    NoPath,

    /// File extension maps to no model format.
    #[error("unsupported model format: .{0}")]
    UnsupportedFormat(String),

    /// Reference to an element that is not in the model.
    #[error("no element with id '{0}'")]
    UnknownElement(ElementId),

    /// Neither a layer name nor an element id.
    #[error("'{0}' is neither a layer ({layers}) nor an element id", layers = crate::base::constants::STANDARD_LAYERS.join(", "))]
    UnknownAnchor(String),

    /// Metatype name not known to the model.
    #[error("unknown element type '{0}'")]
    UnknownKind(String),

    /// A collection cannot hold the requested kind.
    #[error("collection '{collection}' cannot hold {kind}")]
    InvalidChild {
        collection: Collection,
        kind: ElementKind,
    },
}

impl ModelError {
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    pub fn yaml(message: impl Into<String>) -> Self {
        Self::Yaml(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
