//! Error types for schema loading and parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make an input document unusable.
///
/// Every variant is fatal for the run: no partial output is produced for
/// a document that fails to parse.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The input path does not exist.
    #[error("input not found: {0}")]
    NotFound(PathBuf),

    /// Reading a file failed.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking an input directory failed.
    #[error("cannot scan '{path}': {message}")]
    Walk { path: PathBuf, message: String },

    /// A document is not valid JSON or does not have the schema shape.
    #[error("invalid schema document '{path}': {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// In-memory JSON text is not valid.
    #[error("invalid schema document: {0}")]
    Syntax(#[from] serde_json::Error),

    /// A `multiplicity` field does not match `N`, `*` or `MIN..MAX`.
    #[error("{location}: invalid multiplicity '{value}', expected N, * or MIN..MAX")]
    InvalidMultiplicity { location: String, value: String },

    /// A `range` field does not match `MIN..MAX`.
    #[error("{location}: invalid value range '{value}', expected MIN..MAX")]
    InvalidRange { location: String, value: String },

    /// An attribute has none of the type-indicating keys.
    #[error(
        "{location}: struct attributes need exactly one of dataType, reference, composition or enumType"
    )]
    MissingType { location: String },

    /// An attribute has more than one type-indicating key.
    #[error("{location}: conflicting type keys ({keys}), expected exactly one")]
    AmbiguousType { location: String, keys: String },

    /// A package declares `"prefix": ""`.
    #[error("package '{package}': prefix must not be empty")]
    EmptyPrefix { package: String },
}

impl SchemaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_multiplicity(location: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidMultiplicity {
            location: location.into(),
            value: value.into(),
        }
    }

    pub fn invalid_range(location: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidRange {
            location: location.into(),
            value: value.into(),
        }
    }
}
