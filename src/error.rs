//! Crate-level error aggregating every stage.

use std::path::PathBuf;

use thiserror::Error;

use crate::changeset::ChangeSetError;
use crate::export::ExportError;
use crate::model::ModelError;
use crate::reconcile::ReconcileError;
use crate::schema::SchemaError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    ChangeSet(#[from] ChangeSetError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// Reading a change-set or writing an output file failed.
    #[error("cannot access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the run stopped because the `abort` policy met a conflict.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Reconcile(ReconcileError::Aborted { .. }))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
