//! Input discovery: a single document or a directory of documents.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::defs::PackageDef;
use super::error::SchemaError;
use super::parse::parse_package;
use super::raw::RawPackage;
use crate::base::constants::{ROOT_PACKAGE_NAME, SCHEMA_EXTENSION};

/// Load a file or directory and wrap the result in the synthetic root.
///
/// Every input document becomes a direct sub-package of the root, in
/// lexicographic path order.
pub fn load_path(path: &Path) -> Result<PackageDef, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::NotFound(path.to_path_buf()));
    }

    let files = if path.is_dir() {
        collect_schema_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut root = PackageDef::new(ROOT_PACKAGE_NAME, "");
    for file in &files {
        root.packages.push(load_file(file)?);
    }
    debug!(files = files.len(), "loaded schema documents");
    Ok(root)
}

/// Parse a single schema document from disk.
pub fn load_file(path: &Path) -> Result<PackageDef, SchemaError> {
    debug!(path = %path.display(), "reading schema document");
    let text = fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    let raw: RawPackage = serde_json::from_str(&text).map_err(|source| SchemaError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    parse_package(&raw)
}

/// Every `*.json` file below `dir`, sorted by path.
pub fn collect_schema_files(dir: &Path) -> Result<Vec<PathBuf>, SchemaError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| SchemaError::Walk {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let is_schema = entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(SCHEMA_EXTENSION);
        if is_schema {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
