//! The reverse direction: a model package back to a schema document.
//!
//! ```text
//! Model ──find_package──▶ DataPkg ──export_package──▶ RawPackage ──to_json──▶ *.json
//! ```
//!
//! Only what the model keeps survives the trip: types become `dataType`
//! references by name and multiplicities are written compactly.

mod error;
mod package;

pub use error::ExportError;
pub use package::{export_package, find_package, list_packages, to_json};
