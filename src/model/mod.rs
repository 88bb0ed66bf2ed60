//! In-memory target model with file persistence.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐
//! │  model.json  │     │  model.yaml  │
//! └──────┬───────┘     └──────┬───────┘
//!        ▼                    ▼
//! ┌──────────────────────────────────────────────┐
//! │              ModelFormat trait               │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │  ModelHost (Model + ChangeTracker + path)    │
//! │  implements ModelAdapter                     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Each layer (`oa`, `sa`, `la`, `pa`) has a root `DataPkg`. Packages own
//! `packages`, `classes`, `datatypes` (enumerations and primitive types)
//! and `owned_associations`; classes own `properties`; enumerations own
//! `literals`; associations own `members`.

mod adapter;
mod anchor;
pub mod editing;
mod element;
mod error;
mod format;
pub mod host;
#[allow(clippy::module_inception)]
mod model;

pub use adapter::ModelAdapter;
pub use anchor::{Anchors, DatatypesAnchor};
pub use editing::ChangeTracker;
pub use element::{Collection, Element, ElementId, ElementKind, PropertyValue};
pub use error::ModelError;
pub use format::{JsonFormat, ModelFormat, YamlFormat, detect_format, supported_extensions};
pub use host::ModelHost;
pub use model::{LAYER_PACKAGE_NAME, Model, ModelMetadata};
