//! # json2model
//!
//! Converts JSON data-schema documents (packages of structs, enums and
//! typed attributes) into a target model, either as a declarative
//! change-set or by reconciling directly against a live model.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! import     → one conversion run (options, load, mode A / mode B)
//!   ↓
//! changeset  → change-set builder, YAML codec, declarative applier
//! reconcile  → direct reconciliation with conflict policies
//! export     → model package back to a schema document
//!   ↓
//! resolve    → promise namespace, implicit datatypes
//!   ↓
//! schema     → JSON shape, parsing, normalization, discovery
//! model      → in-memory target model, adapter trait, persistence
//!   ↓
//! base       → PromiseId, domain constants
//! ```

// ============================================================================
// MODULES (dependency order: base → schema/model → resolve → changeset/reconcile/export → import)
// ============================================================================

/// Foundation types: PromiseId, domain constants
pub mod base;

/// JSON schema input: serde shape, parsing, directory discovery
pub mod schema;

/// Target model: elements, adapter trait, file persistence
pub mod model;

/// Promise ids and implicit datatypes
pub mod resolve;

/// Change-sets: builder, YAML encoding, declarative apply
pub mod changeset;

/// Direct reconciliation with skip / replace / abort / ask
pub mod reconcile;

/// Model package to schema document
pub mod export;

/// Conversion runs tying the stages together
pub mod import;

mod error;

pub use base::PromiseId;
pub use error::{Error, Result};
pub use import::{ImportOptions, apply_file, generate_changeset, import_live, load_tree};
pub use model::{ModelAdapter, ModelHost};
pub use reconcile::Policy;
