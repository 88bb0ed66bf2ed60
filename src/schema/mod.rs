//! JSON schema input: serde shape, parsing and normalization.
//!
//! ```text
//! *.json ──serde──▶ RawPackage ──parse_package──▶ PackageDef
//!                       ▲                              │
//!                       └──────── export ◀─────────────┘ (via the model)
//! ```
//!
//! [`load_path`] is the usual entry point: it accepts a file or a
//! directory and always returns the synthetic root package.

mod defs;
mod description;
mod error;
mod loader;
mod parse;
mod range;
mod raw;

#[cfg(test)]
mod tests;

pub use defs::{
    AssociationKind, Binding, ClassDef, EnumDef, LiteralDef, PackageDef, PropertyDef, Range,
    TypeName, TypeRef,
};
pub use description::{Annotations, render_description};
pub use error::SchemaError;
pub use loader::{collect_schema_files, load_file, load_path};
pub use parse::{parse_document, parse_package};
pub use range::{parse_multiplicity, parse_value_range};
pub use raw::{Annotation, RawAttr, RawEnum, RawLiteral, RawPackage, RawStruct};
