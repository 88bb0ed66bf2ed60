//! Declarative change-sets: generation, YAML encoding and application.
//!
//! ```text
//! ResolvedTree ──build_changeset──▶ ChangeSet ──yaml::dump──▶ *.yaml
//!                                       ▲                        │
//!                                       └──────yaml::load────────┘
//!                                       │
//!                                       └──apply_changeset──▶ ModelAdapter
//! ```

mod apply;
mod builder;
mod error;
mod instruction;
mod value;
pub mod yaml;

#[cfg(test)]
mod tests;

pub use apply::{ApplyReport, apply_changeset};
pub use builder::build_changeset;
pub use error::ChangeSetError;
pub use instruction::{ChangeSet, Instruction};
pub use value::{Attributes, Value};
