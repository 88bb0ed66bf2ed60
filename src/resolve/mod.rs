//! Reference resolution over the definition tree.
//!
//! Every class and enum receives a promise id `prefix.Name`, every
//! property `prefix.Class.Property`. Type references that nothing
//! declares become implicit datatypes.

mod datatype;
mod promise;
mod resolver;

pub use datatype::{DatatypeKind, ImplicitDatatype};
pub use promise::PromiseNamespace;
pub use resolver::{ResolvedTree, resolve};
