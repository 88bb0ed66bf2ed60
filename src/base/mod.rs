//! Foundation types for the json2model toolchain.
//!
//! This module provides fundamental types used throughout the converter:
//! - [`PromiseId`] - Symbolic identifiers joining definitions to model elements
//! - Domain constants (container names, promise namespaces, literal types)
//!
//! This module has NO dependencies on other json2model modules.

pub mod constants;
mod promise;

pub use promise::PromiseId;
