//! Domain constants shared between the converter stages.

/// Name of the synthetic package that holds every input document.
pub const ROOT_PACKAGE_NAME: &str = "JSON root package";

/// Name of the package that collects synthesized primitive datatypes.
pub const DATA_TYPES_PACKAGE: &str = "Data Types";

/// Promise namespace used for primitive `dataType` references.
pub const DATATYPE_NAMESPACE: &str = "datatype";

/// Metatype used for cardinality, value-range and literal values.
pub const LITERAL_NUMERIC_VALUE: &str = "LiteralNumericValue";

/// Wildcard upper bound of an unbounded range.
pub const UNBOUNDED: &str = "*";

/// Property kind of a non-owning typed relationship.
pub const KIND_ASSOCIATION: &str = "ASSOCIATION";

/// Property kind of an owning typed relationship.
pub const KIND_COMPOSITION: &str = "COMPOSITION";

/// Extension of schema documents picked up when scanning a directory.
pub const SCHEMA_EXTENSION: &str = "json";

/// Layers every freshly initialized model carries.
pub const STANDARD_LAYERS: &[&str] = &["oa", "sa", "la", "pa"];

/// Layer whose data package receives synthesized datatypes by default.
pub const DEFAULT_TYPES_LAYER: &str = "sa";
