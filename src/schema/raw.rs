//! Serde shape of the JSON schema documents.
//!
//! These types mirror the input format one-to-one. They carry no
//! normalization: multiplicities, ranges and type keys are validated and
//! resolved when converting into the definition tree (see
//! [`parse`](super::parse)). The same shape is written back by the exporter.
//!
//! ```json
//! {
//!   "name": "SamplePackage",
//!   "prefix": "smp",
//!   "info": "Sample package",
//!   "structs": [{
//!     "name": "Pet",
//!     "attrs": [{ "name": "type", "enumType": "PetType", "multiplicity": "1" }]
//!   }],
//!   "enums": [{ "name": "PetType", "enumLiterals": [{ "name": "CAT", "intId": 0 }] }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A package document (also used for nested `subPackages`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPackage {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub see: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_packages: Vec<RawPackage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structs: Vec<RawStruct>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<RawEnum>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStruct {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub see: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<RawAttr>,
}

/// A struct attribute. Exactly one of the four type keys must be set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttr {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub see: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnum {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub see: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_literals: Vec<RawLiteral>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLiteral {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub see: String,
    pub int_id: i64,
}

/// Free-form annotation value (`exp` is written as a number in most
/// documents, but text is accepted too).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}
