//! Element identity, metatypes and attribute values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ModelError;

// ============================================================================
// IDs
// ============================================================================

/// Unique identifier of a model element (UUID v4 text).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// ELEMENT KINDS
// ============================================================================

/// Metatype of a model element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    DataPkg,
    Class,
    Enumeration,
    EnumerationLiteral,
    Property,
    Association,
    StringType,
    BooleanType,
    NumericType,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataPkg => "DataPkg",
            Self::Class => "Class",
            Self::Enumeration => "Enumeration",
            Self::EnumerationLiteral => "EnumerationLiteral",
            Self::Property => "Property",
            Self::Association => "Association",
            Self::StringType => "StringType",
            Self::BooleanType => "BooleanType",
            Self::NumericType => "NumericType",
        }
    }

    /// Whether elements of this kind can type a property.
    pub fn is_datatype(&self) -> bool {
        matches!(
            self,
            Self::Enumeration | Self::StringType | Self::BooleanType | Self::NumericType
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "DataPkg" => Self::DataPkg,
            "Class" => Self::Class,
            "Enumeration" => Self::Enumeration,
            "EnumerationLiteral" => Self::EnumerationLiteral,
            "Property" => Self::Property,
            "Association" => Self::Association,
            "StringType" => Self::StringType,
            "BooleanType" => Self::BooleanType,
            "NumericType" => Self::NumericType,
            other => return Err(ModelError::UnknownKind(other.to_string())),
        })
    }
}

// ============================================================================
// COLLECTIONS
// ============================================================================

/// A named child collection of an element.
///
/// Enumerations and primitive datatypes share the `datatypes` storage;
/// the `enumerations` collection is the enumeration-only view of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Packages,
    Classes,
    Enumerations,
    Datatypes,
    Properties,
    Literals,
    OwnedAssociations,
    Members,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Self::Packages,
        Self::Classes,
        Self::Enumerations,
        Self::Datatypes,
        Self::Properties,
        Self::Literals,
        Self::OwnedAssociations,
        Self::Members,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Packages => "packages",
            Self::Classes => "classes",
            Self::Enumerations => "enumerations",
            Self::Datatypes => "datatypes",
            Self::Properties => "properties",
            Self::Literals => "literals",
            Self::OwnedAssociations => "owned_associations",
            Self::Members => "members",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Key of the child list this collection is stored in.
    pub fn storage(&self) -> &'static str {
        match self {
            Self::Enumerations => Self::Datatypes.key(),
            other => other.key(),
        }
    }

    pub fn accepts(&self, kind: ElementKind) -> bool {
        match self {
            Self::Packages => kind == ElementKind::DataPkg,
            Self::Classes => kind == ElementKind::Class,
            Self::Enumerations => kind == ElementKind::Enumeration,
            Self::Datatypes => kind.is_datatype(),
            Self::Properties | Self::Members => kind == ElementKind::Property,
            Self::Literals => kind == ElementKind::EnumerationLiteral,
            Self::OwnedAssociations => kind == ElementKind::Association,
        }
    }

    /// Kind of a new element when the caller does not name one.
    /// `datatypes` has no default.
    pub fn default_kind(&self) -> Option<ElementKind> {
        match self {
            Self::Packages => Some(ElementKind::DataPkg),
            Self::Classes => Some(ElementKind::Class),
            Self::Enumerations => Some(ElementKind::Enumeration),
            Self::Datatypes => None,
            Self::Properties | Self::Members => Some(ElementKind::Property),
            Self::Literals => Some(ElementKind::EnumerationLiteral),
            Self::OwnedAssociations => Some(ElementKind::Association),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// VALUES
// ============================================================================

/// An attribute value stored on an element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    /// A `LiteralNumericValue`; the number stays text (`*` is allowed).
    Literal(String),
    Reference(ElementId),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn as_reference(&self) -> Option<&ElementId> {
        match self {
            Self::Reference(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Every element id this value points at.
    pub fn references(&self) -> Vec<&ElementId> {
        match self {
            Self::Reference(id) => vec![id],
            Self::List(items) => items.iter().flat_map(Self::references).collect(),
            _ => Vec::new(),
        }
    }

    /// Drop references to `id`. Returns `false` when the value itself
    /// is a reference to `id` and has to be removed entirely.
    pub fn retain_references(&mut self, id: &ElementId) -> bool {
        match self {
            Self::Reference(r) => r != id,
            Self::List(items) => {
                items.retain_mut(|item| item.retain_references(id));
                true
            }
            _ => true,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<ElementId> for PropertyValue {
    fn from(id: ElementId) -> Self {
        Self::Reference(id)
    }
}

// ============================================================================
// ELEMENT
// ============================================================================

/// A model element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The owning element (None for layer roots).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ElementId>,
    /// Owned children by storage key, in creation order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, Vec<ElementId>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, PropertyValue>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            description: String::new(),
            owner: None,
            children: IndexMap::new(),
            properties: IndexMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Children stored under `storage`, unfiltered.
    pub fn children_in(&self, storage: &str) -> &[ElementId] {
        self.children.get(storage).map_or(&[][..], Vec::as_slice)
    }

    /// Every owned child across all collections.
    pub fn all_children(&self) -> impl Iterator<Item = &ElementId> {
        self.children.values().flatten()
    }

    /// Short `Kind 'name' (id)` form for log messages.
    pub fn short_repr(&self) -> String {
        format!(
            "{} '{}' ({})",
            self.kind,
            self.name.as_deref().unwrap_or(""),
            self.id
        )
    }
}
