//! The definition tree produced by the parser.
//!
//! ```text
//! PackageDef
//! ├── packages: Vec<PackageDef>   (exclusive ownership)
//! ├── classes:  Vec<ClassDef>
//! │   └── properties: Vec<PropertyDef> ──ref──▶ TypeRef (class / enum / primitive)
//! └── enums:    Vec<EnumDef>
//!     └── literals: Vec<LiteralDef>
//! ```
//!
//! Everything is immutable after parsing except the `promise_id` and
//! `binding` fields, which the resolver fills in.

use crate::base::PromiseId;
use crate::base::constants::{KIND_ASSOCIATION, KIND_COMPOSITION, UNBOUNDED};
use std::fmt;

// ============================================================================
// RANGE
// ============================================================================

/// An ordered `(min, max)` pair of textual bounds.
///
/// Bounds stay text so the exact input formatting survives into the model;
/// `max` may be the wildcard `*`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub min: String,
    pub max: String,
}

impl Range {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// The `1..1` default cardinality.
    pub fn exactly_one() -> Self {
        Self::new("1", "1")
    }

    pub fn is_unbounded(&self) -> bool {
        self.max == UNBOUNDED
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

// ============================================================================
// TYPE REFERENCES
// ============================================================================

/// A qualified reference `parent.name` to a class or enum, where `parent`
/// is the prefix of the owning package.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub parent: String,
    pub name: String,
}

impl TypeName {
    pub fn new(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
        }
    }

    /// Split an already-qualified `parent.Name`, or qualify a bare name
    /// with the prefix of the package the reference appears in.
    pub fn resolve(raw: &str, current_prefix: &str) -> Self {
        match raw.split_once('.') {
            Some((parent, name)) => Self::new(parent, name),
            None => Self::new(current_prefix, raw),
        }
    }

    pub fn promise_id(&self) -> PromiseId {
        PromiseId::qualified(&self.parent, &self.name)
    }
}

/// What a property is typed by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    /// A primitive datatype referenced by name (`dataType`).
    Primitive(String),
    /// A class (`reference` or `composition`).
    Class(TypeName),
    /// An enumeration (`enumType`).
    Enum(TypeName),
}

impl TypeRef {
    /// The promise id this reference points at.
    pub fn promise_id(&self) -> PromiseId {
        match self {
            Self::Primitive(name) => PromiseId::datatype(name),
            Self::Class(t) | Self::Enum(t) => t.promise_id(),
        }
    }

    /// The unqualified type name.
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(name) => name,
            Self::Class(t) | Self::Enum(t) => &t.name,
        }
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Primitive(_))
    }
}

/// Ownership semantics of a typed property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// Non-owning (`reference`).
    Association,
    /// Owning (`composition`, and every non-class type).
    #[default]
    Composition,
}

impl AssociationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Association => KIND_ASSOCIATION,
            Self::Composition => KIND_COMPOSITION,
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a property's type reference was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    /// The referenced class/enum is declared somewhere in the tree.
    Declared,
    /// Nothing declares it; a primitive datatype is synthesized instead.
    Implicit,
}

// ============================================================================
// DEFINITIONS
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackageDef {
    pub name: String,
    pub description: String,
    /// Namespace token for promise ids (the package name when the input
    /// has none).
    pub prefix: String,
    pub packages: Vec<PackageDef>,
    pub classes: Vec<ClassDef>,
    pub enums: Vec<EnumDef>,
}

impl PackageDef {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.classes.is_empty() && self.enums.is_empty()
    }

    /// Pre-order iterator over this package and all nested packages.
    pub fn iter_packages(&self) -> impl Iterator<Item = &PackageDef> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.packages.iter().rev());
            Some(next)
        })
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn package(&self, name: &str) -> Option<&PackageDef> {
        self.packages.iter().find(|p| p.name == name)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub description: String,
    pub properties: Vec<PropertyDef>,
    pub promise_id: Option<PromiseId>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The resolved promise id, or `prefix.Name` before resolution.
    pub fn promise_id_in(&self, prefix: &str) -> PromiseId {
        self.promise_id
            .clone()
            .unwrap_or_else(|| PromiseId::qualified(prefix, &self.name))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub description: String,
    pub literals: Vec<LiteralDef>,
    pub promise_id: Option<PromiseId>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn promise_id_in(&self, prefix: &str) -> PromiseId {
        self.promise_id
            .clone()
            .unwrap_or_else(|| PromiseId::qualified(prefix, &self.name))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LiteralDef {
    pub name: String,
    pub description: String,
    /// Integer value kept as text.
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub description: String,
    pub ty: TypeRef,
    pub kind: AssociationKind,
    pub cardinality: Range,
    pub value_range: Option<Range>,
    pub promise_id: Option<PromiseId>,
    pub binding: Option<Binding>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            ty,
            kind: AssociationKind::Composition,
            cardinality: Range::exactly_one(),
            value_range: None,
            promise_id: None,
            binding: None,
        }
    }

    /// Whether the property is modeled with a separate association object
    /// (class-typed `reference` / `composition` attributes).
    pub fn needs_association(&self) -> bool {
        matches!(self.ty, TypeRef::Class(_))
    }
}
