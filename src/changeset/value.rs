use indexmap::IndexMap;

use crate::base::PromiseId;
use crate::base::constants::LITERAL_NUMERIC_VALUE;
use crate::model::ElementId;

/// Ordered attribute map of an instruction (`find` / `set`).
pub type Attributes = IndexMap<String, Value>;

/// A value in a change-set instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Integer(i64),
    /// An element known only by its promise id (`!Promise`).
    Promise(PromiseId),
    /// An existing element (`!UUIDReference`).
    Reference(ElementId),
    /// A value object created in place (`!NewObject`).
    NewObject {
        type_name: String,
        attributes: Attributes,
    },
    List(Vec<Value>),
}

impl Value {
    /// A `LiteralNumericValue` holding `value`.
    pub fn numeric_literal(value: impl Into<String>) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("value".into(), Value::Text(value.into()));
        Self::NewObject {
            type_name: LITERAL_NUMERIC_VALUE.into(),
            attributes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Promise ids this value depends on.
    pub fn promises(&self) -> Vec<&PromiseId> {
        match self {
            Self::Promise(id) => vec![id],
            Self::List(items) => items.iter().flat_map(Self::promises).collect(),
            Self::NewObject { attributes, .. } => {
                attributes.values().flat_map(Self::promises).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<PromiseId> for Value {
    fn from(id: PromiseId) -> Self {
        Self::Promise(id)
    }
}
