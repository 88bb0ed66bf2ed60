use std::fmt;

use crate::base::PromiseId;

/// Kind of a synthesized primitive datatype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatatypeKind {
    String,
    Boolean,
    Numeric,
}

impl DatatypeKind {
    /// Classify a type name by substring: `char`/`str` first, then
    /// `bool`/`byte`, numeric otherwise.
    pub fn classify(name: &str) -> Self {
        if name.contains("char") || name.contains("str") {
            Self::String
        } else if name.contains("bool") || name.contains("byte") {
            Self::Boolean
        } else {
            Self::Numeric
        }
    }

    /// Metatype name in the target model.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "StringType",
            Self::Boolean => "BooleanType",
            Self::Numeric => "NumericType",
        }
    }
}

impl fmt::Display for DatatypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A datatype referenced by some property but declared nowhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplicitDatatype {
    pub promise_id: PromiseId,
    pub name: String,
    pub kind: DatatypeKind,
}

impl ImplicitDatatype {
    pub fn from_promise(promise_id: &PromiseId) -> Self {
        let name = promise_id.local_name().to_string();
        Self {
            kind: DatatypeKind::classify(&name),
            promise_id: promise_id.clone(),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("isValid_bool", DatatypeKind::Boolean)]
    #[case("label_str", DatatypeKind::String)]
    #[case("count_u16", DatatypeKind::Numeric)]
    #[case("string", DatatypeKind::String)]
    #[case("byte", DatatypeKind::Boolean)]
    #[case("char_bool", DatatypeKind::String)]
    #[case("float64", DatatypeKind::Numeric)]
    fn test_classify(#[case] name: &str, #[case] expected: DatatypeKind) {
        assert_eq!(DatatypeKind::classify(name), expected);
    }

    #[test]
    fn test_implicit_name_drops_namespace() {
        let dt = ImplicitDatatype::from_promise(&PromiseId::datatype("uint8"));
        assert_eq!(dt.name, "uint8");
        assert_eq!(dt.kind.type_name(), "NumericType");
    }
}
