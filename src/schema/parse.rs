//! Conversion from the raw serde shape into the definition tree.

use super::defs::{
    AssociationKind, ClassDef, EnumDef, LiteralDef, PackageDef, PropertyDef, TypeName, TypeRef,
};
use super::description::{Annotations, render_description};
use super::error::SchemaError;
use super::range::{parse_multiplicity, parse_value_range};
use super::raw::{RawAttr, RawEnum, RawLiteral, RawPackage, RawStruct};

/// Parse one JSON document into a package definition.
pub fn parse_document(text: &str) -> Result<PackageDef, SchemaError> {
    let raw: RawPackage = serde_json::from_str(text)?;
    parse_package(&raw)
}

/// Convert a raw package (and everything below it) into a definition.
pub fn parse_package(raw: &RawPackage) -> Result<PackageDef, SchemaError> {
    let prefix = match raw.prefix.as_deref() {
        Some("") => {
            return Err(SchemaError::EmptyPrefix {
                package: raw.name.clone(),
            });
        }
        Some(prefix) => prefix,
        None => raw.name.as_str(),
    };

    let mut package = PackageDef::new(&raw.name, prefix);
    package.description = plain_description(&raw.info, &raw.see);
    package.classes = raw
        .structs
        .iter()
        .map(|s| parse_struct(s, prefix))
        .collect::<Result<_, _>>()?;
    package.enums = raw.enums.iter().map(parse_enum).collect();
    package.packages = raw
        .sub_packages
        .iter()
        .map(parse_package)
        .collect::<Result<_, _>>()?;
    Ok(package)
}

fn parse_struct(raw: &RawStruct, prefix: &str) -> Result<ClassDef, SchemaError> {
    let mut class = ClassDef::new(&raw.name);
    class.description = plain_description(&raw.info, &raw.see);
    class.properties = raw
        .attrs
        .iter()
        .map(|attr| parse_attr(attr, &raw.name, prefix))
        .collect::<Result<_, _>>()?;
    Ok(class)
}

fn parse_attr(raw: &RawAttr, struct_name: &str, prefix: &str) -> Result<PropertyDef, SchemaError> {
    let location = format!("struct '{struct_name}', attribute '{}'", raw.name);
    let (ty, kind) = attr_type(raw, prefix, &location)?;

    let exp = raw.exp.as_ref().map(ToString::to_string);
    let mut property = PropertyDef::new(&raw.name, ty);
    property.kind = kind;
    property.description = render_description(
        &raw.info,
        Annotations {
            see: &raw.see,
            exp: exp.as_deref(),
            unit: raw.unit.as_deref(),
        },
    );
    property.cardinality = parse_multiplicity(raw.multiplicity.as_deref(), &location)?;
    property.value_range = parse_value_range(raw.range.as_deref(), &location)?;
    Ok(property)
}

/// Pick the single type key of an attribute.
fn attr_type(
    raw: &RawAttr,
    prefix: &str,
    location: &str,
) -> Result<(TypeRef, AssociationKind), SchemaError> {
    let keys = [
        ("dataType", raw.data_type.as_deref()),
        ("reference", raw.reference.as_deref()),
        ("composition", raw.composition.as_deref()),
        ("enumType", raw.enum_type.as_deref()),
    ];
    let present: Vec<_> = keys
        .iter()
        .filter_map(|(key, value)| value.map(|v| (*key, v)))
        .collect();

    match present.as_slice() {
        [] => Err(SchemaError::MissingType {
            location: location.to_string(),
        }),
        [(key, name)] => Ok(match *key {
            "dataType" => (TypeRef::Primitive(name.to_string()), AssociationKind::Composition),
            "reference" => (
                TypeRef::Class(TypeName::resolve(name, prefix)),
                AssociationKind::Association,
            ),
            "composition" => (
                TypeRef::Class(TypeName::resolve(name, prefix)),
                AssociationKind::Composition,
            ),
            _ => (
                TypeRef::Enum(TypeName::resolve(name, prefix)),
                AssociationKind::Composition,
            ),
        }),
        several => Err(SchemaError::AmbiguousType {
            location: location.to_string(),
            keys: several
                .iter()
                .map(|(key, _)| *key)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

fn parse_enum(raw: &RawEnum) -> EnumDef {
    let mut enumeration = EnumDef::new(&raw.name);
    enumeration.description = plain_description(&raw.info, &raw.see);
    enumeration.literals = raw.enum_literals.iter().map(parse_literal).collect();
    enumeration
}

fn parse_literal(raw: &RawLiteral) -> LiteralDef {
    LiteralDef {
        name: raw.name.clone(),
        description: plain_description(&raw.info, &raw.see),
        value: raw.int_id.to_string(),
    }
}

fn plain_description(info: &str, see: &str) -> String {
    render_description(
        info,
        Annotations {
            see,
            ..Annotations::default()
        },
    )
}
