use serde::Serialize;
use tracing::warn;

use super::error::ExportError;
use crate::base::constants::UNBOUNDED;
use crate::model::{Collection, Element, ElementId, ElementKind, Model, PropertyValue};
use crate::schema::{RawAttr, RawEnum, RawLiteral, RawPackage, RawStruct};

/// Every data package in the model, in model order.
pub fn list_packages(model: &Model) -> Vec<&Element> {
    model.find_by_kind(ElementKind::DataPkg).collect()
}

/// Look a package up by element id, then by name.
///
/// A name must match exactly one package.
pub fn find_package<'m>(model: &'m Model, query: &str) -> Result<&'m Element, ExportError> {
    if let Some(element) = model.get(&ElementId::new(query)) {
        if element.kind != ElementKind::DataPkg {
            return Err(ExportError::NotAPackage {
                id: element.id.clone(),
                kind: element.kind,
            });
        }
        return Ok(element);
    }

    let matches: Vec<_> = list_packages(model)
        .into_iter()
        .filter(|p| p.name() == Some(query))
        .collect();
    match matches.as_slice() {
        [] => Err(ExportError::NotFound(query.to_string())),
        [single] => Ok(*single),
        several => Err(ExportError::Ambiguous {
            name: query.to_string(),
            candidates: several
                .iter()
                .map(|p| match p.owner.as_ref().and_then(|o| model.get(o)) {
                    Some(owner) => format!("  '{}' in {}", p.id, owner.short_repr()),
                    None => format!("  '{}' (orphaned)", p.id),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }),
    }
}

/// Convert a package subtree back into the schema document shape.
///
/// The package id becomes the prefix. Attribute types are always written
/// as `dataType`.
pub fn export_package(model: &Model, package: &Element) -> RawPackage {
    RawPackage {
        name: package.name().unwrap_or_default().to_string(),
        info: package.description.clone(),
        prefix: Some(package.id.to_string()),
        sub_packages: model
            .children(&package.id, Collection::Packages)
            .map(|p| export_package(model, p))
            .collect(),
        structs: model
            .children(&package.id, Collection::Classes)
            .map(|c| export_class(model, c))
            .collect(),
        enums: model
            .children(&package.id, Collection::Enumerations)
            .map(|e| export_enum(model, e))
            .collect(),
        ..RawPackage::default()
    }
}

fn export_class(model: &Model, class: &Element) -> RawStruct {
    RawStruct {
        name: class.name().unwrap_or_default().to_string(),
        info: class.description.clone(),
        attrs: model
            .children(&class.id, Collection::Properties)
            .map(|p| export_attr(model, p))
            .collect(),
        ..RawStruct::default()
    }
}

fn export_attr(model: &Model, property: &Element) -> RawAttr {
    let type_name = property
        .property("type")
        .and_then(PropertyValue::as_reference)
        .and_then(|id| model.get(id))
        .and_then(Element::name);
    let type_name = match type_name {
        Some(name) => name.to_string(),
        None => {
            warn!("No type set, falling back to 'string' for {}", property.short_repr());
            "string".to_string()
        }
    };

    RawAttr {
        name: property.name().unwrap_or_default().to_string(),
        info: property.description.clone(),
        data_type: Some(type_name),
        multiplicity: Some(compact_multiplicity(property)),
        ..RawAttr::default()
    }
}

/// `N` when both bounds agree, `*` for `0..*`, `MIN..MAX` otherwise.
///
/// A missing or non-numeric bound counts as `0` (min) or unbounded (max).
fn compact_multiplicity(property: &Element) -> String {
    let bound = |key: &str| -> Option<u64> {
        let text = property.property(key)?.as_literal()?;
        if text == UNBOUNDED {
            return None;
        }
        match text.parse() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!(
                    "Cannot convert {key} value '{text}' of {} to int, ignoring",
                    property.short_repr()
                );
                None
            }
        }
    };
    let min = bound("min_card").unwrap_or(0);
    let max = bound("max_card");

    match max {
        None if min == 0 => UNBOUNDED.to_string(),
        Some(max) if max == min => max.to_string(),
        Some(max) => format!("{min}..{max}"),
        None => format!("{min}..{UNBOUNDED}"),
    }
}

fn export_enum(model: &Model, enumeration: &Element) -> RawEnum {
    RawEnum {
        name: enumeration.name().unwrap_or_default().to_string(),
        info: enumeration.description.clone(),
        enum_literals: model
            .children(&enumeration.id, Collection::Literals)
            .enumerate()
            .map(|(index, literal)| RawLiteral {
                name: literal.name().unwrap_or_default().to_string(),
                info: literal.description.clone(),
                int_id: literal
                    .property("value")
                    .and_then(PropertyValue::as_literal)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(index as i64),
                ..RawLiteral::default()
            })
            .collect(),
        ..RawEnum::default()
    }
}

/// Render `package` as JSON; `None` writes it on a single line.
pub fn to_json(package: &RawPackage, indent: Option<usize>) -> Result<String, ExportError> {
    let Some(width) = indent else {
        return Ok(serde_json::to_string(package)?);
    };
    let indent = " ".repeat(width);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    package.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
