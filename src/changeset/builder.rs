//! Change-set generation from a resolved definition tree.
//!
//! The first instruction addresses the root anchor and mirrors the input
//! tree; a second one (only when implicit datatypes remain) addresses the
//! datatypes anchor:
//!
//! ```yaml
//! - parent: !UUIDReference <root>
//!   sync:
//!     packages:
//!       - find: { name: SamplePackage }
//!         set: { description: ... }
//!         sync:
//!           classes: [...]
//!           enumerations: [...]
//!           packages: [...]
//!           owned_associations: [...]
//! - parent: !UUIDReference <types parent>
//!   sync:
//!     packages:
//!       - find: { name: Data Types }
//!         sync:
//!           datatypes:
//!             - promise_id: datatype.string
//!               find: { name: string, _type: StringType }
//! ```

use tracing::debug;

use super::instruction::{ChangeSet, Instruction};
use super::value::Value;
use crate::base::PromiseId;
use crate::base::constants::{DATA_TYPES_PACKAGE, KIND_ASSOCIATION};
use crate::model::{Anchors, Collection, DatatypesAnchor, ElementKind};
use crate::resolve::{ImplicitDatatype, ResolvedTree};
use crate::schema::{ClassDef, EnumDef, PackageDef, PropertyDef};

/// Build the change-set for `tree` against the given anchors.
pub fn build_changeset(tree: &ResolvedTree, anchors: &Anchors) -> ChangeSet {
    let root = merge(Instruction::at(anchors.root.clone()), convert_package(&tree.root));
    let mut instructions = vec![root];

    let implicit = tree.implicit_datatypes();
    if !implicit.is_empty() {
        debug!(count = implicit.len(), "adding implicit datatypes");
        let datatypes = implicit.iter().map(convert_datatype).collect();
        let trailing = match &anchors.datatypes {
            DatatypesAnchor::Container(id) => {
                Instruction::at(id.clone()).with_sync(Collection::Datatypes, datatypes)
            }
            DatatypesAnchor::Parent(id) => Instruction::at(id.clone()).with_sync(
                Collection::Packages,
                vec![
                    Instruction::find_by_name(DATA_TYPES_PACKAGE)
                        .with_sync(Collection::Datatypes, datatypes),
                ],
            ),
        };
        instructions.push(trailing);
    }

    ChangeSet::new(instructions)
}

/// Keep the addressing (`parent`, `find`) of `head`, take the rest from
/// `body`.
fn merge(head: Instruction, body: Instruction) -> Instruction {
    Instruction {
        parent: head.parent,
        promise_id: body.promise_id.or(head.promise_id),
        find: head.find,
        set: body.set,
        sync: body.sync,
    }
}

fn convert_package(package: &PackageDef) -> Instruction {
    let mut classes = Vec::new();
    let mut associations = Vec::new();
    for class in &package.classes {
        let (instruction, class_associations) = convert_class(&package.prefix, class);
        classes.push(instruction);
        associations.extend(class_associations);
    }
    let enums = package
        .enums
        .iter()
        .map(|e| convert_enum(&package.prefix, e))
        .collect();
    let packages = package
        .packages
        .iter()
        .map(|sub| merge(Instruction::find_by_name(&sub.name), convert_package(sub)))
        .collect();

    let mut instruction = Instruction::default();
    if !package.description.is_empty() {
        instruction = instruction.with_set("description", package.description.as_str());
    }
    instruction
        .with_sync(Collection::Classes, classes)
        .with_sync(Collection::Enumerations, enums)
        .with_sync(Collection::Packages, packages)
        .with_sync(Collection::OwnedAssociations, associations)
}

fn convert_class(prefix: &str, class: &ClassDef) -> (Instruction, Vec<Instruction>) {
    let class_id = class.promise_id_in(prefix);
    let mut properties = Vec::new();
    let mut associations = Vec::new();

    for property in &class.properties {
        let property_id = property
            .promise_id
            .clone()
            .unwrap_or_else(|| class_id.member(&property.name));
        if property.needs_association() {
            associations.push(convert_association(&class_id, &property_id));
        }
        properties.push(convert_property(property, property_id));
    }

    let instruction = Instruction::find_by_name(&class.name)
        .with_promise(class_id)
        .with_set("description", class.description.as_str())
        .with_sync(Collection::Properties, properties);
    (instruction, associations)
}

fn convert_property(property: &PropertyDef, promise_id: PromiseId) -> Instruction {
    let mut instruction = Instruction::find_by_name(&property.name)
        .with_promise(promise_id)
        .with_set("description", property.description.as_str())
        .with_set("kind", property.kind.as_str())
        .with_set("type", property.ty.promise_id());
    if let Some(range) = &property.value_range {
        instruction = instruction
            .with_set("min_value", Value::numeric_literal(&range.min))
            .with_set("max_value", Value::numeric_literal(&range.max));
    }
    instruction
        .with_set("min_card", Value::numeric_literal(&property.cardinality.min))
        .with_set("max_card", Value::numeric_literal(&property.cardinality.max))
}

/// Association binding the owning class (fixed 1..1, not navigable) to
/// the property, which is its only navigable member.
fn convert_association(class_id: &PromiseId, property_id: &PromiseId) -> Instruction {
    let member = Instruction::default()
        .with_find("type", class_id.clone())
        .with_set("_type", ElementKind::Property.as_str())
        .with_set("kind", KIND_ASSOCIATION)
        .with_set("min_card", Value::numeric_literal("1"))
        .with_set("max_card", Value::numeric_literal("1"));

    Instruction::default()
        .with_find(
            "navigable_members",
            Value::List(vec![Value::Promise(property_id.clone())]),
        )
        .with_sync(Collection::Members, vec![member])
}

fn convert_enum(prefix: &str, enumeration: &EnumDef) -> Instruction {
    let literals = enumeration
        .literals
        .iter()
        .map(|literal| {
            Instruction::find_by_name(&literal.name)
                .with_set("description", literal.description.as_str())
                .with_set("value", Value::numeric_literal(&literal.value))
        })
        .collect();

    Instruction::find_by_name(&enumeration.name)
        .with_promise(enumeration.promise_id_in(prefix))
        .with_set("description", enumeration.description.as_str())
        .with_sync(Collection::Literals, literals)
}

fn convert_datatype(datatype: &ImplicitDatatype) -> Instruction {
    Instruction::find_by_name(&datatype.name)
        .with_promise(datatype.promise_id.clone())
        .with_find("_type", datatype.kind.type_name())
}
