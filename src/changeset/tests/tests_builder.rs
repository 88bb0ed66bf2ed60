#![allow(clippy::unwrap_used)]

use crate::base::PromiseId;
use crate::base::constants::{DATA_TYPES_PACKAGE, ROOT_PACKAGE_NAME};
use crate::changeset::{ChangeSet, Instruction, Value, build_changeset};
use crate::model::{Anchors, Collection, DatatypesAnchor, ElementId};
use crate::resolve::resolve;
use crate::schema::{PackageDef, parse_document};

// ── Helpers ─────────────────────────────────────────────────────────

const PETS: &str = r#"{
    "name": "SamplePackage",
    "prefix": "smp",
    "info": "Sample package",
    "structs": [{
        "name": "Pet",
        "attrs": [
            { "name": "name", "dataType": "string" },
            { "name": "type", "enumType": "PetType" }
        ]
    }],
    "enums": [{
        "name": "PetType",
        "enumLiterals": [{ "name": "CAT", "intId": 0 }, { "name": "DOG", "intId": 1 }]
    }]
}"#;

fn anchors(datatypes: DatatypesAnchor) -> Anchors {
    Anchors {
        root: ElementId::new("root-id"),
        datatypes,
    }
}

fn build(docs: &[&str], datatypes: DatatypesAnchor) -> ChangeSet {
    let mut root = PackageDef::new(ROOT_PACKAGE_NAME, "");
    for doc in docs {
        root.packages.push(parse_document(doc).unwrap());
    }
    build_changeset(&resolve(root), &anchors(datatypes))
}

fn sync<'a>(instruction: &'a Instruction, collection: Collection) -> &'a [Instruction] {
    instruction.sync.get(&collection).map_or(&[][..], Vec::as_slice)
}

fn find_name(instruction: &Instruction) -> Option<&str> {
    instruction.find.get("name").and_then(Value::as_text)
}

// ============================================================================
// End-to-end shape
// ============================================================================

#[test]
fn test_pet_scenario_shape() {
    let cs = build(&[PETS], DatatypesAnchor::Parent(ElementId::new("types-parent")));
    assert_eq!(cs.instructions.len(), 2);

    let root = &cs.instructions[0];
    assert_eq!(root.parent, Some(ElementId::new("root-id")));
    assert!(root.set.is_empty());

    let packages = sync(root, Collection::Packages);
    assert_eq!(packages.len(), 1);
    let pkg = &packages[0];
    assert_eq!(find_name(pkg), Some("SamplePackage"));
    assert_eq!(pkg.set.get("description"), Some(&Value::from("Sample package")));
    assert!(pkg.sync.get(&Collection::OwnedAssociations).is_none());
    let keys: Vec<_> = pkg.sync.keys().map(|c| c.key()).collect();
    assert_eq!(keys, ["classes", "enumerations"]);

    let enums = sync(pkg, Collection::Enumerations);
    assert_eq!(enums[0].promise_id, Some(PromiseId::new("smp.PetType")));
    assert_eq!(sync(&enums[0], Collection::Literals).len(), 2);
    assert_eq!(
        sync(&enums[0], Collection::Literals)[1].set.get("value"),
        Some(&Value::numeric_literal("1"))
    );

    let classes = sync(pkg, Collection::Classes);
    let props = sync(&classes[0], Collection::Properties);
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].promise_id, Some(PromiseId::new("smp.Pet.name")));
    assert_eq!(
        props[0].set.get("type"),
        Some(&Value::Promise(PromiseId::new("datatype.string")))
    );
    assert_eq!(
        props[1].set.get("type"),
        Some(&Value::Promise(PromiseId::new("smp.PetType")))
    );
    assert_eq!(props[1].set.get("kind"), Some(&Value::from("COMPOSITION")));
    assert_eq!(props[1].set.get("min_card"), Some(&Value::numeric_literal("1")));
    assert!(props[1].set.get("min_value").is_none());

    let types = &cs.instructions[1];
    assert_eq!(types.parent, Some(ElementId::new("types-parent")));
    let container = &sync(types, Collection::Packages)[0];
    assert_eq!(find_name(container), Some(DATA_TYPES_PACKAGE));
    let datatypes = sync(container, Collection::Datatypes);
    assert_eq!(datatypes.len(), 1);
    assert_eq!(find_name(&datatypes[0]), Some("string"));
    assert_eq!(datatypes[0].find.get("_type"), Some(&Value::from("StringType")));
}

#[test]
fn test_explicit_datatypes_container() {
    let cs = build(&[PETS], DatatypesAnchor::Container(ElementId::new("types")));
    let types = &cs.instructions[1];
    assert_eq!(types.parent, Some(ElementId::new("types")));
    assert_eq!(sync(types, Collection::Datatypes).len(), 1);
    assert!(types.sync.get(&Collection::Packages).is_none());
}

#[test]
fn test_no_trailing_instruction_without_implicit_types() {
    let cs = build(
        &[r#"{ "name": "P", "structs": [{ "name": "A" }] }"#],
        DatatypesAnchor::Parent(ElementId::new("x")),
    );
    assert_eq!(cs.instructions.len(), 1);
}

// ============================================================================
// Associations
// ============================================================================

#[test]
fn test_reference_creates_association_in_owning_package() {
    let cs = build(
        &[
            r#"{ "name": "Owners", "prefix": "o",
                 "structs": [{ "name": "Owner", "attrs": [
                     { "name": "pet", "reference": "p.Pet", "multiplicity": "0..*" }
                 ]}] }"#,
            r#"{ "name": "Pets", "prefix": "p", "structs": [{ "name": "Pet" }] }"#,
        ],
        DatatypesAnchor::Parent(ElementId::new("x")),
    );
    let owners = &sync(&cs.instructions[0], Collection::Packages)[0];
    let assocs = sync(owners, Collection::OwnedAssociations);
    assert_eq!(assocs.len(), 1);
    assert_eq!(
        assocs[0].find.get("navigable_members"),
        Some(&Value::List(vec![Value::Promise(PromiseId::new("o.Owner.pet"))]))
    );

    let member = &sync(&assocs[0], Collection::Members)[0];
    assert_eq!(member.find.get("type"), Some(&Value::Promise(PromiseId::new("o.Owner"))));
    assert_eq!(member.set.get("kind"), Some(&Value::from("ASSOCIATION")));
    assert_eq!(member.set.get("max_card"), Some(&Value::numeric_literal("1")));

    let prop = &sync(&sync(owners, Collection::Classes)[0], Collection::Properties)[0];
    assert_eq!(prop.set.get("kind"), Some(&Value::from("ASSOCIATION")));
    assert_eq!(prop.set.get("max_card"), Some(&Value::numeric_literal("*")));

    let pets = &sync(&cs.instructions[0], Collection::Packages)[1];
    assert!(pets.sync.get(&Collection::OwnedAssociations).is_none());
    assert_eq!(cs.instructions.len(), 1);
}

#[test]
fn test_value_range_emitted() {
    let cs = build(
        &[r#"{ "name": "P", "structs": [{ "name": "A", "attrs": [
            { "name": "n", "dataType": "int8", "range": "-5..*" }
        ]}] }"#],
        DatatypesAnchor::Parent(ElementId::new("x")),
    );
    let pkg = &sync(&cs.instructions[0], Collection::Packages)[0];
    let prop = &sync(&sync(pkg, Collection::Classes)[0], Collection::Properties)[0];
    let keys: Vec<_> = prop.set.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        ["description", "kind", "type", "min_value", "max_value", "min_card", "max_card"]
    );
    assert_eq!(prop.set.get("min_value"), Some(&Value::numeric_literal("-5")));
}
