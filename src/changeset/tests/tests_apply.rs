#![allow(clippy::unwrap_used)]

use crate::base::PromiseId;
use crate::base::constants::{DATA_TYPES_PACKAGE, ROOT_PACKAGE_NAME};
use crate::changeset::{
    ChangeSet, ChangeSetError, Instruction, Value, apply_changeset, build_changeset,
};
use crate::model::{
    Anchors, Collection, DatatypesAnchor, ElementId, ElementKind, Model, ModelAdapter, ModelHost,
    PropertyValue,
};
use crate::resolve::resolve;
use crate::schema::{PackageDef, parse_document};

// ── Helpers ─────────────────────────────────────────────────────────

const OWNERS: &str = r#"{
    "name": "Owners", "prefix": "o",
    "structs": [{ "name": "Owner", "attrs": [
        { "name": "pet", "composition": "p.Pet", "multiplicity": "0..*" },
        { "name": "age", "dataType": "uint8", "range": "0..120" }
    ]}]
}"#;

const PETS: &str = r#"{
    "name": "Pets", "prefix": "p",
    "structs": [{ "name": "Pet", "attrs": [{ "name": "kind", "enumType": "Kind" }] }],
    "enums": [{ "name": "Kind", "enumLiterals": [{ "name": "CAT", "intId": 7 }] }]
}"#;

fn changeset_for(host: &ModelHost, docs: &[&str]) -> ChangeSet {
    let mut root = PackageDef::new(ROOT_PACKAGE_NAME, "");
    for doc in docs {
        root.packages.push(parse_document(doc).unwrap());
    }
    let anchors = Anchors {
        root: host.resolve_anchor("la").unwrap(),
        datatypes: DatatypesAnchor::Parent(host.resolve_anchor("sa").unwrap()),
    };
    build_changeset(&resolve(root), &anchors)
}

fn host_and_changeset(docs: &[&str]) -> (ModelHost, ChangeSet, ElementId) {
    let host = ModelHost::from_model(Model::with_standard_layers());
    let cs = changeset_for(&host, docs);
    let la = host.resolve_anchor("la").unwrap();
    (host, cs, la)
}

fn child(host: &ModelHost, parent: &ElementId, collection: Collection, name: &str) -> ElementId {
    host.find_child(parent, collection, name).unwrap()
}

// ============================================================================
// Application
// ============================================================================

#[test]
fn test_apply_creates_tree() {
    let (mut host, cs, la) = host_and_changeset(&[OWNERS, PETS]);
    let report = apply_changeset(&mut host, &cs).unwrap();
    assert!(report.created > 0);

    let owners = child(&host, &la, Collection::Packages, "Owners");
    let pets = child(&host, &la, Collection::Packages, "Pets");
    let owner = child(&host, &owners, Collection::Classes, "Owner");
    let pet = child(&host, &pets, Collection::Classes, "Pet");
    let kind = child(&host, &pets, Collection::Enumerations, "Kind");

    let pet_prop = child(&host, &owner, Collection::Properties, "pet");
    let prop = host.element(&pet_prop).unwrap();
    assert_eq!(prop.property("type"), Some(&PropertyValue::Reference(pet)));
    assert_eq!(prop.property("kind"), Some(&PropertyValue::from("COMPOSITION")));
    assert_eq!(prop.property("max_card"), Some(&PropertyValue::Literal("*".into())));

    let literal = child(&host, &kind, Collection::Literals, "CAT");
    assert_eq!(
        host.element(&literal).unwrap().property("value"),
        Some(&PropertyValue::Literal("7".into()))
    );

    let assoc_id = host.children(&owners, Collection::OwnedAssociations)[0].clone();
    let assoc = host.element(&assoc_id).unwrap();
    assert_eq!(
        assoc.property("navigable_members"),
        Some(&PropertyValue::List(vec![PropertyValue::Reference(pet_prop)]))
    );
    let member = host.children(&assoc_id, Collection::Members)[0].clone();
    assert_eq!(
        host.element(&member).unwrap().property("type"),
        Some(&PropertyValue::Reference(owner))
    );
}

#[test]
fn test_implicit_datatype_created_in_data_types_package() {
    let (mut host, cs, _) = host_and_changeset(&[OWNERS, PETS]);
    apply_changeset(&mut host, &cs).unwrap();

    let sa = host.resolve_anchor("sa").unwrap();
    let types = child(&host, &sa, Collection::Packages, DATA_TYPES_PACKAGE);
    let uint8 = child(&host, &types, Collection::Datatypes, "uint8");
    assert_eq!(host.element(&uint8).unwrap().kind, ElementKind::NumericType);

    let la = host.resolve_anchor("la").unwrap();
    let owner_pkg = child(&host, &la, Collection::Packages, "Owners");
    let owner = child(&host, &owner_pkg, Collection::Classes, "Owner");
    let age = child(&host, &owner, Collection::Properties, "age");
    let age = host.element(&age).unwrap();
    assert_eq!(age.property("type"), Some(&PropertyValue::Reference(uint8)));
    assert_eq!(age.property("max_value"), Some(&PropertyValue::Literal("120".into())));
}

#[test]
fn test_second_application_is_idempotent() {
    let (mut host, cs, _) = host_and_changeset(&[OWNERS, PETS]);
    apply_changeset(&mut host, &cs).unwrap();
    let count = host.model().element_count();

    let report = apply_changeset(&mut host, &cs).unwrap();
    assert!(report.is_unchanged(), "{report:?}");
    assert_eq!(host.model().element_count(), count);
}

#[test]
fn test_changed_description_is_a_modification() {
    let (mut host, cs, _) = host_and_changeset(&[PETS]);
    apply_changeset(&mut host, &cs).unwrap();

    let documented = PETS.replace(
        r#""name": "Pet","#,
        r#""name": "Pet", "info": "now documented","#,
    );
    let changed = changeset_for(&host, &[&documented]);
    let report = apply_changeset(&mut host, &changed).unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.modified, 1);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_never_declared_promise_is_an_error() {
    let mut host = ModelHost::from_model(Model::with_standard_layers());
    let sa = host.resolve_anchor("sa").unwrap();

    let cs = ChangeSet::new(vec![Instruction::at(sa).with_sync(
        Collection::Classes,
        vec![Instruction::find_by_name("A").with_set("base", PromiseId::new("nowhere.B"))],
    )]);
    let err = apply_changeset(&mut host, &cs).unwrap_err();
    assert!(matches!(err, ChangeSetError::UnresolvedPromise(ref p) if p.as_str() == "nowhere.B"));
}

#[test]
fn test_find_waits_for_later_promise() {
    let mut host = ModelHost::from_model(Model::with_standard_layers());
    let sa = host.resolve_anchor("sa").unwrap();

    // The association is listed before the class that declares the promise.
    let cs = ChangeSet::new(vec![
        Instruction::at(sa.clone()).with_sync(
            Collection::OwnedAssociations,
            vec![Instruction::default().with_find(
                "navigable_members",
                Value::List(vec![Value::Promise(PromiseId::new("x.A"))]),
            )],
        ),
        Instruction::at(sa.clone()).with_sync(
            Collection::Classes,
            vec![Instruction::find_by_name("A").with_promise(PromiseId::new("x.A"))],
        ),
    ]);
    let report = apply_changeset(&mut host, &cs).unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(host.children(&sa, Collection::OwnedAssociations).len(), 1);
}

#[test]
fn test_unknown_parent() {
    let mut host = ModelHost::from_model(Model::with_standard_layers());
    let cs = ChangeSet::new(vec![Instruction::at(ElementId::new("missing"))]);
    assert!(matches!(
        apply_changeset(&mut host, &cs),
        Err(ChangeSetError::UnknownParent(_))
    ));
}

#[test]
fn test_datatype_without_type_rejected() {
    let mut host = ModelHost::from_model(Model::with_standard_layers());
    let sa = host.resolve_anchor("sa").unwrap();
    let cs = ChangeSet::new(vec![
        Instruction::at(sa).with_sync(Collection::Datatypes, vec![Instruction::find_by_name("u8")]),
    ]);
    assert!(matches!(
        apply_changeset(&mut host, &cs),
        Err(ChangeSetError::MissingType { .. })
    ));
}
