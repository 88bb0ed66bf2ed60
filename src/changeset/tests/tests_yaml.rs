#![allow(clippy::unwrap_used)]

use crate::base::PromiseId;
use crate::changeset::yaml::{dump, load};
use crate::changeset::{ChangeSet, ChangeSetError, Instruction, Value};
use crate::model::{Collection, ElementId};

fn sample() -> ChangeSet {
    let property = Instruction::find_by_name("name")
        .with_promise(PromiseId::new("smp.Pet.name"))
        .with_set("type", PromiseId::new("datatype.string"))
        .with_set("min_card", Value::numeric_literal("0"))
        .with_set("max_card", Value::numeric_literal("*"));
    let class = Instruction::find_by_name("Pet")
        .with_promise(PromiseId::new("smp.Pet"))
        .with_set("description", "A <b>pet</b>")
        .with_sync(Collection::Properties, vec![property]);
    let association = Instruction::default().with_find(
        "navigable_members",
        Value::List(vec![Value::Promise(PromiseId::new("smp.Pet.name"))]),
    );
    let root = Instruction::at(ElementId::new("0f5c2a3e-0000-4000-8000-000000000001"))
        .with_sync(Collection::Classes, vec![class])
        .with_sync(Collection::OwnedAssociations, vec![association]);
    ChangeSet::new(vec![root])
}

#[test]
fn test_dump_uses_tags() {
    let text = dump(&sample()).unwrap();
    assert!(text.contains("parent: !UUIDReference 0f5c2a3e-0000-4000-8000-000000000001"));
    assert!(text.contains("type: !Promise datatype.string"));
    assert!(text.contains("!NewObject"));
    assert!(text.contains("_type: LiteralNumericValue"));
    assert!(text.contains("promise_id: smp.Pet"));
}

#[test]
fn test_load_inverts_dump() {
    let original = sample();
    let loaded = load(&dump(&original).unwrap()).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn test_sync_order_preserved() {
    let text = dump(&sample()).unwrap();
    let classes = text.find("classes:").unwrap();
    let associations = text.find("owned_associations:").unwrap();
    assert!(classes < associations);
}

#[test]
fn test_load_hand_written() {
    let cs = load(
        r#"
- parent: !UUIDReference abc
  sync:
    datatypes:
      - promise_id: datatype.u8
        find:
          name: u8
          _type: NumericType
"#,
    )
    .unwrap();
    let datatype = &cs.instructions[0].sync[&Collection::Datatypes][0];
    assert_eq!(datatype.find.get("_type"), Some(&Value::from("NumericType")));
    assert_eq!(cs.declared_promises(), vec![&PromiseId::new("datatype.u8")]);
}

#[test]
fn test_load_rejects_unknown_collection() {
    let err = load("- parent: !UUIDReference abc\n  sync:\n    widgets: []\n").unwrap_err();
    assert!(matches!(err, ChangeSetError::UnknownCollection(ref c) if c == "widgets"));
}

#[test]
fn test_load_rejects_unknown_tag() {
    let err = load("- parent: !Mystery abc\n").unwrap_err();
    assert!(matches!(err, ChangeSetError::Invalid(_)));
}
