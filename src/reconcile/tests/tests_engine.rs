#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;

use crate::base::constants::{DATA_TYPES_PACKAGE, ROOT_PACKAGE_NAME};
use crate::model::{
    Anchors, Collection, ElementId, ElementKind, Model, ModelAdapter, ModelHost, PropertyValue,
};
use crate::reconcile::{
    Answer, NoPrompt, Policy, Prompter, ReconcileError, ReconcileReport, Reconciler, reconcile,
};
use crate::resolve::{ResolvedTree, resolve};
use crate::schema::{PackageDef, parse_document};

// ── Helpers ─────────────────────────────────────────────────────────

const A: &str = r#"{ "name": "A", "prefix": "a", "info": "first",
    "structs": [{ "name": "X", "attrs": [{ "name": "n", "dataType": "uint8", "range": "0..9" }] }] }"#;
const B: &str = r#"{ "name": "B", "prefix": "b",
    "structs": [{ "name": "Y", "attrs": [{ "name": "x", "reference": "a.X", "multiplicity": "0..*" }] }] }"#;
const C: &str = r#"{ "name": "C", "prefix": "c",
    "enums": [{ "name": "E", "enumLiterals": [{ "name": "ONE", "intId": 1 }] }] }"#;

fn tree() -> ResolvedTree {
    tree_with(&[A, B, C])
}

/// A model that already went through one conflict-free run.
fn populated() -> (ModelHost, Anchors) {
    let mut host = ModelHost::from_model(Model::with_standard_layers());
    let anchors = host.anchors("la", None, None, "sa").unwrap();
    reconcile(&mut host, &tree(), &anchors, Policy::Abort, NoPrompt).unwrap();
    (host, anchors)
}

fn tree_with(docs: &[&str]) -> ResolvedTree {
    let mut root = PackageDef::new(ROOT_PACKAGE_NAME, "");
    for doc in docs {
        root.packages.push(parse_document(doc).unwrap());
    }
    resolve(root)
}

/// The class `a.X` plus an `extra` property no input declares.
fn with_extra_property(host: &mut ModelHost, anchors: &Anchors) -> ElementId {
    let a = child(host, &anchors.root, Collection::Packages, "A");
    let x = child(host, &a, Collection::Classes, "X");
    host.create_child(&x, Collection::Properties, ElementKind::Property, "extra")
        .unwrap();
    x
}

fn literals(host: &ModelHost, enumeration: &ElementId) -> Vec<(String, String, String)> {
    host.children(enumeration, Collection::Literals)
        .iter()
        .map(|id| {
            let element = host.element(id).unwrap();
            let value = element
                .property("value")
                .and_then(PropertyValue::as_literal)
                .unwrap_or_default();
            (
                element.name.clone().unwrap_or_default(),
                value.to_string(),
                element.description.clone(),
            )
        })
        .collect()
}

fn child(host: &ModelHost, parent: &ElementId, collection: Collection, name: &str) -> ElementId {
    host.find_child(parent, collection, name).unwrap()
}

struct Scripted {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl Scripted {
    fn new(answers: &[Answer]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for Scripted {
    fn confirm_overwrite(&mut self, name: &str) -> Result<Answer, ReconcileError> {
        self.asked.push(name.to_string());
        self.answers.pop_front().ok_or(ReconcileError::PromptClosed)
    }
}

// ============================================================================
// Fresh model
// ============================================================================

#[test]
fn test_fresh_model_creates_everything() {
    let mut host = ModelHost::from_model(Model::with_standard_layers());
    let anchors = host.anchors("la", None, None, "sa").unwrap();
    let report = reconcile(&mut host, &tree(), &anchors, Policy::Abort, NoPrompt).unwrap();
    assert_eq!(
        report,
        ReconcileReport {
            created: 6,
            replaced: 0,
            kept: 0,
            properties: 2,
            literals: 1,
            associations: 1,
            datatypes: 1,
        }
    );

    let a = child(&host, &anchors.root, Collection::Packages, "A");
    assert_eq!(host.element(&a).unwrap().description, "first");
    let x = child(&host, &a, Collection::Classes, "X");
    let n = host.element(&child(&host, &x, Collection::Properties, "n")).unwrap();
    assert_eq!(n.property("kind"), Some(&PropertyValue::from("COMPOSITION")));
    assert_eq!(n.property("max_value"), Some(&PropertyValue::Literal("9".into())));

    let sa = host.resolve_anchor("sa").unwrap();
    let types = child(&host, &sa, Collection::Packages, DATA_TYPES_PACKAGE);
    let uint8 = child(&host, &types, Collection::Datatypes, "uint8");
    assert_eq!(host.element(&uint8).unwrap().kind, ElementKind::NumericType);
    assert_eq!(n.property("type"), Some(&PropertyValue::Reference(uint8)));

    let c = child(&host, &anchors.root, Collection::Packages, "C");
    let e = child(&host, &c, Collection::Enumerations, "E");
    let one = child(&host, &e, Collection::Literals, "ONE");
    assert_eq!(
        host.element(&one).unwrap().property("value"),
        Some(&PropertyValue::Literal("1".into()))
    );
}

#[test]
fn test_class_reference_gets_association() {
    let (host, anchors) = populated();
    let a = child(&host, &anchors.root, Collection::Packages, "A");
    let b = child(&host, &anchors.root, Collection::Packages, "B");
    let x = child(&host, &a, Collection::Classes, "X");
    let y = child(&host, &b, Collection::Classes, "Y");
    let prop = child(&host, &y, Collection::Properties, "x");

    let element = host.element(&prop).unwrap();
    assert_eq!(element.property("type"), Some(&PropertyValue::Reference(x)));
    assert_eq!(element.property("kind"), Some(&PropertyValue::from("ASSOCIATION")));
    assert_eq!(element.property("max_card"), Some(&PropertyValue::Literal("*".into())));

    let associations = host.children(&b, Collection::OwnedAssociations);
    assert_eq!(associations.len(), 1);
    let member = host.children(&associations[0], Collection::Members)[0].clone();
    let member = host.element(&member).unwrap();
    assert_eq!(member.property("type"), Some(&PropertyValue::Reference(y)));
    assert_eq!(member.property("min_card"), Some(&PropertyValue::Literal("1".into())));
}

// ============================================================================
// Policies
// ============================================================================

#[test]
fn test_skip_keeps_existing_elements() {
    let (mut host, anchors) = populated();
    let a = child(&host, &anchors.root, Collection::Packages, "A");
    let count = host.model().element_count();

    let report = reconcile(&mut host, &tree(), &anchors, Policy::Skip, NoPrompt).unwrap();
    assert_eq!(report.kept, 6);
    assert_eq!(report.created, 0);
    assert_eq!(report.associations, 0);
    assert_eq!(report.datatypes, 0);
    assert_eq!(host.model().element_count(), count);
    assert_eq!(child(&host, &anchors.root, Collection::Packages, "A"), a);
}

#[test]
fn test_replace_recreates_conflicts() {
    let (mut host, anchors) = populated();
    let a = child(&host, &anchors.root, Collection::Packages, "A");
    let count = host.model().element_count();

    let report = reconcile(&mut host, &tree(), &anchors, Policy::Replace, NoPrompt).unwrap();
    assert_eq!(report.replaced, 3);
    assert_eq!(report.created, 3);
    assert!(!host.model().contains(&a));
    assert_ne!(child(&host, &anchors.root, Collection::Packages, "A"), a);
    assert_eq!(host.model().element_count(), count);
}

#[test]
fn test_skip_leaves_undeclared_properties() {
    let (mut host, anchors) = populated();
    let x = with_extra_property(&mut host, &anchors);

    reconcile(&mut host, &tree(), &anchors, Policy::Skip, NoPrompt).unwrap();
    let a = child(&host, &anchors.root, Collection::Packages, "A");
    assert_eq!(child(&host, &a, Collection::Classes, "X"), x);
    let names: Vec<_> = host
        .children(&x, Collection::Properties)
        .iter()
        .filter_map(|id| host.element(id).unwrap().name.clone())
        .collect();
    assert_eq!(names, ["n", "extra"]);
}

#[test]
fn test_replace_drops_undeclared_properties() {
    let (mut host, anchors) = populated();
    let count = host.model().element_count();
    let old_x = with_extra_property(&mut host, &anchors);

    reconcile(&mut host, &tree(), &anchors, Policy::Replace, NoPrompt).unwrap();
    assert!(!host.model().contains(&old_x));
    let a = child(&host, &anchors.root, Collection::Packages, "A");
    let x = child(&host, &a, Collection::Classes, "X");
    assert!(host.find_child(&x, Collection::Properties, "extra").is_none());
    assert!(host.find_child(&x, Collection::Properties, "n").is_some());
    assert_eq!(host.model().element_count(), count);
}

#[test]
fn test_skip_still_syncs_enum_literals() {
    let mut host = ModelHost::from_model(Model::with_standard_layers());
    let anchors = host.anchors("la", None, None, "sa").unwrap();
    reconcile(&mut host, &tree_with(&[C]), &anchors, Policy::Abort, NoPrompt).unwrap();
    let c = child(&host, &anchors.root, Collection::Packages, "C");
    let e = child(&host, &c, Collection::Enumerations, "E");

    let changed = r#"{ "name": "C", "prefix": "c",
        "enums": [{ "name": "E", "enumLiterals": [
            { "name": "ONE", "intId": 5, "info": "new" },
            { "name": "TWO", "intId": 2 }
        ] }] }"#;
    let report =
        reconcile(&mut host, &tree_with(&[changed]), &anchors, Policy::Skip, NoPrompt).unwrap();
    assert_eq!(report.kept, 2);
    assert_eq!(report.literals, 2);

    assert_eq!(child(&host, &c, Collection::Enumerations, "E"), e);
    assert_eq!(
        literals(&host, &e),
        [
            ("ONE".to_string(), "5".to_string(), "new".to_string()),
            ("TWO".to_string(), "2".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_abort_on_first_conflict() {
    let (mut host, anchors) = populated();
    let err = reconcile(&mut host, &tree(), &anchors, Policy::Abort, NoPrompt).unwrap_err();
    assert!(matches!(
        err,
        ReconcileError::Aborted { kind: "package", ref name } if name == "A"
    ));
}

#[test]
fn test_ask_no_to_all_switches_to_skip() {
    let (mut host, anchors) = populated();
    let old_x = {
        let a = child(&host, &anchors.root, Collection::Packages, "A");
        child(&host, &a, Collection::Classes, "X")
    };
    let mut prompter = Scripted::new(&[Answer::Yes, Answer::NoToAll]);

    let tree = tree();
    let mut reconciler = Reconciler::new(&mut host, anchors.clone(), Policy::Ask, &mut prompter);
    reconciler.run(&tree.root).unwrap();
    let report = reconciler.report();
    assert_eq!(reconciler.policy(), Policy::Skip);

    assert_eq!(prompter.asked, ["A", "B"]);
    assert_eq!(report.replaced, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.kept, 4);

    // The kept property now points at the recreated class.
    let a = child(&host, &anchors.root, Collection::Packages, "A");
    let b = child(&host, &anchors.root, Collection::Packages, "B");
    let new_x = child(&host, &a, Collection::Classes, "X");
    assert_ne!(new_x, old_x);
    let y = child(&host, &b, Collection::Classes, "Y");
    let prop = child(&host, &y, Collection::Properties, "x");
    assert_eq!(
        host.element(&prop).unwrap().property("type"),
        Some(&PropertyValue::Reference(new_x))
    );
    assert_eq!(host.children(&b, Collection::OwnedAssociations).len(), 1);
}

#[test]
fn test_ask_yes_to_all_switches_to_replace() {
    let (mut host, anchors) = populated();
    let mut prompter = Scripted::new(&[Answer::YesToAll]);

    let tree = tree();
    let mut reconciler = Reconciler::new(&mut host, anchors, Policy::Ask, &mut prompter);
    reconciler.run(&tree.root).unwrap();
    assert_eq!(reconciler.policy(), Policy::Replace);
    assert_eq!(reconciler.report().replaced, 3);
    assert_eq!(prompter.asked, ["A"]);
}

#[test]
fn test_ask_without_answers_fails() {
    let (mut host, anchors) = populated();
    let err = reconcile(&mut host, &tree(), &anchors, Policy::Ask, NoPrompt).unwrap_err();
    assert!(matches!(err, ReconcileError::PromptClosed));
}
