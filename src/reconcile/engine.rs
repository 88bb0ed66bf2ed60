//! Direct application of a resolved tree to a live model.
//!
//! Two passes over the tree:
//!
//! 1. **Objects**: packages, then classes, then enums at every level are
//!    created, kept or replaced according to the current [`Policy`].
//!    Every class and enum that ends up in the model is registered in a
//!    handle table under its promise id.
//! 2. **Relations**: properties and enum literals are synchronized in
//!    place whatever the policy decided for their owner. Properties are
//!    typed through the handle table, and class-typed properties get their
//!    association.
//!    Types nothing declares are taken from (or synthesized in) the
//!    `Data Types` container.

use indexmap::IndexMap;
use tracing::{debug, info};

use super::error::ReconcileError;
use super::policy::Policy;
use super::prompt::Prompter;
use crate::base::PromiseId;
use crate::base::constants::{DATA_TYPES_PACKAGE, KIND_ASSOCIATION};
use crate::model::{
    Anchors, Collection, DatatypesAnchor, Element, ElementId, ElementKind, ModelAdapter,
    PropertyValue,
};
use crate::resolve::{DatatypeKind, ResolvedTree};
use crate::schema::{ClassDef, EnumDef, LiteralDef, PackageDef, PropertyDef, Range, TypeRef};

/// What a reconciliation run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Packages, classes and enums newly created.
    pub created: usize,
    /// Existing elements deleted and created again.
    pub replaced: usize,
    /// Existing elements left as they were.
    pub kept: usize,
    /// Properties created or updated.
    pub properties: usize,
    /// Enum literals created or updated.
    pub literals: usize,
    /// Associations created.
    pub associations: usize,
    /// Datatypes synthesized in the `Data Types` container.
    pub datatypes: usize,
}

/// Reconcile `tree` into the model behind `adapter`.
///
/// The synthetic root package itself is not materialized: its packages,
/// classes and enums go directly below `anchors.root`.
pub fn reconcile<A: ModelAdapter, P: Prompter>(
    adapter: &mut A,
    tree: &ResolvedTree,
    anchors: &Anchors,
    policy: Policy,
    prompter: P,
) -> Result<ReconcileReport, ReconcileError> {
    let mut reconciler = Reconciler::new(adapter, anchors.clone(), policy, prompter);
    reconciler.run(&tree.root)?;
    Ok(reconciler.report)
}

// ============================================================================
// DEFINITIONS
// ============================================================================

/// The three kinds of definitions that can conflict.
#[derive(Clone, Copy, Debug)]
enum Def<'d> {
    Package(&'d PackageDef),
    Class { def: &'d ClassDef, prefix: &'d str },
    Enum { def: &'d EnumDef, prefix: &'d str },
}

impl Def<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Package(def) => &def.name,
            Self::Class { def, .. } => &def.name,
            Self::Enum { def, .. } => &def.name,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Package(_) => "package",
            Self::Class { .. } => "class",
            Self::Enum { .. } => "enumeration",
        }
    }

    fn collection(&self) -> Collection {
        match self {
            Self::Package(_) => Collection::Packages,
            Self::Class { .. } => Collection::Classes,
            Self::Enum { .. } => Collection::Enumerations,
        }
    }

    fn promise_id(&self) -> Option<PromiseId> {
        match self {
            Self::Package(_) => None,
            Self::Class { def, prefix } => Some(def.promise_id_in(prefix)),
            Self::Enum { def, prefix } => Some(def.promise_id_in(prefix)),
        }
    }

    /// The element to create, without children.
    fn to_element(self) -> Element {
        let (kind, description) = match self {
            Self::Package(def) => (ElementKind::DataPkg, &def.description),
            Self::Class { def, .. } => (ElementKind::Class, &def.description),
            Self::Enum { def, .. } => (ElementKind::Enumeration, &def.description),
        };
        Element::new(ElementId::generate(), kind)
            .with_name(self.name())
            .with_description(description.as_str())
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Run context of one reconciliation.
pub struct Reconciler<'a, A, P> {
    adapter: &'a mut A,
    anchors: Anchors,
    /// Current policy; a to-all answer switches it for the rest of the run.
    policy: Policy,
    prompter: P,
    /// Promise id -> element of every class and enum handled so far.
    handles: IndexMap<PromiseId, ElementId>,
    /// The `Data Types` container, once located or created.
    data_types: Option<ElementId>,
    report: ReconcileReport,
}

impl<'a, A: ModelAdapter, P: Prompter> Reconciler<'a, A, P> {
    pub fn new(adapter: &'a mut A, anchors: Anchors, policy: Policy, prompter: P) -> Self {
        Self {
            adapter,
            anchors,
            policy,
            prompter,
            handles: IndexMap::new(),
            data_types: None,
            report: ReconcileReport::default(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn report(&self) -> ReconcileReport {
        self.report
    }

    /// Both passes over `root`, whose contents land below the root anchor.
    pub fn run(&mut self, root: &PackageDef) -> Result<(), ReconcileError> {
        let anchor = self.anchors.root.clone();
        self.handle_objects(root, &anchor)?;
        self.handle_relations(root, &anchor)?;
        info!(
            created = self.report.created,
            replaced = self.report.replaced,
            kept = self.report.kept,
            properties = self.report.properties,
            "reconciliation finished"
        );
        Ok(())
    }

    // ── Object pass ─────────────────────────────────────────────────

    fn handle_objects(&mut self, package: &PackageDef, parent: &ElementId) -> Result<(), ReconcileError> {
        let prefix = package.prefix.as_str();
        let packages: Vec<_> = package.packages.iter().map(Def::Package).collect();
        let classes: Vec<_> = package
            .classes
            .iter()
            .map(|def| Def::Class { def, prefix })
            .collect();
        let enums: Vec<_> = package
            .enums
            .iter()
            .map(|def| Def::Enum { def, prefix })
            .collect();

        for list in [packages, classes, enums] {
            self.handle_list(&list, parent)?;
        }

        for sub in &package.packages {
            let sub_id = self.package_below(parent, &sub.name)?;
            self.handle_objects(sub, &sub_id)?;
        }
        Ok(())
    }

    fn handle_list(&mut self, defs: &[Def<'_>], parent: &ElementId) -> Result<(), ReconcileError> {
        for def in defs {
            let Some(existing) = self.adapter.find_child(parent, def.collection(), def.name()) else {
                self.create(*def, parent)?;
                continue;
            };

            let replace = match self.policy {
                Policy::Skip => false,
                Policy::Replace => true,
                Policy::Abort => return Err(ReconcileError::aborted(def.label(), def.name())),
                Policy::Ask => {
                    let answer = self.prompter.confirm_overwrite(def.name())?;
                    if let Some(policy) = answer.switches_to() {
                        debug!(%policy, "conflict policy switched");
                        self.policy = policy;
                    }
                    answer.replaces()
                }
            };

            if replace {
                self.replace(*def, parent, &existing)?;
            } else {
                self.keep(*def, existing);
            }
        }
        Ok(())
    }

    fn create(&mut self, def: Def<'_>, parent: &ElementId) -> Result<(), ReconcileError> {
        self.materialize(def, parent)?;
        self.report.created += 1;
        Ok(())
    }

    fn keep(&mut self, def: Def<'_>, existing: ElementId) {
        info!("{} already exists.", self.describe(&existing));
        self.register(def, &existing);
        self.report.kept += 1;
    }

    fn replace(&mut self, def: Def<'_>, parent: &ElementId, existing: &ElementId) -> Result<(), ReconcileError> {
        let label = self.describe(existing);
        let removed = self.adapter.remove_element(existing);
        info!(removed = removed.len(), "{label} deleted.");
        self.materialize(def, parent)?;
        self.report.replaced += 1;
        Ok(())
    }

    /// Create the element for `def` and register its handle. Enum
    /// literals are filled in by the relation pass.
    fn materialize(&mut self, def: Def<'_>, parent: &ElementId) -> Result<ElementId, ReconcileError> {
        let id = self.adapter.add_child(parent, def.collection(), def.to_element())?;
        info!("{} created.", self.describe(&id));
        self.register(def, &id);
        Ok(id)
    }

    fn register(&mut self, def: Def<'_>, id: &ElementId) {
        if let Some(promise) = def.promise_id() {
            debug!(%promise, %id, "handle registered");
            self.handles.insert(promise, id.clone());
        }
    }

    // ── Relation pass ───────────────────────────────────────────────

    fn handle_relations(&mut self, package: &PackageDef, parent: &ElementId) -> Result<(), ReconcileError> {
        for class in &package.classes {
            let promise = class.promise_id_in(&package.prefix);
            let class_id = match self.handles.get(&promise) {
                Some(id) => id.clone(),
                None => self
                    .adapter
                    .find_child(parent, Collection::Classes, &class.name)
                    .ok_or_else(|| ReconcileError::missing("class", &class.name, parent))?,
            };
            for property in &class.properties {
                self.sync_property(property, &class_id, parent)?;
            }
            debug!(class = %class.name, "properties synchronized");
        }

        for enumeration in &package.enums {
            let promise = enumeration.promise_id_in(&package.prefix);
            let enum_id = match self.handles.get(&promise) {
                Some(id) => id.clone(),
                None => self
                    .adapter
                    .find_child(parent, Collection::Enumerations, &enumeration.name)
                    .ok_or_else(|| ReconcileError::missing("enumeration", &enumeration.name, parent))?,
            };
            for literal in &enumeration.literals {
                self.sync_literal(literal, &enum_id)?;
            }
        }

        for sub in &package.packages {
            let sub_id = self.package_below(parent, &sub.name)?;
            self.handle_relations(sub, &sub_id)?;
        }
        Ok(())
    }

    /// Create or update one property of `class_id`; `package` owns the
    /// class and receives any association.
    fn sync_property(
        &mut self,
        property: &PropertyDef,
        class_id: &ElementId,
        package: &ElementId,
    ) -> Result<(), ReconcileError> {
        let (type_id, class_typed) = self.property_type(&property.ty)?;

        let prop_id = match self
            .adapter
            .find_child(class_id, Collection::Properties, &property.name)
        {
            Some(id) => id,
            None => self.adapter.create_child(
                class_id,
                Collection::Properties,
                ElementKind::Property,
                &property.name,
            )?,
        };

        self.adapter.set_description(&prop_id, &property.description);
        self.adapter
            .set_property(&prop_id, "kind", property.kind.as_str().into());
        self.adapter
            .set_property(&prop_id, "type", PropertyValue::Reference(type_id));
        self.set_range(&prop_id, "min_card", "max_card", Some(&property.cardinality));
        self.set_range(&prop_id, "min_value", "max_value", property.value_range.as_ref());
        self.report.properties += 1;

        if class_typed {
            self.ensure_association(package, class_id, &prop_id)?;
        }
        Ok(())
    }

    fn sync_literal(&mut self, literal: &LiteralDef, enum_id: &ElementId) -> Result<(), ReconcileError> {
        let literal_id = match self
            .adapter
            .find_child(enum_id, Collection::Literals, &literal.name)
        {
            Some(id) => id,
            None => self.adapter.create_child(
                enum_id,
                Collection::Literals,
                ElementKind::EnumerationLiteral,
                &literal.name,
            )?,
        };
        self.adapter.set_description(&literal_id, &literal.description);
        self.adapter
            .set_property(&literal_id, "value", PropertyValue::Literal(literal.value.clone()));
        self.report.literals += 1;
        Ok(())
    }

    fn set_range(&mut self, id: &ElementId, min_key: &str, max_key: &str, range: Option<&Range>) {
        match range {
            Some(range) => {
                self.adapter
                    .set_property(id, min_key, PropertyValue::Literal(range.min.clone()));
                self.adapter
                    .set_property(id, max_key, PropertyValue::Literal(range.max.clone()));
            }
            None => {
                self.adapter.remove_property(id, min_key);
                self.adapter.remove_property(id, max_key);
            }
        }
    }

    /// The element typing a property, and whether it is a handled class.
    fn property_type(&mut self, ty: &TypeRef) -> Result<(ElementId, bool), ReconcileError> {
        if let TypeRef::Class(name) | TypeRef::Enum(name) = ty {
            if let Some(id) = self.handles.get(&name.promise_id()) {
                return Ok((id.clone(), matches!(ty, TypeRef::Class(_))));
            }
        }

        let name = ty.name();
        let container = self.data_types_container()?;
        if let Some(id) = self.adapter.find_child(&container, Collection::Datatypes, name) {
            return Ok((id, false));
        }
        let kind = DatatypeKind::classify(name);
        let element = Element::new(ElementId::generate(), datatype_element_kind(kind)).with_name(name);
        let id = self.adapter.add_child(&container, Collection::Datatypes, element)?;
        info!("{} created.", self.describe(&id));
        self.report.datatypes += 1;
        Ok((id, false))
    }

    fn ensure_association(
        &mut self,
        package: &ElementId,
        class_id: &ElementId,
        prop_id: &ElementId,
    ) -> Result<(), ReconcileError> {
        let navigable = PropertyValue::List(vec![PropertyValue::Reference(prop_id.clone())]);
        let exists = self
            .adapter
            .model()
            .children(package, Collection::OwnedAssociations)
            .any(|a| a.property("navigable_members") == Some(&navigable));
        if exists {
            return Ok(());
        }

        let association = Element::new(ElementId::generate(), ElementKind::Association)
            .with_property("navigable_members", navigable);
        let assoc_id = self
            .adapter
            .add_child(package, Collection::OwnedAssociations, association)?;
        let member = Element::new(ElementId::generate(), ElementKind::Property)
            .with_property("type", PropertyValue::Reference(class_id.clone()))
            .with_property("kind", KIND_ASSOCIATION.into())
            .with_property("min_card", PropertyValue::Literal("1".into()))
            .with_property("max_card", PropertyValue::Literal("1".into()));
        self.adapter.add_child(&assoc_id, Collection::Members, member)?;
        self.report.associations += 1;
        Ok(())
    }

    fn data_types_container(&mut self) -> Result<ElementId, ReconcileError> {
        if let Some(id) = &self.data_types {
            return Ok(id.clone());
        }
        let id = match &self.anchors.datatypes {
            DatatypesAnchor::Container(id) => id.clone(),
            DatatypesAnchor::Parent(parent) => {
                let parent = parent.clone();
                match self
                    .adapter
                    .find_child(&parent, Collection::Packages, DATA_TYPES_PACKAGE)
                {
                    Some(id) => id,
                    None => {
                        let id = self.adapter.create_child(
                            &parent,
                            Collection::Packages,
                            ElementKind::DataPkg,
                            DATA_TYPES_PACKAGE,
                        )?;
                        info!("{} created.", self.describe(&id));
                        id
                    }
                }
            }
        };
        self.data_types = Some(id.clone());
        Ok(id)
    }

    // ── Helpers ─────────────────────────────────────────────────────

    fn package_below(&self, parent: &ElementId, name: &str) -> Result<ElementId, ReconcileError> {
        self.adapter
            .find_child(parent, Collection::Packages, name)
            .ok_or_else(|| ReconcileError::missing("package", name, parent))
    }

    fn describe(&self, id: &ElementId) -> String {
        self.adapter
            .element(id)
            .map_or_else(|| id.to_string(), |e| e.short_repr())
    }
}

fn datatype_element_kind(kind: DatatypeKind) -> ElementKind {
    match kind {
        DatatypeKind::String => ElementKind::StringType,
        DatatypeKind::Boolean => ElementKind::BooleanType,
        DatatypeKind::Numeric => ElementKind::NumericType,
    }
}
