//! Change tracking and mutation API for [`Model`].
//!
//! Every write to a model goes through a [`ChangeTracker`], which keeps
//! owner/children links consistent and records which elements were
//! created, modified or removed. Setters only record a modification when
//! the stored value actually changes, so re-applying the same edits leaves
//! the tracker clean.
//!
//! ## Example
//!
//! ```
//! use json2model::model::{ChangeTracker, Collection, ElementKind, Model};
//!
//! let mut model = Model::with_standard_layers();
//! let mut tracker = ChangeTracker::new();
//! let sa = model.layer("sa").cloned().unwrap();
//!
//! let pkg = tracker
//!     .create_child(&mut model, &sa, Collection::Packages, ElementKind::DataPkg, "Pets")
//!     .unwrap();
//! assert!(tracker.is_created(&pkg));
//!
//! tracker.clear();
//! tracker.set_name(&mut model, &pkg, "Pets");
//! assert!(!tracker.has_changes());
//! ```

use indexmap::IndexSet;
use tracing::debug;

use super::element::{Collection, Element, ElementId, ElementKind, PropertyValue};
use super::error::ModelError;
use super::model::Model;

/// Tracks mutations applied to a [`Model`].
#[derive(Clone, Debug, Default)]
pub struct ChangeTracker {
    /// Element IDs that have been modified (including creation).
    modified: IndexSet<ElementId>,
    /// Element IDs that have been created (subset of modified).
    created: IndexSet<ElementId>,
    /// Element IDs that have been removed.
    removed: IndexSet<ElementId>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all dirty state.
    pub fn clear(&mut self) {
        self.modified.clear();
        self.created.clear();
        self.removed.clear();
    }

    // ── Query ───────────────────────────────────────────────────────

    pub fn has_changes(&self) -> bool {
        !self.modified.is_empty() || !self.removed.is_empty()
    }

    pub fn is_dirty(&self, id: &ElementId) -> bool {
        self.modified.contains(id)
    }

    pub fn is_created(&self, id: &ElementId) -> bool {
        self.created.contains(id)
    }

    pub fn is_removed(&self, id: &ElementId) -> bool {
        self.removed.contains(id)
    }

    pub fn created_elements(&self) -> impl Iterator<Item = &ElementId> {
        self.created.iter()
    }

    /// Modified elements that were not created in this session.
    pub fn modified_elements(&self) -> impl Iterator<Item = &ElementId> {
        self.modified
            .iter()
            .filter(|id| !self.created.contains(*id))
    }

    pub fn removed_elements(&self) -> impl Iterator<Item = &ElementId> {
        self.removed.iter()
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Create a named element in `collection` of `parent`.
    pub fn create_child(
        &mut self,
        model: &mut Model,
        parent: &ElementId,
        collection: Collection,
        kind: ElementKind,
        name: &str,
    ) -> Result<ElementId, ModelError> {
        let element = Element::new(ElementId::generate(), kind).with_name(name);
        self.add_child(model, parent, collection, element)
    }

    /// Attach a fully built element below `parent`.
    pub fn add_child(
        &mut self,
        model: &mut Model,
        parent: &ElementId,
        collection: Collection,
        mut element: Element,
    ) -> Result<ElementId, ModelError> {
        if !collection.accepts(element.kind) {
            return Err(ModelError::InvalidChild {
                collection,
                kind: element.kind,
            });
        }
        let owner = model
            .get_mut(parent)
            .ok_or_else(|| ModelError::UnknownElement(parent.clone()))?;
        owner
            .children
            .entry(collection.storage().to_string())
            .or_default()
            .push(element.id.clone());

        element.owner = Some(parent.clone());
        let id = model.add_element(element);
        debug!(%id, %parent, %collection, "element created");
        self.modified.insert(parent.clone());
        self.created.insert(id.clone());
        self.modified.insert(id.clone());
        Ok(id)
    }

    /// Rename an element.
    pub fn set_name(&mut self, model: &mut Model, id: &ElementId, name: &str) -> bool {
        let Some(el) = model.get_mut(id) else {
            return false;
        };
        if el.name.as_deref() == Some(name) {
            return false;
        }
        el.name = Some(name.to_string());
        self.modified.insert(id.clone());
        true
    }

    pub fn set_description(&mut self, model: &mut Model, id: &ElementId, text: &str) -> bool {
        let Some(el) = model.get_mut(id) else {
            return false;
        };
        if el.description == text {
            return false;
        }
        el.description = text.to_string();
        self.modified.insert(id.clone());
        true
    }

    /// Set an attribute. Returns whether the stored value changed.
    pub fn set_property(
        &mut self,
        model: &mut Model,
        id: &ElementId,
        key: &str,
        value: PropertyValue,
    ) -> bool {
        let Some(el) = model.get_mut(id) else {
            return false;
        };
        if el.properties.get(key) == Some(&value) {
            return false;
        }
        el.properties.insert(key.to_string(), value);
        self.modified.insert(id.clone());
        true
    }

    pub fn remove_property(&mut self, model: &mut Model, id: &ElementId, key: &str) -> bool {
        let removed = model
            .get_mut(id)
            .and_then(|el| el.properties.shift_remove(key))
            .is_some();
        if removed {
            self.modified.insert(id.clone());
        }
        removed
    }

    /// Remove an element with its owned subtree.
    ///
    /// Associations that end up pointing at a removed element are removed
    /// too, and every remaining reference to a removed element is dropped.
    /// Returns the ids of all removed elements.
    pub fn remove_element(&mut self, model: &mut Model, id: &ElementId) -> Vec<ElementId> {
        let mut removed = Vec::new();
        let mut pending = vec![id.clone()];

        while let Some(next) = pending.pop() {
            if !model.contains(&next) {
                continue;
            }
            self.detach(model, &next);
            for gone in model.subtree(&next) {
                model.elements.shift_remove(&gone);
                model.roots.retain(|r| *r != gone);
                self.modified.shift_remove(&gone);
                self.created.shift_remove(&gone);
                self.removed.insert(gone.clone());
                removed.push(gone);
            }
            pending.extend(dangling_associations(model, &removed));
        }

        for gone in &removed {
            self.scrub_references(model, gone);
        }
        removed
    }

    /// Unlink `id` from its owner's child lists.
    fn detach(&mut self, model: &mut Model, id: &ElementId) {
        let Some(owner_id) = model.get(id).and_then(|el| el.owner.clone()) else {
            return;
        };
        if let Some(owner) = model.get_mut(&owner_id) {
            for children in owner.children.values_mut() {
                children.retain(|child| child != id);
            }
            owner.children.retain(|_, children| !children.is_empty());
            self.modified.insert(owner_id);
        }
    }

    fn scrub_references(&mut self, model: &mut Model, gone: &ElementId) {
        for el in model.elements.values_mut() {
            let before = el.properties.len();
            let mut touched = false;
            el.properties.retain(|_, value| {
                let had = value.references().contains(&gone);
                touched |= had;
                value.retain_references(gone)
            });
            if touched || el.properties.len() != before {
                self.modified.insert(el.id.clone());
            }
        }
    }
}

/// Associations whose navigable members or member types reference any of
/// `removed`.
fn dangling_associations(model: &Model, removed: &[ElementId]) -> Vec<ElementId> {
    let points_at_removed = |el: &Element| {
        el.properties
            .values()
            .flat_map(PropertyValue::references)
            .any(|r| removed.contains(r))
    };

    model
        .find_by_kind(ElementKind::Association)
        .filter(|assoc| {
            points_at_removed(assoc)
                || assoc
                    .all_children()
                    .filter_map(|id| model.get(id))
                    .any(points_at_removed)
        })
        .map(|assoc| assoc.id.clone())
        .collect()
}
