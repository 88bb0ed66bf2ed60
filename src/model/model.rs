//! The in-memory target model.
//!
//! ```text
//! Model
//! ├── elements: IndexMap<ElementId, Element>  (preserves insertion order)
//! ├── layers:   IndexMap<String, ElementId>   (layer name -> data package)
//! ├── roots:    Vec<ElementId>
//! └── metadata: ModelMetadata
//! ```
//!
//! Ownership is stored twice: each child lists its `owner`, each parent
//! lists its children per collection. [`ChangeTracker`](super::ChangeTracker)
//! keeps both sides in sync.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::element::{Collection, Element, ElementId, ElementKind};
use crate::base::constants::STANDARD_LAYERS;

/// Name of every layer's root data package.
pub const LAYER_PACKAGE_NAME: &str = "Data";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub metadata: ModelMetadata,
    #[serde(default)]
    pub layers: IndexMap<String, ElementId>,
    #[serde(default)]
    pub roots: Vec<ElementId>,
    #[serde(default)]
    pub elements: IndexMap<ElementId, Element>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model with one `Data` package per standard layer.
    pub fn with_standard_layers() -> Self {
        let mut model = Self::new();
        model.metadata.tool = Some(env!("CARGO_PKG_NAME").to_string());
        for layer in STANDARD_LAYERS {
            let pkg = Element::new(ElementId::generate(), ElementKind::DataPkg)
                .with_name(LAYER_PACKAGE_NAME);
            let id = model.add_element(pkg);
            model.layers.insert((*layer).to_string(), id);
        }
        model
    }

    /// Insert an element, registering it as a root when it has no owner.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id.clone();
        if element.owner.is_none() {
            self.roots.push(id.clone());
        }
        self.elements.insert(id.clone(), element);
        id
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn iter_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Root data package of a layer.
    pub fn layer(&self, name: &str) -> Option<&ElementId> {
        self.layers.get(name)
    }

    /// Children of `parent` in `collection`, filtered to accepted kinds.
    pub fn children<'a>(
        &'a self,
        parent: &ElementId,
        collection: Collection,
    ) -> impl Iterator<Item = &'a Element> + use<'a> {
        let ids = self
            .get(parent)
            .map_or(&[][..], |p| p.children_in(collection.storage()));
        ids.iter()
            .filter_map(|id| self.get(id))
            .filter(move |e| collection.accepts(e.kind))
    }

    /// First child of `parent` in `collection` with the given name.
    pub fn find_child(
        &self,
        parent: &ElementId,
        collection: Collection,
        name: &str,
    ) -> Option<&Element> {
        self.children(parent, collection)
            .find(|e| e.name.as_deref() == Some(name))
    }

    /// Every element with `kind`, in insertion order.
    pub fn find_by_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |e| e.kind == kind)
    }

    /// Every element named `name`.
    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements
            .values()
            .filter(move |e| e.name.as_deref() == Some(name))
    }

    /// `id` and every element it owns, transitively, parents first.
    pub fn subtree(&self, id: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            if let Some(el) = self.get(&next) {
                let children: Vec<_> = el.all_children().cloned().collect();
                stack.extend(children.into_iter().rev());
                out.push(next);
            }
        }
        out
    }

    /// Whether `id` is `ancestor` or owned by it, transitively.
    pub fn is_within(&self, id: &ElementId, ancestor: &ElementId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.get(cur).and_then(|e| e.owner.as_ref());
        }
        false
    }
}
