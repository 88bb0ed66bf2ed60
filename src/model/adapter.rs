//! The seam between the converter and a live target model.

use super::element::{Collection, Element, ElementId, ElementKind, PropertyValue};
use super::error::ModelError;
use super::model::Model;

/// Find, create and remove operations on a live target model.
///
/// The reconciler and the change-set applier only talk to the model
/// through this trait. Query methods have default implementations on top
/// of [`model`](Self::model).
pub trait ModelAdapter {
    fn model(&self) -> &Model;

    fn element(&self, id: &ElementId) -> Option<&Element> {
        self.model().get(id)
    }

    /// Ids of the children of `parent` in `collection`, in order.
    fn children(&self, parent: &ElementId, collection: Collection) -> Vec<ElementId> {
        self.model()
            .children(parent, collection)
            .map(|e| e.id.clone())
            .collect()
    }

    /// First child of `parent` in `collection` named `name`.
    fn find_child(
        &self,
        parent: &ElementId,
        collection: Collection,
        name: &str,
    ) -> Option<ElementId> {
        self.model()
            .find_child(parent, collection, name)
            .map(|e| e.id.clone())
    }

    fn create_child(
        &mut self,
        parent: &ElementId,
        collection: Collection,
        kind: ElementKind,
        name: &str,
    ) -> Result<ElementId, ModelError>;

    fn add_child(
        &mut self,
        parent: &ElementId,
        collection: Collection,
        element: Element,
    ) -> Result<ElementId, ModelError>;

    /// Remove an element with everything it owns. Returns every removed id.
    fn remove_element(&mut self, id: &ElementId) -> Vec<ElementId>;

    fn set_name(&mut self, id: &ElementId, name: &str) -> bool;

    fn set_description(&mut self, id: &ElementId, text: &str) -> bool;

    fn set_property(&mut self, id: &ElementId, key: &str, value: PropertyValue) -> bool;

    fn remove_property(&mut self, id: &ElementId, key: &str) -> bool;
}
