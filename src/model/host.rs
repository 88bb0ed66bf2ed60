//! File-backed owner of a [`Model`].
//!
//! `ModelHost` loads a model file, funnels every edit through a
//! [`ChangeTracker`] and writes the file back once at the end of a run.
//!
//! ## Quick start
//!
//! ```no_run
//! use json2model::model::{ModelAdapter, ModelHost};
//!
//! let mut host = ModelHost::open("model.json".as_ref())?;
//! let sa = host.resolve_anchor("sa")?;
//! let _ = host.find_child(&sa, json2model::model::Collection::Packages, "Pets");
//! host.save()?;
//! # Ok::<(), json2model::model::ModelError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::adapter::ModelAdapter;
use super::anchor::{Anchors, DatatypesAnchor};
use super::editing::ChangeTracker;
use super::element::{Collection, Element, ElementId, ElementKind, PropertyValue};
use super::error::ModelError;
use super::format::detect_format;
use super::model::Model;

pub struct ModelHost {
    model: Model,
    tracker: ChangeTracker,
    /// File the model was loaded from (if any).
    path: Option<PathBuf>,
}

impl ModelHost {
    // ── Construction ─────────────────────────────────────────────────

    /// Load a model file; the format is picked by extension.
    pub fn open(path: &Path) -> Result<Self, ModelError> {
        let format = format_for(path)?;
        let bytes = fs::read(path).map_err(|e| ModelError::io(path, e))?;
        let model = format.read(&bytes)?;
        debug!(path = %path.display(), elements = model.element_count(), "model loaded");
        Ok(Self {
            model,
            tracker: ChangeTracker::new(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already-constructed model.
    pub fn from_model(model: Model) -> Self {
        Self {
            model,
            tracker: ChangeTracker::new(),
            path: None,
        }
    }

    /// Start a new model with the standard layers, to be saved at `path`.
    pub fn init(path: &Path) -> Result<Self, ModelError> {
        format_for(path)?;
        Ok(Self {
            model: Model::with_standard_layers(),
            tracker: ChangeTracker::new(),
            path: Some(path.to_path_buf()),
        })
    }

    // ── Access ───────────────────────────────────────────────────────

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ── Anchors ──────────────────────────────────────────────────────

    /// Resolve a layer name (`oa`, `sa`, `la`, `pa`) or an element id.
    pub fn resolve_anchor(&self, anchor: &str) -> Result<ElementId, ModelError> {
        if let Some(id) = self.model.layer(anchor) {
            return Ok(id.clone());
        }
        let id = ElementId::new(anchor);
        if self.model.contains(&id) {
            Ok(id)
        } else {
            Err(ModelError::UnknownAnchor(anchor.to_string()))
        }
    }

    /// Resolve the anchors of a conversion run.
    ///
    /// An explicit datatypes container wins over the datatypes parent;
    /// the parent defaults to `default_types_parent`.
    pub fn anchors(
        &self,
        root: &str,
        types: Option<&str>,
        types_parent: Option<&str>,
        default_types_parent: &str,
    ) -> Result<Anchors, ModelError> {
        let root = self.resolve_anchor(root)?;
        let datatypes = match types {
            Some(container) => DatatypesAnchor::Container(self.resolve_anchor(container)?),
            None => DatatypesAnchor::Parent(
                self.resolve_anchor(types_parent.unwrap_or(default_types_parent))?,
            ),
        };
        Ok(Anchors { root, datatypes })
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Write the model back to the file it came from.
    pub fn save(&mut self) -> Result<(), ModelError> {
        let path = self
            .path
            .clone()
            .ok_or(ModelError::NoPath)?;
        self.save_as(&path)
    }

    pub fn save_as(&mut self, path: &Path) -> Result<(), ModelError> {
        let bytes = format_for(path)?.write(&self.model)?;
        fs::write(path, bytes).map_err(|e| ModelError::io(path, e))?;
        info!(
            path = %path.display(),
            created = self.tracker.created_elements().count(),
            modified = self.tracker.modified_elements().count(),
            removed = self.tracker.removed_elements().count(),
            "model saved"
        );
        self.path = Some(path.to_path_buf());
        self.tracker.clear();
        Ok(())
    }
}

impl ModelAdapter for ModelHost {
    fn model(&self) -> &Model {
        &self.model
    }

    fn create_child(
        &mut self,
        parent: &ElementId,
        collection: Collection,
        kind: ElementKind,
        name: &str,
    ) -> Result<ElementId, ModelError> {
        self.tracker
            .create_child(&mut self.model, parent, collection, kind, name)
    }

    fn add_child(
        &mut self,
        parent: &ElementId,
        collection: Collection,
        element: Element,
    ) -> Result<ElementId, ModelError> {
        self.tracker
            .add_child(&mut self.model, parent, collection, element)
    }

    fn remove_element(&mut self, id: &ElementId) -> Vec<ElementId> {
        self.tracker.remove_element(&mut self.model, id)
    }

    fn set_name(&mut self, id: &ElementId, name: &str) -> bool {
        self.tracker.set_name(&mut self.model, id, name)
    }

    fn set_description(&mut self, id: &ElementId, text: &str) -> bool {
        self.tracker.set_description(&mut self.model, id, text)
    }

    fn set_property(&mut self, id: &ElementId, key: &str, value: PropertyValue) -> bool {
        self.tracker.set_property(&mut self.model, id, key, value)
    }

    fn remove_property(&mut self, id: &ElementId, key: &str) -> bool {
        self.tracker.remove_property(&mut self.model, id, key)
    }
}

impl std::fmt::Debug for ModelHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHost")
            .field("elements", &self.model.element_count())
            .field("layers", &self.model.layers.len())
            .field("path", &self.path)
            .finish()
    }
}

fn format_for(path: &Path) -> Result<Box<dyn super::format::ModelFormat>, ModelError> {
    detect_format(path).ok_or_else(|| {
        ModelError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("?")
                .to_string(),
        )
    })
}
