//! Declarative application of a change-set to a live model.
//!
//! Each instruction is find-or-create: its `find` attributes select an
//! existing child of the parent collection, or become the attributes of a
//! new one. `set` is then applied value by value, and only values that
//! differ count as a modification, so applying the same change-set twice
//! leaves the second run without changes.
//!
//! Promise references are resolved against the ids registered so far.
//! Unresolved promises in `set` are deferred until the whole change-set
//! has been walked; instructions whose `find` needs an unresolved promise
//! are retried after the others.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use super::error::ChangeSetError;
use super::instruction::{ChangeSet, Instruction};
use super::value::{Attributes, Value};
use crate::base::PromiseId;
use crate::base::constants::LITERAL_NUMERIC_VALUE;
use crate::model::{Collection, Element, ElementId, ElementKind, ModelAdapter, PropertyValue};

/// Counts of what an application changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub created: usize,
    pub modified: usize,
}

impl ApplyReport {
    pub fn is_unchanged(&self) -> bool {
        self.created == 0 && self.modified == 0
    }
}

/// Apply `changeset` to the model behind `adapter`.
pub fn apply_changeset<A: ModelAdapter>(
    adapter: &mut A,
    changeset: &ChangeSet,
) -> Result<ApplyReport, ChangeSetError> {
    let mut applier = Applier {
        adapter,
        promises: IndexMap::new(),
        deferred: Vec::new(),
        pending: Vec::new(),
        created: IndexSet::new(),
        modified: IndexSet::new(),
    };

    for (index, instruction) in changeset.instructions.iter().enumerate() {
        let parent = instruction
            .parent
            .clone()
            .ok_or(ChangeSetError::MissingParent { index })?;
        if applier.adapter.element(&parent).is_none() {
            return Err(ChangeSetError::UnknownParent(parent));
        }
        applier.apply_body(&parent, instruction)?;
    }
    applier.retry_pending()?;
    applier.resolve_deferred()?;

    let report = ApplyReport {
        created: applier.created.len(),
        modified: applier
            .modified
            .iter()
            .filter(|id| !applier.created.contains(*id))
            .count(),
    };
    info!(created = report.created, modified = report.modified, "change-set applied");
    Ok(report)
}

/// A `set` value waiting for a promise.
struct Deferred {
    element: ElementId,
    key: String,
    value: Value,
}

struct Applier<'a, A> {
    adapter: &'a mut A,
    /// Promise id -> element it was registered for.
    promises: IndexMap<PromiseId, ElementId>,
    deferred: Vec<Deferred>,
    /// Nested instructions whose `find` was not resolvable yet.
    pending: Vec<(ElementId, Collection, Instruction)>,
    created: IndexSet<ElementId>,
    modified: IndexSet<ElementId>,
}

impl<A: ModelAdapter> Applier<'_, A> {
    /// `set`, promise registration and `sync` on an already located element.
    fn apply_body(&mut self, id: &ElementId, instruction: &Instruction) -> Result<(), ChangeSetError> {
        for (key, value) in &instruction.set {
            self.set_attribute(id, key, value)?;
        }
        if let Some(promise) = &instruction.promise_id {
            debug!(%promise, %id, "promise declared");
            self.promises.insert(promise.clone(), id.clone());
        }
        for (collection, children) in &instruction.sync {
            for child in children {
                self.apply_nested(id, *collection, child)?;
            }
        }
        Ok(())
    }

    fn apply_nested(
        &mut self,
        parent: &ElementId,
        collection: Collection,
        instruction: &Instruction,
    ) -> Result<(), ChangeSetError> {
        let Some(find) = self.resolve_attributes(&instruction.find) else {
            debug!(%parent, %collection, "find depends on an undeclared promise, retrying later");
            self.pending
                .push((parent.clone(), collection, instruction.clone()));
            return Ok(());
        };

        let id = match self.find_match(parent, collection, &find) {
            Some(id) => id,
            None => self.create(parent, collection, instruction, find)?,
        };
        self.apply_body(&id, instruction)
    }

    fn find_match(
        &self,
        parent: &ElementId,
        collection: Collection,
        find: &IndexMap<String, PropertyValue>,
    ) -> Option<ElementId> {
        self.adapter
            .model()
            .children(parent, collection)
            .find(|el| find.iter().all(|(k, v)| attribute_matches(el, k, v)))
            .map(|el| el.id.clone())
    }

    fn create(
        &mut self,
        parent: &ElementId,
        collection: Collection,
        instruction: &Instruction,
        find: IndexMap<String, PropertyValue>,
    ) -> Result<ElementId, ChangeSetError> {
        let type_name = instruction
            .find
            .get("_type")
            .or_else(|| instruction.set.get("_type"))
            .and_then(Value::as_text);
        let kind = match type_name {
            Some(name) => name.parse::<ElementKind>()?,
            None => collection
                .default_kind()
                .ok_or_else(|| ChangeSetError::MissingType {
                    collection: collection.key().to_string(),
                })?,
        };

        let mut element = Element::new(ElementId::generate(), kind);
        for (key, value) in find {
            match (key.as_str(), value) {
                ("_type", _) => {}
                ("name", PropertyValue::String(name)) => element.name = Some(name),
                ("description", PropertyValue::String(text)) => element.description = text,
                (_, value) => {
                    element.properties.insert(key, value);
                }
            }
        }

        let id = self.adapter.add_child(parent, collection, element)?;
        self.created.insert(id.clone());
        Ok(id)
    }

    fn set_attribute(&mut self, id: &ElementId, key: &str, value: &Value) -> Result<(), ChangeSetError> {
        if key == "_type" {
            return Ok(());
        }
        let Some(resolved) = self.resolve(value) else {
            self.deferred.push(Deferred {
                element: id.clone(),
                key: key.to_string(),
                value: value.clone(),
            });
            return Ok(());
        };

        let changed = match (key, resolved) {
            ("name", PropertyValue::String(name)) => self.adapter.set_name(id, &name),
            ("description", PropertyValue::String(text)) => self.adapter.set_description(id, &text),
            (_, value) => self.adapter.set_property(id, key, value),
        };
        if changed {
            self.modified.insert(id.clone());
        }
        Ok(())
    }

    /// Re-run postponed instructions while new promises keep appearing.
    fn retry_pending(&mut self) -> Result<(), ChangeSetError> {
        while !self.pending.is_empty() {
            let declared = self.promises.len();
            let pending = std::mem::take(&mut self.pending);
            for (parent, collection, instruction) in &pending {
                self.apply_nested(parent, *collection, instruction)?;
            }
            if !self.pending.is_empty() && self.promises.len() == declared {
                let missing = self
                    .pending
                    .iter()
                    .flat_map(|(_, _, i)| i.find.values().flat_map(Value::promises))
                    .find(|p| !self.promises.contains_key(*p))
                    .cloned();
                return Err(match missing {
                    Some(promise) => ChangeSetError::UnresolvedPromise(promise),
                    None => ChangeSetError::invalid("instructions could not be resolved"),
                });
            }
        }
        Ok(())
    }

    fn resolve_deferred(&mut self) -> Result<(), ChangeSetError> {
        for deferred in std::mem::take(&mut self.deferred) {
            if let Some(promise) = deferred
                .value
                .promises()
                .into_iter()
                .find(|p| !self.promises.contains_key(*p))
            {
                return Err(ChangeSetError::UnresolvedPromise(promise.clone()));
            }
            self.set_attribute(&deferred.element, &deferred.key, &deferred.value)?;
        }
        Ok(())
    }

    fn resolve_attributes(&self, attributes: &Attributes) -> Option<IndexMap<String, PropertyValue>> {
        attributes
            .iter()
            .map(|(k, v)| Some((k.clone(), self.resolve(v)?)))
            .collect()
    }

    /// Convert a change-set value into a stored value; `None` while a
    /// promise inside it is undeclared.
    fn resolve(&self, value: &Value) -> Option<PropertyValue> {
        Some(match value {
            Value::Text(s) => PropertyValue::String(s.clone()),
            Value::Bool(b) => PropertyValue::Boolean(*b),
            Value::Integer(n) => PropertyValue::Integer(*n),
            Value::Promise(id) => PropertyValue::Reference(self.promises.get(id)?.clone()),
            Value::Reference(id) => PropertyValue::Reference(id.clone()),
            Value::NewObject {
                type_name,
                attributes,
            } if type_name == LITERAL_NUMERIC_VALUE => {
                let literal = attributes.get("value").map_or_else(String::new, |v| match v {
                    Value::Integer(n) => n.to_string(),
                    Value::Text(s) => s.clone(),
                    _ => String::new(),
                });
                PropertyValue::Literal(literal)
            }
            Value::NewObject { attributes, .. } => PropertyValue::List(
                attributes
                    .values()
                    .map(|v| self.resolve(v))
                    .collect::<Option<_>>()?,
            ),
            Value::List(items) => PropertyValue::List(
                items.iter().map(|v| self.resolve(v)).collect::<Option<_>>()?,
            ),
        })
    }
}

fn attribute_matches(element: &Element, key: &str, value: &PropertyValue) -> bool {
    match (key, value) {
        ("name", PropertyValue::String(name)) => element.name.as_deref() == Some(name.as_str()),
        ("description", PropertyValue::String(text)) => element.description == *text,
        ("_type", PropertyValue::String(kind)) => element.kind.as_str() == kind,
        _ => element.property(key) == Some(value),
    }
}
