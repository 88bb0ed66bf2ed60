use indexmap::IndexMap;

use super::value::{Attributes, Value};
use crate::base::PromiseId;
use crate::model::{Collection, ElementId};

/// One find-or-create step, with nested steps per child collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Instruction {
    /// Target location; only set on top-level instructions.
    pub parent: Option<ElementId>,
    /// Symbolic name the found or created element is registered under.
    pub promise_id: Option<PromiseId>,
    pub find: Attributes,
    pub set: Attributes,
    pub sync: IndexMap<Collection, Vec<Instruction>>,
}

impl Instruction {
    /// A top-level instruction addressed to `parent`.
    pub fn at(parent: ElementId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// A nested instruction matching on `name`.
    pub fn find_by_name(name: &str) -> Self {
        Self::default().with_find("name", name)
    }

    pub fn with_promise(mut self, id: PromiseId) -> Self {
        self.promise_id = Some(id);
        self
    }

    pub fn with_find(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.find.insert(key.to_string(), value.into());
        self
    }

    pub fn with_set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set.insert(key.to_string(), value.into());
        self
    }

    /// Append nested instructions; an empty list leaves `sync` untouched.
    pub fn with_sync(mut self, collection: Collection, children: Vec<Instruction>) -> Self {
        if !children.is_empty() {
            self.sync.entry(collection).or_default().extend(children);
        }
        self
    }

    /// This instruction and all nested ones, depth first.
    pub fn walk(&self) -> Vec<&Instruction> {
        let mut out = vec![self];
        for children in self.sync.values() {
            for child in children {
                out.extend(child.walk());
            }
        }
        out
    }
}

/// An ordered list of top-level instructions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSet {
    pub instructions: Vec<Instruction>,
}

impl ChangeSet {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Every instruction at any depth, depth first.
    pub fn iter_all(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().flat_map(Instruction::walk)
    }

    /// Every promise id declared by some instruction.
    pub fn declared_promises(&self) -> Vec<&PromiseId> {
        self.iter_all()
            .filter_map(|i| i.promise_id.as_ref())
            .collect()
    }
}
