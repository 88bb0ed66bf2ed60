//! YAML encoding of change-sets.
//!
//! ## YAML Structure
//!
//! ```yaml
//! - parent: !UUIDReference 550e8400-e29b-41d4-a716-446655440000
//!   sync:
//!     packages:
//!       - find:
//!           name: SamplePackage
//!         sync:
//!           classes:
//!             - promise_id: smp.Pet
//!               find:
//!                 name: Pet
//!               set:
//!                 description: A pet
//!               sync:
//!                 properties:
//!                   - promise_id: smp.Pet.name
//!                     find:
//!                       name: name
//!                     set:
//!                       type: !Promise datatype.string
//!                       min_card: !NewObject
//!                         _type: LiteralNumericValue
//!                         value: '1'
//! ```

use indexmap::IndexMap;
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value as Yaml};

use super::error::ChangeSetError;
use super::instruction::{ChangeSet, Instruction};
use super::value::{Attributes, Value};
use crate::base::PromiseId;
use crate::model::{Collection, ElementId};

const TAG_PROMISE: &str = "Promise";
const TAG_REFERENCE: &str = "UUIDReference";
const TAG_NEW_OBJECT: &str = "NewObject";
const TYPE_KEY: &str = "_type";

// ============================================================================
// DUMP
// ============================================================================

/// Serialize a change-set to YAML text.
pub fn dump(changeset: &ChangeSet) -> Result<String, ChangeSetError> {
    let doc = Yaml::Sequence(changeset.instructions.iter().map(encode_instruction).collect());
    serde_yaml::to_string(&doc).map_err(|e| ChangeSetError::yaml(e.to_string()))
}

fn encode_instruction(instruction: &Instruction) -> Yaml {
    let mut map = Mapping::new();
    if let Some(parent) = &instruction.parent {
        map.insert("parent".into(), tagged(TAG_REFERENCE, parent.as_str().into()));
    }
    if let Some(id) = &instruction.promise_id {
        map.insert("promise_id".into(), id.as_str().into());
    }
    if !instruction.find.is_empty() {
        map.insert("find".into(), encode_attributes(&instruction.find));
    }
    if !instruction.set.is_empty() {
        map.insert("set".into(), encode_attributes(&instruction.set));
    }
    if !instruction.sync.is_empty() {
        let mut sync = Mapping::new();
        for (collection, children) in &instruction.sync {
            sync.insert(
                collection.key().into(),
                Yaml::Sequence(children.iter().map(encode_instruction).collect()),
            );
        }
        map.insert("sync".into(), Yaml::Mapping(sync));
    }
    Yaml::Mapping(map)
}

fn encode_attributes(attributes: &Attributes) -> Yaml {
    Yaml::Mapping(
        attributes
            .iter()
            .map(|(k, v)| (Yaml::from(k.as_str()), encode_value(v)))
            .collect(),
    )
}

fn encode_value(value: &Value) -> Yaml {
    match value {
        Value::Text(s) => s.as_str().into(),
        Value::Bool(b) => Yaml::Bool(*b),
        Value::Integer(n) => Yaml::Number((*n).into()),
        Value::Promise(id) => tagged(TAG_PROMISE, id.as_str().into()),
        Value::Reference(id) => tagged(TAG_REFERENCE, id.as_str().into()),
        Value::NewObject {
            type_name,
            attributes,
        } => {
            let mut map = Mapping::new();
            map.insert(TYPE_KEY.into(), type_name.as_str().into());
            for (k, v) in attributes {
                map.insert(k.as_str().into(), encode_value(v));
            }
            tagged(TAG_NEW_OBJECT, Yaml::Mapping(map))
        }
        Value::List(items) => Yaml::Sequence(items.iter().map(encode_value).collect()),
    }
}

fn tagged(tag: &str, value: Yaml) -> Yaml {
    Yaml::Tagged(Box::new(TaggedValue {
        tag: Tag::new(tag),
        value,
    }))
}

// ============================================================================
// LOAD
// ============================================================================

/// Parse YAML text into a change-set.
pub fn load(text: &str) -> Result<ChangeSet, ChangeSetError> {
    let doc: Yaml = serde_yaml::from_str(text).map_err(|e| ChangeSetError::yaml(e.to_string()))?;
    let items = match doc {
        Yaml::Sequence(items) => items,
        Yaml::Null => Vec::new(),
        _ => return Err(ChangeSetError::invalid("document must be a sequence of instructions")),
    };
    let instructions = items
        .iter()
        .map(decode_instruction)
        .collect::<Result<_, _>>()?;
    Ok(ChangeSet::new(instructions))
}

fn decode_instruction(yaml: &Yaml) -> Result<Instruction, ChangeSetError> {
    let map = yaml
        .as_mapping()
        .ok_or_else(|| ChangeSetError::invalid("instruction must be a mapping"))?;
    let mut instruction = Instruction::default();

    for (key, value) in map {
        let key = key
            .as_str()
            .ok_or_else(|| ChangeSetError::invalid("instruction keys must be strings"))?;
        match key {
            "parent" => match decode_value(value)? {
                Value::Reference(id) => instruction.parent = Some(id),
                _ => return Err(ChangeSetError::invalid("'parent' must be a !UUIDReference")),
            },
            "promise_id" => {
                let id = value
                    .as_str()
                    .ok_or_else(|| ChangeSetError::invalid("'promise_id' must be a string"))?;
                instruction.promise_id = Some(PromiseId::new(id));
            }
            "find" => instruction.find = decode_attributes(value)?,
            "set" => instruction.set = decode_attributes(value)?,
            "sync" => instruction.sync = decode_sync(value)?,
            other => return Err(ChangeSetError::invalid(format!("unknown key '{other}'"))),
        }
    }
    Ok(instruction)
}

fn decode_sync(yaml: &Yaml) -> Result<IndexMap<Collection, Vec<Instruction>>, ChangeSetError> {
    let map = yaml
        .as_mapping()
        .ok_or_else(|| ChangeSetError::invalid("'sync' must be a mapping"))?;
    let mut sync = IndexMap::new();
    for (key, children) in map {
        let key = key.as_str().unwrap_or_default();
        let collection = Collection::from_key(key)
            .ok_or_else(|| ChangeSetError::UnknownCollection(key.to_string()))?;
        let children = children
            .as_sequence()
            .ok_or_else(|| ChangeSetError::invalid(format!("'sync.{key}' must be a sequence")))?
            .iter()
            .map(decode_instruction)
            .collect::<Result<Vec<_>, _>>()?;
        sync.insert(collection, children);
    }
    Ok(sync)
}

fn decode_attributes(yaml: &Yaml) -> Result<Attributes, ChangeSetError> {
    let map = yaml
        .as_mapping()
        .ok_or_else(|| ChangeSetError::invalid("attributes must be a mapping"))?;
    map.iter()
        .map(|(k, v)| {
            let key = k
                .as_str()
                .ok_or_else(|| ChangeSetError::invalid("attribute names must be strings"))?;
            Ok((key.to_string(), decode_value(v)?))
        })
        .collect()
}

fn decode_value(yaml: &Yaml) -> Result<Value, ChangeSetError> {
    Ok(match yaml {
        Yaml::String(s) => Value::Text(s.clone()),
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => Value::Integer(
            n.as_i64()
                .ok_or_else(|| ChangeSetError::invalid(format!("unsupported number {n}")))?,
        ),
        Yaml::Sequence(items) => {
            Value::List(items.iter().map(decode_value).collect::<Result<_, _>>()?)
        }
        Yaml::Tagged(tagged) => decode_tagged(tagged)?,
        Yaml::Null => return Err(ChangeSetError::invalid("null attribute value")),
        Yaml::Mapping(_) => {
            return Err(ChangeSetError::invalid("untagged mapping as attribute value"));
        }
    })
}

fn decode_tagged(tagged: &TaggedValue) -> Result<Value, ChangeSetError> {
    if tagged.tag == TAG_PROMISE || tagged.tag == TAG_REFERENCE {
        let text = tagged
            .value
            .as_str()
            .ok_or_else(|| ChangeSetError::invalid(format!("{} needs a string", tagged.tag)))?;
        return Ok(if tagged.tag == TAG_PROMISE {
            Value::Promise(PromiseId::new(text))
        } else {
            Value::Reference(ElementId::new(text))
        });
    }
    if tagged.tag == TAG_NEW_OBJECT {
        let mut attributes = decode_attributes(&tagged.value)?;
        let type_name = match attributes.shift_remove(TYPE_KEY) {
            Some(Value::Text(t)) => t,
            _ => return Err(ChangeSetError::invalid("!NewObject needs a '_type'")),
        };
        return Ok(Value::NewObject {
            type_name,
            attributes,
        });
    }
    Err(ChangeSetError::invalid(format!("unknown tag {}", tagged.tag)))
}
