use tracing::debug;

use super::datatype::ImplicitDatatype;
use super::promise::PromiseNamespace;
use crate::schema::{Binding, PackageDef};

/// A definition tree whose promise ids and bindings are filled in.
#[derive(Clone, Debug)]
pub struct ResolvedTree {
    pub root: PackageDef,
    pub namespace: PromiseNamespace,
}

impl ResolvedTree {
    /// Datatypes to synthesize, in order of first reference.
    pub fn implicit_datatypes(&self) -> Vec<ImplicitDatatype> {
        self.namespace
            .implicit()
            .map(ImplicitDatatype::from_promise)
            .collect()
    }
}

/// Resolve every promise id in the tree.
///
/// Declarations are collected over the whole tree first so that a
/// property may reference a class from a package visited later.
pub fn resolve(mut root: PackageDef) -> ResolvedTree {
    let mut namespace = PromiseNamespace::new();
    declare_package(&mut root, &mut namespace);
    bind_package(&mut root, &mut namespace);
    debug!(
        declared = namespace.declared().count(),
        referenced = namespace.referenced().count(),
        "resolved promise namespace"
    );
    ResolvedTree { root, namespace }
}

fn declare_package(package: &mut PackageDef, namespace: &mut PromiseNamespace) {
    for class in &mut package.classes {
        let id = class.promise_id_in(&package.prefix);
        namespace.declare(id.clone());
        class.promise_id = Some(id);
    }
    for enumeration in &mut package.enums {
        let id = enumeration.promise_id_in(&package.prefix);
        namespace.declare(id.clone());
        enumeration.promise_id = Some(id);
    }
    for sub in &mut package.packages {
        declare_package(sub, namespace);
    }
}

fn bind_package(package: &mut PackageDef, namespace: &mut PromiseNamespace) {
    for class in &mut package.classes {
        let class_id = class.promise_id_in(&package.prefix);
        for property in &mut class.properties {
            let target = property.ty.promise_id();
            let binding = if namespace.is_declared(&target) {
                Binding::Declared
            } else {
                debug!(%target, property = %property.name, "type reference is implicit");
                Binding::Implicit
            };
            namespace.reference(target);
            property.promise_id = Some(class_id.member(&property.name));
            property.binding = Some(binding);
        }
    }
    for sub in &mut package.packages {
        bind_package(sub, namespace);
    }
}
