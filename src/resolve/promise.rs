use indexmap::IndexSet;

use crate::base::PromiseId;

/// Declared and referenced promise ids, in order of first sight.
///
/// Re-declaring or re-referencing an id is a no-op.
#[derive(Clone, Debug, Default)]
pub struct PromiseNamespace {
    declared: IndexSet<PromiseId>,
    referenced: IndexSet<PromiseId>,
}

impl PromiseNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a class or enum declaration. Returns `false` if it was
    /// already known.
    pub fn declare(&mut self, id: PromiseId) -> bool {
        self.declared.insert(id)
    }

    /// Record a type reference made by a property.
    pub fn reference(&mut self, id: PromiseId) -> bool {
        self.referenced.insert(id)
    }

    pub fn is_declared(&self, id: &PromiseId) -> bool {
        self.declared.contains(id)
    }

    pub fn declared(&self) -> impl Iterator<Item = &PromiseId> {
        self.declared.iter()
    }

    pub fn referenced(&self) -> impl Iterator<Item = &PromiseId> {
        self.referenced.iter()
    }

    /// `referenced - declared`, in order of first reference.
    pub fn implicit(&self) -> impl Iterator<Item = &PromiseId> {
        self.referenced
            .iter()
            .filter(|id| !self.declared.contains(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_idempotent() {
        let mut ns = PromiseNamespace::new();
        assert!(ns.declare("p.A".into()));
        assert!(!ns.declare("p.A".into()));
        assert!(ns.reference("datatype.u8".into()));
        assert!(!ns.reference("datatype.u8".into()));
        assert_eq!(ns.declared().count(), 1);
        assert_eq!(ns.referenced().count(), 1);
    }

    #[test]
    fn test_implicit_keeps_first_reference_order() {
        let mut ns = PromiseNamespace::new();
        ns.reference("datatype.z".into());
        ns.reference("p.A".into());
        ns.reference("datatype.a".into());
        ns.declare("p.A".into());

        let implicit: Vec<_> = ns.implicit().map(PromiseId::as_str).collect();
        assert_eq!(implicit, ["datatype.z", "datatype.a"]);
    }
}
