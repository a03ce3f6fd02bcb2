use std::fmt;

use slotmap::{Key, SlotMap, new_key_type};

use super::container::Container;

new_key_type! {
    /// Identifies a node in the container tree.
    ///
    /// Ids are generational: once a node is released its id never resolves
    /// again, even if the slot is later reused for another node.
    pub struct ContainerId;
}

static_assertions::assert_impl_all!(ContainerId: Copy, Send, Sync);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.data().as_ffi())
    }
}

/// Owns every live container and hands out their ids.
#[derive(Default)]
pub struct Registry {
    containers: SlotMap<ContainerId, Container>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, container: Container) -> ContainerId {
        self.containers.insert(container)
    }

    /// Returns `None` for ids that were never issued or have been released.
    pub fn resolve(&self, id: ContainerId) -> Option<&Container> { self.containers.get(id) }

    pub fn resolve_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.get_mut(id)
    }

    pub fn release(&mut self, id: ContainerId) -> Option<Container> { self.containers.remove(id) }

    pub fn contains(&self, id: ContainerId) -> bool { self.containers.contains_key(id) }

    pub fn len(&self) -> usize { self.containers.len() }

    pub fn is_empty(&self) -> bool { self.containers.is_empty() }

    pub fn ids(&self) -> impl Iterator<Item = ContainerId> + '_ { self.containers.keys() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::container::Workspace;

    #[test]
    fn released_ids_stop_resolving() {
        let mut registry = Registry::new();
        let id = registry.register(Workspace::new("1").into());
        assert!(registry.resolve(id).is_some());

        assert!(registry.release(id).is_some());
        assert!(registry.resolve(id).is_none());
        assert!(registry.release(id).is_none());
    }

    #[test]
    fn slot_reuse_issues_a_fresh_id() {
        let mut registry = Registry::new();
        let first = registry.register(Workspace::new("1").into());
        registry.release(first);
        let second = registry.register(Workspace::new("2").into());

        assert_ne!(first, second);
        assert!(registry.resolve(first).is_none());
        assert_eq!(1, registry.len());
    }

    #[test]
    fn default_id_never_resolves() {
        let mut registry = Registry::new();
        registry.register(Workspace::new("1").into());
        assert!(registry.resolve(ContainerId::default()).is_none());
    }
}
