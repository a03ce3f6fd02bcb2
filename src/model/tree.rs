use std::fmt;
use std::ops::Index;

use serde::Serialize;
use slotmap::SecondaryMap;
use thiserror::Error;

use super::container::{Container, ContainerBehavior, ContainerType, Monitor, Window, Workspace};
use super::registry::{ContainerId, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error(
        "A {child} cannot be nested under {}",
        .parent.map_or_else(|| "the root".to_string(), |p| format!("a {p}"))
    )]
    InvalidHierarchy {
        child: ContainerType,
        parent: Option<ContainerType>,
    },
    #[error("Container {0} is not in the tree")]
    NotFound(ContainerId),
}

/// Where a search looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Root level only.
    Roots,
    /// The given node and everything below it, preorder.
    Subtree(ContainerId),
    /// Every node, preorder, roots in order.
    All,
}

/// What [`ContainerTree::remove`] detached and discarded.
#[derive(Debug)]
pub struct Removed {
    pub id: ContainerId,
    pub container: Container,
    /// Everything that lived below the removed node, preorder.
    pub descendants: Vec<(ContainerId, Container)>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
struct Links {
    parent: Option<ContainerId>,
    prev_sibling: Option<ContainerId>,
    next_sibling: Option<ContainerId>,
    first_child: Option<ContainerId>,
    last_child: Option<ContainerId>,
}

/// Monitor → Workspace → Window ownership tree.
///
/// Every registered container is linked somewhere: either under a parent or
/// in the root list. Back-references are ids, so discarding a node can never
/// leave a dangling pointer behind; at worst an id stops resolving.
///
/// Structural operations validate everything up front and only then touch
/// links, so a failed call leaves the tree exactly as it was.
#[derive(Default)]
pub struct ContainerTree {
    registry: Registry,
    links: SecondaryMap<ContainerId, Links>,
    first_root: Option<ContainerId>,
    last_root: Option<ContainerId>,
}

impl ContainerTree {
    pub fn new() -> Self { Self::default() }

    pub fn registry(&self) -> &Registry { &self.registry }

    pub fn get(&self, id: ContainerId) -> Option<&Container> { self.registry.resolve(id) }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.registry.resolve_mut(id)
    }

    pub fn monitor(&self, id: ContainerId) -> Option<&Monitor> { self.get(id)?.as_monitor() }

    pub fn monitor_mut(&mut self, id: ContainerId) -> Option<&mut Monitor> {
        self.get_mut(id)?.as_monitor_mut()
    }

    pub fn workspace(&self, id: ContainerId) -> Option<&Workspace> { self.get(id)?.as_workspace() }

    pub fn workspace_mut(&mut self, id: ContainerId) -> Option<&mut Workspace> {
        self.get_mut(id)?.as_workspace_mut()
    }

    pub fn window(&self, id: ContainerId) -> Option<&Window> { self.get(id)?.as_window() }

    pub fn contains(&self, id: ContainerId) -> bool { self.registry.contains(id) }

    pub fn len(&self) -> usize { self.registry.len() }

    pub fn is_empty(&self) -> bool { self.registry.is_empty() }

    /// Attaches a new container at the back of `parent`'s children, or at the
    /// back of the root level when `parent` is `None`.
    pub fn add(
        &mut self,
        parent: Option<ContainerId>,
        container: Container,
    ) -> Result<ContainerId, TreeError> {
        self.check_nesting(container.container_type(), parent)?;
        let id = self.registry.register(container);
        self.links.insert(id, Links::default());
        self.link_back(id, parent);
        Ok(id)
    }

    /// Detaches `id` from its parent and discards it together with its whole
    /// subtree.
    pub fn remove(&mut self, id: ContainerId) -> Result<Removed, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::NotFound(id));
        }
        let subtree: Vec<ContainerId> = self.traverse_preorder(id).collect();
        self.unlink(id);

        let mut discarded = subtree.into_iter().filter_map(|node| {
            self.links.remove(node);
            self.registry.release(node).map(|c| (node, c))
        });
        let (_, container) = discarded.next().ok_or(TreeError::NotFound(id))?;
        let descendants = discarded.collect();
        Ok(Removed { id, container, descendants })
    }

    /// Moves `id` (and its subtree) to the back of `new_parent`'s children.
    pub fn move_to(
        &mut self,
        id: ContainerId,
        new_parent: Option<ContainerId>,
    ) -> Result<(), TreeError> {
        let kind = self.get(id).ok_or(TreeError::NotFound(id))?.container_type();
        self.check_nesting(kind, new_parent)?;
        debug_assert!(
            new_parent.is_none_or(|p| !self.ancestors(p).any(|a| a == id)),
            "nesting rules must rule out cycles"
        );
        self.unlink(id);
        self.link_back(id, new_parent);
        Ok(())
    }

    pub fn find(
        &self,
        scope: Scope,
        mut predicate: impl FnMut(&Container) -> bool,
    ) -> Option<ContainerId> {
        self.scope(scope).find(|&id| predicate(&self[id]))
    }

    /// Node ids covered by `scope`, in tree order.
    pub fn scope(&self, scope: Scope) -> Box<dyn Iterator<Item = ContainerId> + '_> {
        match scope {
            Scope::Roots => Box::new(self.roots()),
            Scope::Subtree(id) => Box::new(self.traverse_preorder(id)),
            Scope::All => Box::new(self.roots().flat_map(|root| self.traverse_preorder(root))),
        }
    }

    pub fn roots(&self) -> impl Iterator<Item = ContainerId> + '_ {
        Siblings { cur: self.first_root, tree: self }
    }

    /// Children of `id` in insertion order. Empty for unknown ids.
    pub fn children(&self, id: ContainerId) -> impl Iterator<Item = ContainerId> + '_ {
        Siblings {
            cur: self.links.get(id).and_then(|l| l.first_child),
            tree: self,
        }
    }

    pub fn parent(&self, id: ContainerId) -> Option<ContainerId> {
        self.links.get(id).and_then(|l| l.parent)
    }

    /// `id` followed by its parent, grandparent, and so on.
    pub fn ancestors(&self, id: ContainerId) -> impl Iterator<Item = ContainerId> + '_ {
        let mut next = self.contains(id).then_some(id);
        std::iter::from_fn(move || {
            let node = next?;
            next = self.parent(node);
            Some(node)
        })
    }

    pub fn traverse_preorder(&self, id: ContainerId) -> impl Iterator<Item = ContainerId> + '_ {
        Preorder {
            top: id,
            cur: self.contains(id).then_some(id),
            tree: self,
        }
    }

    pub fn first_child(&self, id: ContainerId) -> Option<ContainerId> {
        self.links.get(id).and_then(|l| l.first_child)
    }

    pub fn last_child(&self, id: ContainerId) -> Option<ContainerId> {
        self.links.get(id).and_then(|l| l.last_child)
    }

    fn next_sibling(&self, id: ContainerId) -> Option<ContainerId> {
        self.links.get(id).and_then(|l| l.next_sibling)
    }

    fn check_nesting(
        &self,
        child: ContainerType,
        parent: Option<ContainerId>,
    ) -> Result<(), TreeError> {
        let parent_type = match parent {
            Some(p) => Some(self.get(p).ok_or(TreeError::NotFound(p))?.container_type()),
            None => None,
        };
        if child.can_nest_under(parent_type) {
            Ok(())
        } else {
            Err(TreeError::InvalidHierarchy { child, parent: parent_type })
        }
    }

    fn ends_mut(
        &mut self,
        parent: Option<ContainerId>,
    ) -> (&mut Option<ContainerId>, &mut Option<ContainerId>) {
        match parent {
            Some(p) => {
                let links = &mut self.links[p];
                (&mut links.first_child, &mut links.last_child)
            }
            None => (&mut self.first_root, &mut self.last_root),
        }
    }

    fn link_back(&mut self, id: ContainerId, parent: Option<ContainerId>) {
        let prev = {
            let (first, last) = self.ends_mut(parent);
            first.get_or_insert(id);
            last.replace(id)
        };
        let links = &mut self.links[id];
        links.parent = parent;
        links.prev_sibling = prev;
        links.next_sibling = None;
        if let Some(prev) = prev {
            self.links[prev].next_sibling = Some(id);
        }
    }

    fn unlink(&mut self, id: ContainerId) {
        let Links { parent, prev_sibling, next_sibling, .. } = self.links[id];
        match prev_sibling {
            Some(prev) => self.links[prev].next_sibling = next_sibling,
            None => *self.ends_mut(parent).0 = next_sibling,
        }
        match next_sibling {
            Some(next) => self.links[next].prev_sibling = prev_sibling,
            None => *self.ends_mut(parent).1 = prev_sibling,
        }
        let links = &mut self.links[id];
        links.parent = None;
        links.prev_sibling = None;
        links.next_sibling = None;
    }
}

impl Index<ContainerId> for ContainerTree {
    type Output = Container;

    #[track_caller]
    fn index(&self, id: ContainerId) -> &Container {
        match self.get(id) {
            Some(container) => container,
            None => panic!("container {id} is not in the tree"),
        }
    }
}

/// Serialisable view of a subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: ContainerId,
    #[serde(rename = "type")]
    pub kind: ContainerType,
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl ContainerTree {
    pub fn snapshot(&self) -> Vec<NodeSnapshot> {
        self.roots().map(|root| self.snapshot_of(root)).collect()
    }

    fn snapshot_of(&self, id: ContainerId) -> NodeSnapshot {
        let container = &self[id];
        NodeSnapshot {
            id,
            kind: container.container_type(),
            label: container.label(),
            children: self.children(id).map(|child| self.snapshot_of(child)).collect(),
        }
    }

    /// ASCII outline of the whole tree, for debug logging.
    pub fn draw(&self) -> String {
        fn convert(node: NodeSnapshot) -> ascii_tree::Tree {
            let label = format!("{} {}", node.label, node.id);
            if node.kind == ContainerType::Window {
                ascii_tree::Tree::Leaf(vec![label])
            } else {
                ascii_tree::Tree::Node(label, node.children.into_iter().map(convert).collect())
            }
        }

        let root = ascii_tree::Tree::Node(
            "root".to_string(),
            self.snapshot().into_iter().map(convert).collect(),
        );
        let mut out = String::new();
        if ascii_tree::write_tree(&mut out, &root).is_err() {
            out.push_str("<unprintable tree>");
        }
        out
    }
}

impl fmt::Debug for ContainerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.draw()) }
}

struct Siblings<'a> {
    cur: Option<ContainerId>,
    tree: &'a ContainerTree,
}

impl Iterator for Siblings<'_> {
    type Item = ContainerId;

    fn next(&mut self) -> Option<ContainerId> {
        let id = self.cur?;
        self.cur = self.tree.next_sibling(id);
        Some(id)
    }
}

struct Preorder<'a> {
    top: ContainerId,
    cur: Option<ContainerId>,
    tree: &'a ContainerTree,
}

impl Iterator for Preorder<'_> {
    type Item = ContainerId;

    fn next(&mut self) -> Option<ContainerId> {
        let node = self.cur?;
        self.cur = self.tree.first_child(node).or_else(|| {
            self.tree
                .ancestors(node)
                .take_while(|&a| a != self.top)
                .find_map(|a| self.tree.next_sibling(a))
        });
        Some(node)
    }
}

#[cfg(test)]
impl ContainerTree {
    /// Panics if any structural invariant is broken.
    #[track_caller]
    pub(crate) fn assert_consistent(&self) {
        use crate::common::collections::HashSet;

        let mut seen = HashSet::default();
        for id in self.scope(Scope::All) {
            assert!(seen.insert(id), "{id} reachable twice");
        }
        assert_eq!(self.registry.len(), seen.len(), "unreachable containers in registry");

        for root in self.roots() {
            assert_eq!(None, self.parent(root));
            assert_eq!(ContainerType::Monitor, self[root].container_type(), "non-monitor root");
        }
        for id in self.registry.ids() {
            let parent = self.parent(id);
            let parent_type = parent.map(|p| self[p].container_type());
            assert!(self[id].container_type().can_nest_under(parent_type));
            let occurrences = match parent {
                Some(p) => self.children(p).filter(|&c| c == id).count(),
                None => self.roots().filter(|&c| c == id).count(),
            };
            assert_eq!(1, occurrences, "{id} listed {occurrences} times by its parent");

            let children: Vec<_> = self.children(id).collect();
            assert_eq!(children.first().copied(), self.first_child(id));
            assert_eq!(children.last().copied(), self.last_child(id));
            for pair in children.windows(2) {
                assert_eq!(Some(pair[0]), self.links[pair[1]].prev_sibling);
            }
        }
    }
}
