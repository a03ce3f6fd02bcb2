use tracing::{debug, warn};

use super::container::{ContainerBehavior, ContainerType, Monitor, Window};
use super::registry::ContainerId;
use super::tree::{ContainerTree, Scope};
use crate::sys::screen::ScreenInterop;
use crate::sys::window::WindowHandle;

/// Read-only queries over the container tree.
#[derive(Clone, Copy)]
pub struct Lookup<'a> {
    tree: &'a ContainerTree,
    screens: &'a dyn ScreenInterop,
}

impl<'a> Lookup<'a> {
    pub fn new(tree: &'a ContainerTree, screens: &'a dyn ScreenInterop) -> Self {
        Self { tree, screens }
    }

    /// First monitor in tree order matching `predicate`.
    ///
    /// Only the root level is searched; monitors are never nested.
    pub fn find_monitor(&self, predicate: impl Fn(&Monitor) -> bool) -> Option<ContainerId> {
        self.tree.find(Scope::Roots, |c| c.as_monitor().is_some_and(&predicate))
    }

    pub fn first_monitor(&self) -> Option<ContainerId> { self.find_monitor(|_| true) }

    pub fn monitors(&self) -> impl Iterator<Item = ContainerId> + 'a {
        let tree = self.tree;
        tree.roots().filter(move |&id| tree[id].as_monitor().is_some())
    }

    pub fn monitor_by_device(&self, device_id: &str) -> Option<ContainerId> {
        self.find_monitor(|m| m.device_id() == device_id)
    }

    /// Picks the monitor a window that is not yet in the tree belongs to.
    ///
    /// Asks the platform which screen holds the window and matches it by
    /// device id. Anything unexpected (query failure, a screen we have not
    /// modeled yet) falls back to the first monitor, so this only returns
    /// `None` when there are no monitors at all.
    pub fn resolve_monitor_for_unattached_window(&self, window: &Window) -> Option<ContainerId> {
        match self.screens.screen_containing(window.handle) {
            Ok(screen) => {
                if let Some(monitor) = self.monitor_by_device(&screen.device_id) {
                    return Some(monitor);
                }
                debug!(
                    handle = %window.handle,
                    device_id = %screen.device_id,
                    "Window is on a screen with no monitor; using first monitor"
                );
            }
            Err(err) => {
                warn!(handle = %window.handle, "Could not resolve screen for window: {err}");
            }
        }
        self.first_monitor()
    }

    /// Nearest ancestor (or self) of the given type.
    pub fn ancestor_of_type(&self, id: ContainerId, kind: ContainerType) -> Option<ContainerId> {
        self.tree.ancestors(id).find(|&a| self.tree[a].container_type() == kind)
    }

    pub fn monitor_of(&self, id: ContainerId) -> Option<ContainerId> {
        self.ancestor_of_type(id, ContainerType::Monitor)
    }

    pub fn workspace_of(&self, id: ContainerId) -> Option<ContainerId> {
        self.ancestor_of_type(id, ContainerType::Workspace)
    }

    pub fn workspaces_of(&self, monitor: ContainerId) -> impl Iterator<Item = ContainerId> + 'a {
        self.tree.children(monitor)
    }

    pub fn find_window(&self, handle: WindowHandle) -> Option<ContainerId> {
        self.tree.find(Scope::All, |c| c.as_window().is_some_and(|w| w.handle == handle))
    }

    pub fn find_workspace(&self, name: &str) -> Option<ContainerId> {
        self.tree.find(Scope::All, |c| c.as_workspace().is_some_and(|w| w.name == name))
    }

    /// The workspace a new window on `monitor` should land in.
    pub fn target_workspace(&self, monitor: ContainerId) -> Option<ContainerId> {
        self.tree
            .get(monitor)
            .and_then(|c| c.as_monitor())
            .and_then(|m| m.displayed_workspace)
            .filter(|&ws| self.tree.parent(ws) == Some(monitor))
            .or_else(|| self.tree.first_child(monitor))
    }
}
