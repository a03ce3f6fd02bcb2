//! Commands understood by the core. Each one has exactly one handler in
//! [`crate::handlers`].

use crate::bus::Command;
use crate::model::{ContainerId, Window};
use crate::sys::screen::ScreenDescriptor;

macro_rules! commands {
    ($($ty:ident => $name:literal),* $(,)?) => {
        $(
            impl Command for $ty {
                const NAME: &'static str = $name;
            }
        )*
    };
}

commands! {
    AddMonitor => "add_monitor",
    RemoveMonitor => "remove_monitor",
    UpdateMonitorScreen => "update_monitor_screen",
    CreateWorkspace => "create_workspace",
    AssignWorkspaceToMonitor => "assign_workspace_to_monitor",
    DisplayWorkspace => "display_workspace",
    SetFocusedWorkspace => "set_focused_workspace",
    AddWindow => "add_window",
    RemoveWindow => "remove_window",
    FocusWindow => "focus_window",
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddMonitor {
    pub screen: ScreenDescriptor,
}

/// Orphaned workspaces move to the first remaining monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoveMonitor {
    pub monitor: ContainerId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMonitorScreen {
    pub monitor: ContainerId,
    pub screen: ScreenDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateWorkspace {
    pub name: String,
    pub monitor: ContainerId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignWorkspaceToMonitor {
    pub workspace: ContainerId,
    pub monitor: ContainerId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayWorkspace {
    pub workspace: ContainerId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetFocusedWorkspace {
    pub workspace: ContainerId,
}

/// `window` is not in the tree yet; the handler decides where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct AddWindow {
    pub window: Window,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoveWindow {
    pub window: ContainerId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusWindow {
    pub window: ContainerId,
}
