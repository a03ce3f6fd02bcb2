use serde::Serialize;
use strum_macros::{Display, EnumDiscriminants, EnumIter};

use super::Dispatch;
use crate::model::{ContainerId, ContainerType};
use crate::sys::geometry::Rect;
use crate::sys::window::WindowHandle;

/// Announcement of a completed mutation.
///
/// Payloads carry ids and plain values only, never references into the tree.
#[derive(Debug, Clone, PartialEq, Serialize, EnumDiscriminants)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum_discriminants(name(WmEventKind), derive(Hash, EnumIter, Display))]
pub enum WmEvent {
    MonitorAdded {
        monitor: ContainerId,
        device_id: String,
    },
    MonitorRemoved {
        monitor: ContainerId,
        device_id: String,
    },
    WorkingAreaResized {
        monitor: ContainerId,
        frame: Rect,
    },
    WorkspaceCreated {
        workspace: ContainerId,
        monitor: ContainerId,
        name: String,
    },
    WorkspaceMoved {
        workspace: ContainerId,
        from_monitor: ContainerId,
        to_monitor: ContainerId,
    },
    WorkspaceActivated {
        workspace: ContainerId,
        monitor: ContainerId,
    },
    WorkspaceDeactivated {
        workspace: ContainerId,
        monitor: ContainerId,
    },
    WorkspaceFocused {
        workspace: ContainerId,
    },
    WindowManaged {
        window: ContainerId,
        workspace: ContainerId,
        handle: WindowHandle,
    },
    WindowUnmanaged {
        window: ContainerId,
        handle: WindowHandle,
    },
    FocusChanged {
        window: ContainerId,
        workspace: ContainerId,
    },
}

impl WmEvent {
    pub fn kind(&self) -> WmEventKind { WmEventKind::from(self) }

    /// The node this event is about.
    pub fn subject(&self) -> (ContainerId, ContainerType) {
        use WmEvent::*;
        match *self {
            MonitorAdded { monitor, .. }
            | MonitorRemoved { monitor, .. }
            | WorkingAreaResized { monitor, .. } => (monitor, ContainerType::Monitor),
            WorkspaceCreated { workspace, .. }
            | WorkspaceMoved { workspace, .. }
            | WorkspaceActivated { workspace, .. }
            | WorkspaceDeactivated { workspace, .. }
            | WorkspaceFocused { workspace } => (workspace, ContainerType::Workspace),
            WindowManaged { window, .. }
            | WindowUnmanaged { window, .. }
            | FocusChanged { window, .. } => (window, ContainerType::Window),
        }
    }
}

pub trait EventSubscriber: 'static {
    fn handle(&self, cx: &mut Dispatch<'_>, event: &WmEvent);
}

impl<F> EventSubscriber for F
where F: Fn(&mut Dispatch<'_>, &WmEvent) + 'static
{
    fn handle(&self, cx: &mut Dispatch<'_>, event: &WmEvent) { self(cx, event) }
}
