use tracing::{debug, info, warn};

use super::follow_up;
use crate::bus::{CommandHandler, CommandResponse, Dispatch, ErrorKind, WmEvent};
use crate::commands::{AddWindow, DisplayWorkspace, FocusWindow, RemoveWindow, SetFocusedWorkspace};
use crate::model::ContainerId;

pub struct AddWindowHandler;

impl AddWindowHandler {
    fn add(cx: &mut Dispatch<'_>, AddWindow { window }: AddWindow) -> Result<ContainerId, ErrorKind> {
        let handle = window.handle;
        let lookup = cx.lookup();
        if let Some(existing) = lookup.find_window(handle) {
            debug!(%handle, %existing, "Window already managed");
            return Err(ErrorKind::AlreadyExists);
        }
        let Some(monitor) = lookup.resolve_monitor_for_unattached_window(&window) else {
            warn!(%handle, "No monitor to place window on");
            return Err(ErrorKind::ExternalResolutionFailure);
        };
        let workspace = lookup.target_workspace(monitor).ok_or_else(|| {
            warn!(%handle, %monitor, "Monitor has no workspace for window");
            ErrorKind::NotFound
        })?;

        let id = cx.tree_mut().add(Some(workspace), window.into())?;
        info!(window = %id, %handle, %workspace, "Managing window");
        cx.raise_event(WmEvent::WindowManaged { window: id, workspace, handle });
        Ok(id)
    }
}

impl CommandHandler for AddWindowHandler {
    type Command = AddWindow;

    fn handle(&self, cx: &mut Dispatch<'_>, command: AddWindow) -> CommandResponse {
        Self::add(cx, command).into()
    }
}

pub struct RemoveWindowHandler;

impl RemoveWindowHandler {
    fn remove(cx: &mut Dispatch<'_>, window: ContainerId) -> Result<ContainerId, ErrorKind> {
        let handle = cx.tree().window(window).ok_or(ErrorKind::NotFound)?.handle;
        let workspace = cx.tree().parent(window);

        cx.tree_mut().remove(window)?;
        let was_focused = cx.state.focus.focused_window == Some(window);
        cx.state.focus.forget(window);
        if let Some(workspace) = workspace
            && let Some(ws) = cx.tree_mut().workspace_mut(workspace)
            && ws.last_focused == Some(window)
        {
            ws.last_focused = None;
        }
        info!(%window, %handle, "Unmanaged window");
        cx.raise_event(WmEvent::WindowUnmanaged { window, handle });

        if was_focused && let Some(next) = workspace.and_then(|ws| cx.tree().last_child(ws)) {
            let _ = follow_up(cx, FocusWindow { window: next });
        }
        Ok(window)
    }
}

impl CommandHandler for RemoveWindowHandler {
    type Command = RemoveWindow;

    fn handle(&self, cx: &mut Dispatch<'_>, command: RemoveWindow) -> CommandResponse {
        Self::remove(cx, command.window).into()
    }
}

/// Focuses a window, bringing its workspace on screen and into focus first.
pub struct FocusWindowHandler;

impl FocusWindowHandler {
    fn focus(cx: &mut Dispatch<'_>, window: ContainerId) -> Result<ContainerId, ErrorKind> {
        let tree = cx.tree();
        tree.window(window).ok_or(ErrorKind::NotFound)?;
        let workspace = tree.parent(window).ok_or(ErrorKind::NotFound)?;
        let monitor = tree.parent(workspace).ok_or(ErrorKind::NotFound)?;
        let displayed = tree.monitor(monitor).and_then(|m| m.displayed_workspace);
        let already_focused = cx.state.focus.focused_window == Some(window);

        if displayed != Some(workspace) {
            let _ = follow_up(cx, DisplayWorkspace { workspace });
        }
        if cx.state.focus.focused_workspace != Some(workspace) {
            let _ = follow_up(cx, SetFocusedWorkspace { workspace });
        }

        cx.state.focus.focused_window = Some(window);
        if let Some(ws) = cx.tree_mut().workspace_mut(workspace) {
            ws.last_focused = Some(window);
        }
        if !already_focused {
            debug!(%window, %workspace, "Focus changed");
            cx.raise_event(WmEvent::FocusChanged { window, workspace });
        }
        Ok(window)
    }
}

impl CommandHandler for FocusWindowHandler {
    type Command = FocusWindow;

    fn handle(&self, cx: &mut Dispatch<'_>, command: FocusWindow) -> CommandResponse {
        Self::focus(cx, command.window).into()
    }
}
