use tracing::{debug, info};

use crate::bus::{CommandHandler, CommandResponse, Dispatch, ErrorKind, WmEvent};
use crate::commands::{
    AssignWorkspaceToMonitor, CreateWorkspace, DisplayWorkspace, SetFocusedWorkspace,
};
use crate::model::{ContainerId, Workspace};

pub struct CreateWorkspaceHandler;

impl CommandHandler for CreateWorkspaceHandler {
    type Command = CreateWorkspace;

    fn handle(
        &self,
        cx: &mut Dispatch<'_>,
        CreateWorkspace { name, monitor }: CreateWorkspace,
    ) -> CommandResponse {
        if cx.tree().monitor(monitor).is_none() {
            return CommandResponse::Failure(ErrorKind::NotFound);
        }
        if cx.lookup().find_workspace(&name).is_some() {
            debug!(?name, "Workspace name already taken");
            return CommandResponse::Failure(ErrorKind::AlreadyExists);
        }
        let workspace = match cx.tree_mut().add(Some(monitor), Workspace::new(name.clone()).into())
        {
            Ok(id) => id,
            Err(err) => return CommandResponse::Failure(err.into()),
        };
        info!(%workspace, %monitor, ?name, "Created workspace");
        cx.raise_event(WmEvent::WorkspaceCreated { workspace, monitor, name });
        CommandResponse::Success(workspace)
    }
}

pub struct AssignWorkspaceToMonitorHandler;

impl AssignWorkspaceToMonitorHandler {
    fn assign(
        cx: &mut Dispatch<'_>,
        workspace: ContainerId,
        to: ContainerId,
    ) -> Result<ContainerId, ErrorKind> {
        cx.tree().workspace(workspace).ok_or(ErrorKind::NotFound)?;
        let from = cx.tree().parent(workspace).ok_or(ErrorKind::NotFound)?;
        let target = cx.tree().monitor(to).ok_or(ErrorKind::NotFound)?;
        if from == to {
            debug!(%workspace, monitor = %to, "Workspace already on monitor");
            return Ok(workspace);
        }
        let target_was_empty = target.displayed_workspace.is_none();

        cx.tree_mut().move_to(workspace, Some(to))?;

        let mut events = vec![WmEvent::WorkspaceMoved {
            workspace,
            from_monitor: from,
            to_monitor: to,
        }];
        let tree = cx.tree_mut();
        let next = tree.first_child(from);
        if let Some(source) = tree.monitor_mut(from)
            && source.displayed_workspace == Some(workspace)
        {
            source.displayed_workspace = next;
            if let Some(next) = next {
                events.push(WmEvent::WorkspaceActivated { workspace: next, monitor: from });
            }
            if !target_was_empty {
                events.push(WmEvent::WorkspaceDeactivated { workspace, monitor: from });
            }
        }
        if target_was_empty && let Some(target) = tree.monitor_mut(to) {
            target.displayed_workspace = Some(workspace);
            events.push(WmEvent::WorkspaceActivated { workspace, monitor: to });
        }
        info!(%workspace, %from, %to, "Moved workspace");

        for event in events {
            cx.raise_event(event);
        }
        Ok(workspace)
    }
}

impl CommandHandler for AssignWorkspaceToMonitorHandler {
    type Command = AssignWorkspaceToMonitor;

    fn handle(&self, cx: &mut Dispatch<'_>, command: AssignWorkspaceToMonitor) -> CommandResponse {
        Self::assign(cx, command.workspace, command.monitor).into()
    }
}

pub struct DisplayWorkspaceHandler;

impl CommandHandler for DisplayWorkspaceHandler {
    type Command = DisplayWorkspace;

    fn handle(
        &self,
        cx: &mut Dispatch<'_>,
        DisplayWorkspace { workspace }: DisplayWorkspace,
    ) -> CommandResponse {
        if cx.tree().workspace(workspace).is_none() {
            return CommandResponse::Failure(ErrorKind::NotFound);
        }
        let Some(monitor) = cx.tree().parent(workspace) else {
            return CommandResponse::Failure(ErrorKind::NotFound);
        };
        let Some(state) = cx.tree_mut().monitor_mut(monitor) else {
            return CommandResponse::Failure(ErrorKind::InvalidHierarchy);
        };
        let previous = state.displayed_workspace.replace(workspace);
        if previous == Some(workspace) {
            return CommandResponse::Success(workspace);
        }
        debug!(%workspace, %monitor, "Displaying workspace");
        if let Some(previous) = previous {
            cx.raise_event(WmEvent::WorkspaceDeactivated { workspace: previous, monitor });
        }
        cx.raise_event(WmEvent::WorkspaceActivated { workspace, monitor });
        CommandResponse::Success(workspace)
    }
}

pub struct SetFocusedWorkspaceHandler;

impl CommandHandler for SetFocusedWorkspaceHandler {
    type Command = SetFocusedWorkspace;

    fn handle(
        &self,
        cx: &mut Dispatch<'_>,
        SetFocusedWorkspace { workspace }: SetFocusedWorkspace,
    ) -> CommandResponse {
        let Some(last_focused) = cx.tree().workspace(workspace).map(|ws| ws.last_focused) else {
            return CommandResponse::Failure(ErrorKind::NotFound);
        };
        let focus = &mut cx.state.focus;
        if focus.focused_workspace == Some(workspace) {
            return CommandResponse::Success(workspace);
        }
        focus.focused_workspace = Some(workspace);

        // Keep the focused window inside the focused workspace.
        let tree = &cx.state.tree;
        let inside = |w: &ContainerId| tree.parent(*w) == Some(workspace);
        let focused_window =
            cx.state.focus.focused_window.filter(inside).or(last_focused.filter(inside));
        cx.state.focus.focused_window = focused_window;

        debug!(%workspace, ?focused_window, "Focused workspace");
        cx.raise_event(WmEvent::WorkspaceFocused { workspace });
        CommandResponse::Success(workspace)
    }
}
