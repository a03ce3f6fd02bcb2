use tracing::{debug, info};

use super::follow_up;
use crate::bus::{CommandHandler, CommandResponse, Dispatch, ErrorKind, WmEvent};
use crate::commands::{AddMonitor, RemoveMonitor, SetFocusedWorkspace, UpdateMonitorScreen};
use crate::model::{Container, ContainerId, Monitor};

pub struct AddMonitorHandler;

impl CommandHandler for AddMonitorHandler {
    type Command = AddMonitor;

    fn handle(&self, cx: &mut Dispatch<'_>, AddMonitor { screen }: AddMonitor) -> CommandResponse {
        if let Some(existing) = cx.lookup().monitor_by_device(&screen.device_id) {
            debug!(%existing, device_id = %screen.device_id, "Monitor already modeled");
            return CommandResponse::Failure(ErrorKind::AlreadyExists);
        }
        let device_id = screen.device_id.clone();
        let monitor = match cx.tree_mut().add(None, Monitor::new(screen).into()) {
            Ok(id) => id,
            Err(err) => return CommandResponse::Failure(err.into()),
        };
        info!(%monitor, %device_id, "Added monitor");
        cx.raise_event(WmEvent::MonitorAdded { monitor, device_id });
        CommandResponse::Success(monitor)
    }
}

pub struct RemoveMonitorHandler;

impl RemoveMonitorHandler {
    fn remove(cx: &mut Dispatch<'_>, monitor: ContainerId) -> Result<ContainerId, ErrorKind> {
        let current = cx.tree().monitor(monitor).ok_or(ErrorKind::NotFound)?;
        let device_id = current.device_id().to_owned();
        let displayed = current.displayed_workspace;
        let heir = cx.lookup().monitors().find(|&m| m != monitor);
        let orphans: Vec<ContainerId> = cx.tree().children(monitor).collect();

        let mut events = Vec::new();
        if let Some(heir) = heir {
            for &workspace in &orphans {
                cx.tree_mut().move_to(workspace, Some(heir))?;
                events.push(WmEvent::WorkspaceMoved {
                    workspace,
                    from_monitor: monitor,
                    to_monitor: heir,
                });
            }
            // The heir keeps what it shows; otherwise it takes over ours.
            let mut shown = None;
            if let Some(heir_monitor) = cx.tree_mut().monitor_mut(heir)
                && heir_monitor.displayed_workspace.is_none()
            {
                shown = displayed.or(orphans.first().copied());
                heir_monitor.displayed_workspace = shown;
            }
            if let Some(workspace) = shown {
                events.push(WmEvent::WorkspaceActivated { workspace, monitor: heir });
            }
            if let Some(workspace) = displayed.filter(|&ws| shown != Some(ws)) {
                events.push(WmEvent::WorkspaceDeactivated { workspace, monitor });
            }
            info!(%monitor, %heir, moved = orphans.len(), "Rehomed workspaces of removed monitor");
        }

        let removed = cx.tree_mut().remove(monitor)?;
        cx.state.focus.forget(monitor);
        for (id, container) in removed.descendants {
            cx.state.focus.forget(id);
            if let Container::Window(window) = container {
                events.push(WmEvent::WindowUnmanaged { window: id, handle: window.handle });
            }
        }
        info!(%monitor, %device_id, "Removed monitor");
        events.push(WmEvent::MonitorRemoved { monitor, device_id });

        for event in events {
            cx.raise_event(event);
        }

        // Focus must not stay on a workspace that went off screen.
        if let Some(heir) = heir
            && let Some(focused) = cx.state.focus.focused_workspace
            && orphans.contains(&focused)
            && let Some(workspace) = cx.tree().monitor(heir).and_then(|m| m.displayed_workspace)
            && workspace != focused
        {
            let _ = follow_up(cx, SetFocusedWorkspace { workspace });
        }
        Ok(monitor)
    }
}

impl CommandHandler for RemoveMonitorHandler {
    type Command = RemoveMonitor;

    fn handle(&self, cx: &mut Dispatch<'_>, command: RemoveMonitor) -> CommandResponse {
        Self::remove(cx, command.monitor).into()
    }
}

pub struct UpdateMonitorScreenHandler;

impl CommandHandler for UpdateMonitorScreenHandler {
    type Command = UpdateMonitorScreen;

    fn handle(
        &self,
        cx: &mut Dispatch<'_>,
        UpdateMonitorScreen { monitor, screen }: UpdateMonitorScreen,
    ) -> CommandResponse {
        if cx.tree().monitor(monitor).is_none() {
            return CommandResponse::Failure(ErrorKind::NotFound);
        }
        if let Some(owner) = cx.lookup().monitor_by_device(&screen.device_id)
            && owner != monitor
        {
            debug!(%monitor, %owner, device_id = %screen.device_id, "Device belongs to another monitor");
            return CommandResponse::Failure(ErrorKind::AlreadyExists);
        }
        let Some(current) = cx.tree_mut().monitor_mut(monitor) else {
            return CommandResponse::Failure(ErrorKind::NotFound);
        };
        if current.screen == screen {
            return CommandResponse::Success(monitor);
        }
        if current.screen.device_id != screen.device_id {
            info!(%monitor, from = %current.screen.device_id, to = %screen.device_id, "Monitor device changed");
        }
        let frame = screen.frame;
        let resized = current.screen.frame != frame;
        current.screen = screen;
        if resized {
            debug!(%monitor, ?frame, "Working area changed");
            cx.raise_event(WmEvent::WorkingAreaResized { monitor, frame });
        }
        CommandResponse::Success(monitor)
    }
}
