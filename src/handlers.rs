//! The core command handlers and the subscribers that react to their events.
//!
//! Every handler follows the same shape: resolve and validate everything it
//! needs, perform its one tree mutation, then raise events. Rejections happen
//! before the tree is touched, so a [`CommandResponse::Failure`] always means
//! nothing changed.

mod monitor;
mod subscribers;
mod window;
mod workspace;

pub use monitor::{AddMonitorHandler, RemoveMonitorHandler, UpdateMonitorScreenHandler};
pub use subscribers::{DefaultWorkspaceSubscriber, FocusNewWindowSubscriber};
pub use window::{AddWindowHandler, FocusWindowHandler, RemoveWindowHandler};
pub use workspace::{
    AssignWorkspaceToMonitorHandler, CreateWorkspaceHandler, DisplayWorkspaceHandler,
    SetFocusedWorkspaceHandler,
};
use tracing::{debug, error};

use crate::bus::{Bus, BusError, Command, CommandResponse, Dispatch, ErrorKind, WmEventKind};
use crate::commands::*;
use crate::common::config::Config;

/// Registers every core handler, plus the subscribers enabled by `config`.
pub fn register_all(bus: &mut Bus, config: &Config) -> Result<(), BusError> {
    bus.register_command_handler(AddMonitorHandler)?;
    bus.register_command_handler(RemoveMonitorHandler)?;
    bus.register_command_handler(UpdateMonitorScreenHandler)?;
    bus.register_command_handler(CreateWorkspaceHandler)?;
    bus.register_command_handler(AssignWorkspaceToMonitorHandler)?;
    bus.register_command_handler(DisplayWorkspaceHandler)?;
    bus.register_command_handler(SetFocusedWorkspaceHandler)?;
    bus.register_command_handler(AddWindowHandler)?;
    bus.register_command_handler(RemoveWindowHandler)?;
    bus.register_command_handler(FocusWindowHandler)?;

    bus.subscribe(
        WmEventKind::MonitorAdded,
        DefaultWorkspaceSubscriber::new(config.workspaces.names.clone()),
    );
    if config.settings.focus_new_windows {
        bus.subscribe(WmEventKind::WindowManaged, FocusNewWindowSubscriber);
    }
    Ok(())
}

/// Checks that every core command can be routed.
pub fn verify_wiring(bus: &Bus) -> Result<(), BusError> {
    bus.require_handler::<AddMonitor>()?;
    bus.require_handler::<RemoveMonitor>()?;
    bus.require_handler::<UpdateMonitorScreen>()?;
    bus.require_handler::<CreateWorkspace>()?;
    bus.require_handler::<AssignWorkspaceToMonitor>()?;
    bus.require_handler::<DisplayWorkspace>()?;
    bus.require_handler::<SetFocusedWorkspace>()?;
    bus.require_handler::<AddWindow>()?;
    bus.require_handler::<RemoveWindow>()?;
    bus.require_handler::<FocusWindow>()?;
    Ok(())
}

/// Raises a command from inside a handler or subscriber.
///
/// Rejections are logged here, so callers that only care about success can
/// drop the response. A wiring error cannot happen on a context that passed
/// [`verify_wiring`]; should it happen anyway it is logged and reported as a
/// rejection.
pub(crate) fn follow_up<C: Command>(cx: &mut Dispatch<'_>, command: C) -> CommandResponse {
    let response = cx.raise_command(command).unwrap_or_else(|err| {
        error!("{err}");
        CommandResponse::Failure(ErrorKind::NotFound)
    });
    if let Some(kind) = response.error_kind() {
        debug!(command = C::NAME, %kind, "Nested command rejected");
    }
    response
}
