use tracing::{debug, warn};

use super::follow_up;
use crate::bus::{Dispatch, EventSubscriber, WmEvent};
use crate::commands::{CreateWorkspace, DisplayWorkspace, FocusWindow, SetFocusedWorkspace};
use crate::model::Lookup;

/// Gives every new monitor a workspace of its own.
///
/// Names come from the configured list first; once that runs out, the
/// lowest unused number is used.
pub struct DefaultWorkspaceSubscriber {
    names: Vec<String>,
}

impl DefaultWorkspaceSubscriber {
    pub fn new(names: Vec<String>) -> Self { Self { names } }

    fn next_name(&self, lookup: Lookup<'_>) -> String {
        let unused = |name: &String| lookup.find_workspace(name).is_none();
        self.names
            .iter()
            .find(|name| unused(*name))
            .cloned()
            .unwrap_or_else(|| {
                (1..).map(|n: u32| n.to_string()).find(unused).unwrap_or_default()
            })
    }
}

impl EventSubscriber for DefaultWorkspaceSubscriber {
    fn handle(&self, cx: &mut Dispatch<'_>, event: &WmEvent) {
        let &WmEvent::MonitorAdded { monitor, .. } = event else {
            return;
        };
        if cx.tree().first_child(monitor).is_some() {
            return;
        }
        let name = self.next_name(cx.lookup());
        debug!(%monitor, ?name, "Creating default workspace");
        let Some(workspace) = follow_up(cx, CreateWorkspace { name, monitor }).affected_id() else {
            warn!(%monitor, "Could not create a default workspace");
            return;
        };
        let _ = follow_up(cx, DisplayWorkspace { workspace });
        if cx.state.focus.focused_workspace.is_none() {
            let _ = follow_up(cx, SetFocusedWorkspace { workspace });
        }
    }
}

/// Moves focus to windows as soon as they are managed.
pub struct FocusNewWindowSubscriber;

impl EventSubscriber for FocusNewWindowSubscriber {
    fn handle(&self, cx: &mut Dispatch<'_>, event: &WmEvent) {
        if let &WmEvent::WindowManaged { window, .. } = event {
            let _ = follow_up(cx, FocusWindow { window });
        }
    }
}
