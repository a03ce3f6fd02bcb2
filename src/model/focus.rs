use super::registry::ContainerId;

/// Global focus bookkeeping.
///
/// Stores ids only; a stale id here is harmless but handlers clear it when the
/// node it names is discarded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    pub focused_workspace: Option<ContainerId>,
    pub focused_window: Option<ContainerId>,
}

impl FocusState {
    /// Drops every reference to `id`. Returns whether anything changed.
    pub fn forget(&mut self, id: ContainerId) -> bool {
        let mut changed = false;
        if self.focused_workspace == Some(id) {
            self.focused_workspace = None;
            changed = true;
        }
        if self.focused_window == Some(id) {
            self.focused_window = None;
            changed = true;
        }
        changed
    }
}
