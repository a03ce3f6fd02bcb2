use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use super::geometry::Rect;
use super::window::WindowHandle;
use crate::common::collections::HashMap;

/// A physical screen as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenDescriptor {
    /// Stable device identity (a display UUID, `\\.\DISPLAY1`, an output name).
    pub device_id: String,
    pub frame: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ScreenDescriptor {
    pub fn new(device_id: impl Into<String>, frame: Rect) -> Self {
        Self {
            device_id: device_id.into(),
            frame,
            name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteropError {
    #[error("Window {0} is not known to the platform")]
    UnknownWindow(WindowHandle),
    #[error("Window {0} does not intersect any screen")]
    NoScreenForWindow(WindowHandle),
    #[error("Screen query failed: {0}")]
    QueryFailed(String),
}

/// Screen queries the window manager core is allowed to make.
///
/// Implementations are expected to answer promptly; the core calls these
/// before it starts mutating the tree, never in the middle of a mutation.
pub trait ScreenInterop {
    fn screen_containing(&self, handle: WindowHandle) -> Result<ScreenDescriptor, InteropError>;

    fn enumerate_screens(&self) -> Vec<ScreenDescriptor>;
}

/// In-memory platform used by the headless driver and by tests.
///
/// Cloning shares the same state, so a producer thread can keep feeding screen
/// and window geometry while the reactor queries it.
#[derive(Clone, Default, Debug)]
pub struct VirtualScreens(Arc<RwLock<VirtualState>>);

#[derive(Default, Debug)]
struct VirtualState {
    screens: Vec<ScreenDescriptor>,
    windows: HashMap<WindowHandle, Rect>,
}

impl VirtualScreens {
    pub fn new(screens: Vec<ScreenDescriptor>) -> Self {
        let this = Self::default();
        this.set_screens(screens);
        this
    }

    pub fn set_screens(&self, screens: Vec<ScreenDescriptor>) {
        self.0.write().screens = screens;
    }

    pub fn set_window_frame(&self, handle: WindowHandle, frame: Rect) {
        self.0.write().windows.insert(handle, frame);
    }

    pub fn forget_window(&self, handle: WindowHandle) {
        self.0.write().windows.remove(&handle);
    }
}

impl ScreenInterop for VirtualScreens {
    fn screen_containing(&self, handle: WindowHandle) -> Result<ScreenDescriptor, InteropError> {
        let state = self.0.read();
        let frame = *state.windows.get(&handle).ok_or(InteropError::UnknownWindow(handle))?;

        let center = frame.mid();
        if let Some(screen) = state.screens.iter().find(|s| s.frame.contains(center)) {
            trace!(%handle, device_id = %screen.device_id, "window center is on screen");
            return Ok(screen.clone());
        }

        // Center is off every screen; take the one the window overlaps most.
        state
            .screens
            .iter()
            .map(|s| (s, s.frame.intersection(&frame).area()))
            .filter(|(_, area)| *area > 0)
            .max_by_key(|(_, area)| *area)
            .map(|(s, _)| s.clone())
            .ok_or(InteropError::NoScreenForWindow(handle))
    }

    fn enumerate_screens(&self) -> Vec<ScreenDescriptor> { self.0.read().screens.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_screens() -> VirtualScreens {
        VirtualScreens::new(vec![
            ScreenDescriptor::new("A", Rect::new(0, 0, 1000, 1000)),
            ScreenDescriptor::new("B", Rect::new(1000, 0, 1000, 1000)),
        ])
    }

    #[test]
    fn window_resolves_to_screen_under_its_center() {
        let screens = two_screens();
        let handle = WindowHandle::new(1);
        screens.set_window_frame(handle, Rect::new(900, 100, 400, 300));
        assert_eq!("B", screens.screen_containing(handle).unwrap().device_id);
    }

    #[test]
    fn window_with_center_offscreen_uses_largest_overlap() {
        let screens = two_screens();
        let handle = WindowHandle::new(1);
        screens.set_window_frame(handle, Rect::new(-300, 900, 500, 400));
        assert_eq!("A", screens.screen_containing(handle).unwrap().device_id);
    }

    #[test]
    fn unknown_and_offscreen_windows_are_errors() {
        let screens = two_screens();
        let handle = WindowHandle::new(7);
        assert_eq!(
            Err(InteropError::UnknownWindow(handle)),
            screens.screen_containing(handle)
        );

        screens.set_window_frame(handle, Rect::new(5000, 5000, 10, 10));
        assert_eq!(
            Err(InteropError::NoScreenForWindow(handle)),
            screens.screen_containing(handle)
        );
    }

    #[test]
    fn clones_share_state() {
        let screens = VirtualScreens::default();
        let producer = screens.clone();
        producer.set_screens(vec![ScreenDescriptor::new("A", Rect::new(0, 0, 10, 10))]);
        assert_eq!(1, screens.enumerate_screens().len());
    }
}
