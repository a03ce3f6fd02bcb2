//! Turns platform notifications into core commands.
//!
//! The reactor owns the [`Context`] and is the only thing that drives it.
//! Notifications arrive over an [`actor`](crate::actor) channel and are
//! handled one at a time, each running to completion before the next.

mod error;
#[cfg(test)]
mod tests;

pub use error::ReactorError;
use tracing::{debug, info, instrument, warn};

use crate::actor;
use crate::bus::{Command, CommandResponse};
use crate::commands::{
    AddMonitor, AddWindow, FocusWindow, RemoveMonitor, RemoveWindow, UpdateMonitorScreen,
};
use crate::common::collections::HashSet;
use crate::context::Context;
use crate::model::{ContainerId, Window};
use crate::sys::window::WindowHandle;

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The set of screens or their geometry changed. The new layout is read
    /// back through the context's screen interop.
    ScreensChanged,
    WindowCreated {
        handle: WindowHandle,
        title: String,
    },
    WindowDestroyed(WindowHandle),
    WindowFocused(WindowHandle),
    Shutdown,
}

pub struct Reactor {
    cx: Context,
}

impl Reactor {
    pub fn new(cx: Context) -> Self { Self { cx } }

    pub fn context(&self) -> &Context { &self.cx }

    /// Handles events until [`Event::Shutdown`] arrives or every sender is
    /// dropped, then hands the context back.
    pub fn run(mut self, rx: Receiver) -> Context {
        while let Ok((span, event)) = rx.recv() {
            let _guard = span.enter();
            if event == Event::Shutdown {
                info!("Shutting down");
                break;
            }
            if let Err(err) = self.handle_event(event) {
                match err {
                    ReactorError::Bus(_) => warn!("{err}"),
                    _ => debug!("{err}"),
                }
            }
        }
        self.cx
    }

    #[instrument(name = "reactor::handle_event", skip(self))]
    pub fn handle_event(&mut self, event: Event) -> Result<(), ReactorError> {
        match event {
            Event::ScreensChanged => self.sync_screens(),
            Event::WindowCreated { handle, title } => {
                self.dispatch(AddWindow { window: Window::new(handle, title) })?;
                Ok(())
            }
            Event::WindowDestroyed(handle) => {
                let window = self.managed_window(handle)?;
                self.dispatch(RemoveWindow { window })?;
                Ok(())
            }
            Event::WindowFocused(handle) => {
                let window = self.managed_window(handle)?;
                self.dispatch(FocusWindow { window })?;
                Ok(())
            }
            Event::Shutdown => Ok(()),
        }
    }

    /// Brings monitors in line with the screens the platform reports.
    ///
    /// New and changed screens are applied before stale monitors are removed
    /// so removed monitors always have somewhere to hand their workspaces to.
    fn sync_screens(&mut self) -> Result<(), ReactorError> {
        let screens = self.cx.state().screens().enumerate_screens();
        debug!(count = screens.len(), "Syncing screens");

        let mut present = HashSet::default();
        for screen in screens {
            present.insert(screen.device_id.clone());
            match self.cx.lookup().monitor_by_device(&screen.device_id) {
                Some(monitor) => self.dispatch(UpdateMonitorScreen { monitor, screen })?,
                None => self.dispatch(AddMonitor { screen })?,
            };
        }

        let tree = self.cx.tree();
        let stale: Vec<ContainerId> = self
            .cx
            .lookup()
            .monitors()
            .filter(|&m| tree.monitor(m).is_some_and(|m| !present.contains(m.device_id())))
            .collect();
        for monitor in stale {
            self.dispatch(RemoveMonitor { monitor })?;
        }
        Ok(())
    }

    fn managed_window(&self, handle: WindowHandle) -> Result<ContainerId, ReactorError> {
        self.cx.lookup().find_window(handle).ok_or(ReactorError::UnknownWindow(handle))
    }

    fn dispatch<C: Command>(&mut self, command: C) -> Result<ContainerId, ReactorError> {
        match self.cx.raise_command(command)? {
            CommandResponse::Success(id) => Ok(id),
            CommandResponse::Failure(kind) => Err(ReactorError::Rejected { command: C::NAME, kind }),
        }
    }
}
