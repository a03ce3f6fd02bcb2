use tracing::info;

use crate::bus::{Bus, BusError, Command, CommandResponse, WmEvent};
use crate::common::config::Config;
use crate::handlers;
use crate::model::{ContainerTree, FocusState, Lookup};
use crate::sys::screen::ScreenInterop;

/// Mutable window manager state. Only the bus's dispatch stack writes to it.
pub struct WmState {
    pub tree: ContainerTree,
    pub focus: FocusState,
    screens: Box<dyn ScreenInterop>,
}

impl WmState {
    pub fn new(screens: impl ScreenInterop + 'static) -> Self {
        Self {
            tree: ContainerTree::new(),
            focus: FocusState::default(),
            screens: Box::new(screens),
        }
    }

    pub fn lookup(&self) -> Lookup<'_> { Lookup::new(&self.tree, &*self.screens) }

    pub fn screens(&self) -> &dyn ScreenInterop { &*self.screens }
}

/// The one top-level object: the wired bus plus the state it mutates.
pub struct Context {
    bus: Bus,
    state: WmState,
}

impl Context {
    /// Fails if any core command lacks a handler.
    pub fn new(bus: Bus, state: WmState) -> Result<Self, BusError> {
        handlers::verify_wiring(&bus)?;
        Ok(Self { bus, state })
    }

    /// A context with every core handler and subscriber registered.
    pub fn with_config(
        config: &Config,
        screens: impl ScreenInterop + 'static,
    ) -> Result<Self, BusError> {
        let mut bus = Bus::new();
        handlers::register_all(&mut bus, config)?;
        info!("Registered core command handlers");
        Self::new(bus, WmState::new(screens))
    }

    pub fn raise_command<C: Command>(&mut self, command: C) -> Result<CommandResponse, BusError> {
        self.bus.dispatch(&mut self.state, command)
    }

    pub fn raise_event(&mut self, event: WmEvent) { self.bus.publish(&mut self.state, event) }

    pub fn state(&self) -> &WmState { &self.state }

    pub fn tree(&self) -> &ContainerTree { &self.state.tree }

    pub fn focus(&self) -> FocusState { self.state.focus }

    pub fn lookup(&self) -> Lookup<'_> { self.state.lookup() }
}
