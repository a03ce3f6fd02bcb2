//! Synchronous command/event dispatch.
//!
//! Commands go to exactly one handler and produce a [`CommandResponse`].
//! Events fan out to every subscriber of their kind. Both run to completion on
//! the caller's stack: a handler that raises further commands or events simply
//! calls back into the bus, so everything a command triggers has finished by
//! the time [`Bus::dispatch`] returns.

pub mod command;
pub mod error;
pub mod event;

use std::any::{Any, TypeId};
use std::rc::Rc;

pub use command::{Command, CommandHandler, CommandResponse, ErrorKind};
pub use error::BusError;
pub use event::{EventSubscriber, WmEvent, WmEventKind};
use strum::IntoEnumIterator;
use tracing::{debug, debug_span, trace};

use crate::common::collections::{HashMap, hash_map};
use crate::context::WmState;
use crate::model::{ContainerTree, Lookup};

trait ErasedCommandHandler {
    fn name(&self) -> &'static str;

    /// `slot` is an `Option<C>` for the handler's command type.
    fn handle_erased(&self, cx: &mut Dispatch<'_>, slot: &mut dyn Any) -> CommandResponse;
}

struct Erased<H>(H);

impl<H: CommandHandler> ErasedCommandHandler for Erased<H> {
    fn name(&self) -> &'static str { <H::Command as Command>::NAME }

    fn handle_erased(&self, cx: &mut Dispatch<'_>, slot: &mut dyn Any) -> CommandResponse {
        let Some(command) = slot.downcast_mut::<Option<H::Command>>().and_then(Option::take)
        else {
            unreachable!("command handlers are keyed by command type");
        };
        self.0.handle(cx, command)
    }
}

#[derive(Default)]
pub struct Bus {
    command_handlers: HashMap<TypeId, Box<dyn ErasedCommandHandler>>,
    subscribers: HashMap<WmEventKind, Vec<Rc<dyn EventSubscriber>>>,
}

impl Bus {
    pub fn new() -> Self { Self::default() }

    pub fn register_command_handler<H: CommandHandler>(
        &mut self,
        handler: H,
    ) -> Result<(), BusError> {
        match self.command_handlers.entry(TypeId::of::<H::Command>()) {
            hash_map::Entry::Occupied(_) => {
                Err(BusError::HandlerAlreadyRegistered(<H::Command as Command>::NAME))
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(Box::new(Erased(handler)));
                Ok(())
            }
        }
    }

    pub fn subscribe(&mut self, kind: WmEventKind, subscriber: impl EventSubscriber) {
        self.subscribe_shared(kind, Rc::new(subscriber));
    }

    /// Subscribes one subscriber to every event kind.
    pub fn subscribe_all(&mut self, subscriber: impl EventSubscriber) {
        let subscriber: Rc<dyn EventSubscriber> = Rc::new(subscriber);
        for kind in WmEventKind::iter() {
            self.subscribe_shared(kind, subscriber.clone());
        }
    }

    fn subscribe_shared(&mut self, kind: WmEventKind, subscriber: Rc<dyn EventSubscriber>) {
        self.subscribers.entry(kind).or_default().push(subscriber);
    }

    pub fn has_handler<C: Command>(&self) -> bool {
        self.command_handlers.contains_key(&TypeId::of::<C>())
    }

    pub fn require_handler<C: Command>(&self) -> Result<(), BusError> {
        if self.has_handler::<C>() {
            Ok(())
        } else {
            Err(BusError::NoHandlerRegistered(C::NAME))
        }
    }

    /// Runs the handler registered for `C` against `state`.
    ///
    /// Only wiring defects surface as `Err`; rejected commands come back as
    /// [`CommandResponse::Failure`].
    pub fn dispatch<C: Command>(
        &self,
        state: &mut WmState,
        command: C,
    ) -> Result<CommandResponse, BusError> {
        let handler = self
            .command_handlers
            .get(&TypeId::of::<C>())
            .ok_or(BusError::NoHandlerRegistered(C::NAME))?;

        let span = debug_span!("command", name = handler.name());
        let _guard = span.enter();
        trace!(?command, "dispatching");

        let mut cx = Dispatch { bus: self, state };
        let response = handler.handle_erased(&mut cx, &mut Some(command));
        match response {
            CommandResponse::Success(id) => debug!(%id, "command succeeded"),
            CommandResponse::Failure(kind) => debug!(%kind, "command rejected"),
        }
        Ok(response)
    }

    /// Delivers `event` to its subscribers in registration order.
    pub fn publish(&self, state: &mut WmState, event: WmEvent) {
        let kind = event.kind();
        let Some(subscribers) = self.subscribers.get(&kind) else {
            trace!(%kind, "event has no subscribers");
            return;
        };
        trace!(?event, subscribers = subscribers.len(), "publishing");
        let mut cx = Dispatch { bus: self, state };
        for subscriber in subscribers {
            subscriber.handle(&mut cx, &event);
        }
    }
}

/// What a handler or subscriber gets to work with while it runs.
pub struct Dispatch<'a> {
    bus: &'a Bus,
    pub state: &'a mut WmState,
}

impl Dispatch<'_> {
    /// Runs a follow-up command on the current stack and returns its response.
    pub fn raise_command<C: Command>(&mut self, command: C) -> Result<CommandResponse, BusError> {
        self.bus.dispatch(self.state, command)
    }

    pub fn raise_event(&mut self, event: WmEvent) { self.bus.publish(self.state, event) }

    pub fn lookup(&self) -> Lookup<'_> { self.state.lookup() }

    pub fn tree(&self) -> &ContainerTree { &self.state.tree }

    pub fn tree_mut(&mut self) -> &mut ContainerTree { &mut self.state.tree }
}
