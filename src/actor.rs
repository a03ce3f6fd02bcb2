//! Message passing between the platform-facing threads and the thread that
//! owns the [`Context`](crate::context::Context).
//!
//! Messages carry the sender's tracing span so work done on the receiving
//! side shows up under whatever caused it.

use crossbeam_channel::{SendError, unbounded};
use tracing::Span;

pub mod reactor;

pub struct Sender<Event>(crossbeam_channel::Sender<(Span, Event)>);
pub type Receiver<Event> = crossbeam_channel::Receiver<(Span, Event)>;

pub fn channel<Event>() -> (Sender<Event>, Receiver<Event>) {
    let (tx, rx) = unbounded();
    (Sender(tx), rx)
}

impl<Event> Sender<Event> {
    /// Send errors only mean the receiver is gone, i.e. we are shutting down.
    pub fn send(&self, event: Event) { _ = self.try_send(event) }

    pub fn try_send(&self, event: Event) -> Result<(), SendError<(Span, Event)>> {
        self.0.send((Span::current(), event))
    }
}

impl<Event> Clone for Sender<Event> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Event> std::fmt::Debug for Sender<Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("actor::Sender(...)")
    }
}
