use thiserror::Error;

/// Wiring defects. These are expected at startup only; a correctly wired bus
/// never produces them at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("No handler registered for command `{0}`")]
    NoHandlerRegistered(&'static str),
    #[error("A handler for command `{0}` is already registered")]
    HandlerAlreadyRegistered(&'static str),
}
