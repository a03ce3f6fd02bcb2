use thiserror::Error;

use crate::bus::{BusError, ErrorKind};
use crate::sys::window::WindowHandle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactorError {
    #[error("Window {0} is not managed")]
    UnknownWindow(WindowHandle),
    #[error("Command `{command}` was rejected: {kind}")]
    Rejected { command: &'static str, kind: ErrorKind },
    #[error(transparent)]
    Bus(#[from] BusError),
}
