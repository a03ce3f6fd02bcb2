use std::fmt;

use serde::Serialize;
use strum::Display;

use super::Dispatch;
use crate::model::{ContainerId, TreeError};

/// A request for exactly one mutation. Routed to exactly one handler.
pub trait Command: fmt::Debug + 'static {
    const NAME: &'static str;
}

pub trait CommandHandler: 'static {
    type Command: Command;

    fn handle(&self, cx: &mut Dispatch<'_>, command: Self::Command) -> CommandResponse;
}

/// Why a command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The mutation would break the Monitor → Workspace → Window nesting.
    InvalidHierarchy,
    /// A referenced id does not resolve (or names the wrong kind of node).
    NotFound,
    /// The node, handle or name is already present.
    AlreadyExists,
    /// The platform could not place the request anywhere.
    ExternalResolutionFailure,
}

impl From<TreeError> for ErrorKind {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::InvalidHierarchy { .. } => ErrorKind::InvalidHierarchy,
            TreeError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResponse {
    Success(ContainerId),
    Failure(ErrorKind),
}

impl CommandResponse {
    pub fn is_success(&self) -> bool { matches!(self, CommandResponse::Success(_)) }

    pub fn affected_id(&self) -> Option<ContainerId> {
        match *self {
            CommandResponse::Success(id) => Some(id),
            CommandResponse::Failure(_) => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match *self {
            CommandResponse::Success(_) => None,
            CommandResponse::Failure(kind) => Some(kind),
        }
    }
}

impl From<Result<ContainerId, ErrorKind>> for CommandResponse {
    fn from(result: Result<ContainerId, ErrorKind>) -> Self {
        match result {
            Ok(id) => CommandResponse::Success(id),
            Err(kind) => CommandResponse::Failure(kind),
        }
    }
}
