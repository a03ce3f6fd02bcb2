use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque native window handle.
///
/// Only ever used as an equality key; the value is whatever the platform hands
/// us (an `HWND`, an X11 window id, a window server id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub const fn new(raw: u64) -> Self { Self(raw) }

    pub const fn as_u64(self) -> u64 { self.0 }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}
