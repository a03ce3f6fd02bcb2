use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::registry::ContainerId;
use crate::sys::screen::ScreenDescriptor;
use crate::sys::window::WindowHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContainerType {
    Monitor,
    Workspace,
    Window,
}

impl ContainerType {
    /// Nesting rule of the tree. `None` stands for the root level.
    pub fn can_nest_under(self, parent: Option<ContainerType>) -> bool {
        matches!(
            (parent, self),
            (None, ContainerType::Monitor)
                | (Some(ContainerType::Monitor), ContainerType::Workspace)
                | (Some(ContainerType::Workspace), ContainerType::Window)
        )
    }
}

#[enum_dispatch]
pub trait ContainerBehavior {
    fn container_type(&self) -> ContainerType;

    /// Short human readable description, used in logs and tree dumps.
    fn label(&self) -> String;
}

#[enum_dispatch(ContainerBehavior)]
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Monitor(Monitor),
    Workspace(Workspace),
    Window(Window),
}

impl Container {
    pub fn as_monitor(&self) -> Option<&Monitor> {
        match self {
            Container::Monitor(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_monitor_mut(&mut self) -> Option<&mut Monitor> {
        match self {
            Container::Monitor(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_workspace(&self) -> Option<&Workspace> {
        match self {
            Container::Workspace(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_workspace_mut(&mut self) -> Option<&mut Workspace> {
        match self {
            Container::Workspace(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_window(&self) -> Option<&Window> {
        match self {
            Container::Window(w) => Some(w),
            _ => None,
        }
    }
}

/// A physical screen modeled in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub screen: ScreenDescriptor,
    /// Workspace currently shown on this monitor. Always one of its children.
    pub displayed_workspace: Option<ContainerId>,
}

impl Monitor {
    pub fn new(screen: ScreenDescriptor) -> Self {
        Self { screen, displayed_workspace: None }
    }

    pub fn device_id(&self) -> &str { &self.screen.device_id }
}

impl ContainerBehavior for Monitor {
    fn container_type(&self) -> ContainerType { ContainerType::Monitor }

    fn label(&self) -> String {
        let f = self.screen.frame;
        format!("monitor {} ({}x{}+{}+{})", self.screen.device_id, f.width, f.height, f.x, f.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub name: String,
    pub last_focused: Option<ContainerId>,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), last_focused: None }
    }
}

impl ContainerBehavior for Workspace {
    fn container_type(&self) -> ContainerType { ContainerType::Workspace }

    fn label(&self) -> String { format!("workspace {:?}", self.name) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub handle: WindowHandle,
    pub title: String,
}

impl Window {
    pub fn new(handle: WindowHandle, title: impl Into<String>) -> Self {
        Self { handle, title: title.into() }
    }
}

impl ContainerBehavior for Window {
    fn container_type(&self) -> ContainerType { ContainerType::Window }

    fn label(&self) -> String { format!("window {} {:?}", self.handle, self.title) }
}
