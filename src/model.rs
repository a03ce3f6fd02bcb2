pub mod container;
pub mod focus;
pub mod lookup;
pub mod registry;
pub mod tree;

pub use container::{Container, ContainerBehavior, ContainerType, Monitor, Window, Workspace};
pub use focus::FocusState;
pub use lookup::Lookup;
pub use registry::{ContainerId, Registry};
pub use tree::{ContainerTree, Removed, Scope, TreeError};
