// Core module of the jsxless UI runtime
pub mod events;
pub mod host;
mod macros;
pub mod renderer;
pub mod runtime;
pub mod state;
pub mod vnode;

/// Version of the jsxless runtime
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::events::{handler, EventHandler, HostEvent};
    pub use crate::host::{Host, MemoryHost, NodeId};
    pub use crate::renderer::{FullRebuild, RenderStats, RenderStrategy};
    pub use crate::runtime::{Runtime, RuntimeConfig};
    pub use crate::state::{Hooks, StateGetter, StateSetter};
    pub use crate::vnode::{
        create_element, create_fragment, Child, ChildInput, Component, NodeRef, PropValue, Props,
        RefTarget, StyleMap, VirtualNode,
    };
    pub use crate::{children, h, props};
}

/// Errors that can occur in the jsxless runtime
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Root target not found: {0}")]
    RootNotFound(String),

    #[error("Render depth limit of {limit} exceeded")]
    DepthExceeded { limit: usize },

    #[error("Host error: {0}")]
    Host(#[from] host::HostError),

    #[error("Hook error: {0}")]
    Hook(#[from] state::HookError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias for runtime operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
