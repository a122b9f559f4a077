//! Host UI-tree capability surface
//!
//! The renderer and scheduler never touch a concrete UI toolkit. Everything
//! they need from the outside world goes through the [`Host`] trait: node
//! creation, attribute assignment, listener registration, tree edits and a
//! "run this before the next visual update" primitive.
//!
//! Two implementations ship with the crate:
//! - [`MemoryHost`], a headless in-memory tree used by tests and demos
//! - `DomHost` (feature `web`), backed by the browser DOM through `web-sys`

pub mod memory;
#[cfg(feature = "web")]
pub mod web;

pub use memory::{MemoryHost, MemoryNode, NodeKind};
#[cfg(feature = "web")]
pub use web::DomHost;

use std::fmt;

use crate::events::EventHandler;

/// Opaque handle to a node owned by a host
///
/// Hosts hand out ids in strictly increasing order, so an id is never reused
/// for a different node during the host's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric id
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callback queued for the next frame
pub type FrameCallback = Box<dyn FnOnce()>;

/// Errors raised by a host implementation
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Invalid tag name: {0:?}")]
    InvalidTag(String),

    #[error("Host unavailable: {0}")]
    Unavailable(String),

    #[error("Host call failed: {0}")]
    Js(String),
}

/// The operations a UI tree must provide to be rendered into
///
/// All methods take `&self`; implementations use interior mutability because
/// the same host is shared by the runtime, its frame callbacks and the
/// application driving it.
pub trait Host {
    /// Create a detached element node
    fn create_element(&self, tag: &str) -> Result<NodeId, HostError>;

    /// Create a detached text node
    fn create_text(&self, text: &str) -> NodeId;

    /// Set an attribute on an element; unknown nodes are ignored
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    /// Register `handler` for events named `event` on `node`
    fn add_listener(&self, node: NodeId, event: &str, handler: EventHandler);

    /// Append `child` as the last child of `parent`
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Remove and discard every child of `node`
    fn clear_children(&self, node: NodeId);

    /// Detach `node` from its parent and discard it with its subtree
    ///
    /// Discarding an unknown or already discarded node does nothing.
    fn discard(&self, node: NodeId);

    /// Run `callback` once, before the next visual update
    fn request_frame(&self, callback: FrameCallback);

    /// Whether `node` is a live node of this host
    fn contains(&self, node: NodeId) -> bool;

    /// Look up an element by its `id` attribute
    fn find_by_id(&self, _id: &str) -> Option<NodeId> {
        None
    }
}
