//! Event plumbing between the host tree and application handlers
//!
//! The event system provides:
//! - `HostEvent`, the host-agnostic payload delivered to listeners
//! - `EventHandler`, a cheaply clonable callback stored in property bags

pub mod event;
pub mod handler;

pub use event::HostEvent;
pub use handler::{handler, EventHandler};
