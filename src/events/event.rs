//! Host-agnostic event payload

use crate::host::NodeId;

/// An event raised by the host tree and delivered to a registered listener
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    /// Lowercase event name, e.g. `click` or `input`
    pub kind: String,
    /// Node the listener was registered on
    pub target: NodeId,
    /// Current value of the target, for form controls
    pub value: Option<String>,
}

impl HostEvent {
    /// Create an event without a value
    pub fn new(kind: impl Into<String>, target: NodeId) -> Self {
        Self {
            kind: kind.into(),
            target,
            value: None,
        }
    }

    /// Attach the target's current value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}
