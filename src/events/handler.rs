//! Event handler callbacks

use std::fmt;
use std::rc::Rc;

use crate::events::HostEvent;

/// A callback registered for a host event
///
/// Handlers are stored inside property bags and therefore cloned on every
/// render pass; cloning only bumps a reference count.
#[derive(Clone)]
pub struct EventHandler {
    func: Rc<dyn Fn(&HostEvent)>,
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("func", &"[Fn(&HostEvent)]")
            .finish()
    }
}

impl EventHandler {
    /// Create a new handler
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&HostEvent) + 'static,
    {
        Self {
            func: Rc::new(func),
        }
    }

    /// Invoke the handler
    pub fn call(&self, event: &HostEvent) {
        (self.func)(event)
    }

    /// Whether two handles point at the same callback
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

/// Convenience function for creating a handler
pub fn handler<F>(func: F) -> EventHandler
where
    F: Fn(&HostEvent) + 'static,
{
    EventHandler::new(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NodeId;
    use std::cell::Cell;

    #[test]
    fn test_handler_call_and_identity() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let h = handler(move |event| {
            assert_eq!(event.kind, "click");
            counter.set(counter.get() + 1);
        });
        let copy = h.clone();

        copy.call(&HostEvent::new("click", NodeId::new(1)));
        h.call(&HostEvent::new("click", NodeId::new(1)));

        assert_eq!(hits.get(), 2);
        assert!(h.ptr_eq(&copy));
        assert!(!h.ptr_eq(&handler(|_| {})));
    }
}
