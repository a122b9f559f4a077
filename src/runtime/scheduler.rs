//! Coalescing frame scheduler
//!
//! Any number of schedule requests issued before the host's next frame
//! collapse into one frame callback. The pending flag is cleared right
//! before the job runs, so requests made by the job itself (a setter called
//! during a render pass) book exactly one further frame.

use std::cell::Cell;
use std::rc::Rc;

use crate::host::Host;

/// Collapses schedule requests into at most one pending host frame
pub struct FrameScheduler {
    host: Rc<dyn Host>,
    pending: Rc<Cell<bool>>,
    requested: Cell<u64>,
    coalesced: Cell<u64>,
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending.get())
            .field("requested", &self.requested.get())
            .field("coalesced", &self.coalesced.get())
            .finish()
    }
}

impl FrameScheduler {
    /// Create a scheduler over `host`
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            host,
            pending: Rc::new(Cell::new(false)),
            requested: Cell::new(0),
            coalesced: Cell::new(0),
        }
    }

    /// Run `job` on the next frame unless a frame is already pending
    ///
    /// Returns `true` if a new frame was requested, `false` if the request
    /// was folded into the pending one.
    pub fn schedule<F>(&self, job: F) -> bool
    where
        F: FnOnce() + 'static,
    {
        if self.pending.replace(true) {
            self.coalesced.set(self.coalesced.get() + 1);
            log::trace!("render request coalesced into pending frame");
            return false;
        }

        self.requested.set(self.requested.get() + 1);
        let pending = self.pending.clone();
        self.host.request_frame(Box::new(move || {
            pending.set(false);
            job();
        }));
        true
    }

    /// Whether a frame is waiting to run
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Frames requested from the host so far
    pub fn frames_requested(&self) -> u64 {
        self.requested.get()
    }

    /// Requests folded into a pending frame so far
    pub fn coalesced_requests(&self) -> u64 {
        self.coalesced.get()
    }
}
