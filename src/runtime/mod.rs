//! Mount and re-render scheduling
//!
//! A [`Runtime`] owns the mount state of one UI tree: the root target, the
//! last top-level virtual node and the hook slots shared by every pass.
//! Mounting renders synchronously; state setters only request a frame, and
//! every request issued before that frame runs is served by a single
//! full re-render of the stored tree.

mod config;
mod scheduler;

#[cfg(test)]
mod tests;

pub use config::{RuntimeConfig, StrategyKind, DEFAULT_MAX_DEPTH};
pub use scheduler::FrameScheduler;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::host::{Host, NodeId};
use crate::renderer::{RenderStats, RenderStrategy, Renderer};
use crate::state::{Hooks, RenderRequest, SlotStore};
use crate::vnode::VirtualNode;
use crate::Error;

/// The currently mounted tree
#[derive(Debug, Clone, Default)]
pub struct MountState {
    /// Container that receives rendered output
    pub root: Option<NodeId>,
    /// Last top-level node mounted
    pub tree: Option<VirtualNode>,
}

struct RuntimeInner {
    host: Rc<dyn Host>,
    config: RuntimeConfig,
    strategy: Box<dyn RenderStrategy>,
    mount: RefCell<MountState>,
    slots: SlotStore,
    scheduler: FrameScheduler,
    passes: Cell<u64>,
    nodes_created: Cell<u64>,
}

impl RenderRequest for RuntimeInner {
    fn request_render(self: Rc<Self>) {
        let weak = Rc::downgrade(&self);
        self.scheduler.schedule(move || match weak.upgrade() {
            Some(inner) => {
                if let Err(err) = inner.render_pass() {
                    log::error!("re-render failed: {err}");
                }
            }
            None => log::debug!("frame fired after its runtime was dropped"),
        });
    }
}

impl RuntimeInner {
    fn render_pass(self: &Rc<Self>) -> Result<(), Error> {
        let (root, tree) = {
            let mount = self.mount.borrow();
            match (mount.root, mount.tree.clone()) {
                (Some(root), Some(tree)) => (root, tree),
                _ => {
                    log::debug!("render requested before mount, skipping");
                    return Ok(());
                }
            }
        };

        let requester: Weak<dyn RenderRequest> = Rc::downgrade(self) as Weak<dyn RenderRequest>;
        let hooks = Hooks::new(self.slots.clone(), requester);
        let mut renderer = Renderer::new(self.host.as_ref(), &hooks, self.config.max_depth);

        let result = self
            .strategy
            .commit(self.host.as_ref(), root, &tree, &mut renderer);
        self.nodes_created
            .set(self.nodes_created.get() + renderer.nodes_created());
        result?;

        self.passes.set(self.passes.get() + 1);
        log::debug!(
            "render pass {} ({}) into {root}: {} nodes, {} hooks",
            self.passes.get(),
            self.strategy.name(),
            renderer.nodes_created(),
            hooks.cursor()
        );
        Ok(())
    }
}

/// Owner of one mounted UI tree
///
/// Cloning a `Runtime` yields another handle to the same mount state.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .field("root", &self.inner.mount.borrow().root)
            .field("slots", &self.inner.slots)
            .field("scheduler", &self.inner.scheduler)
            .finish()
    }
}

impl Runtime {
    /// Create a runtime over `host` with the default configuration
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self::with_config(host, RuntimeConfig::default())
    }

    /// Create a runtime over `host`
    pub fn with_config(host: Rc<dyn Host>, config: RuntimeConfig) -> Self {
        let strategy = config.strategy.build();
        Self {
            inner: Rc::new(RuntimeInner {
                scheduler: FrameScheduler::new(host.clone()),
                host,
                config,
                strategy,
                mount: RefCell::new(MountState::default()),
                slots: SlotStore::new(),
                passes: Cell::new(0),
                nodes_created: Cell::new(0),
            }),
        }
    }

    /// Bind `tree` to `target` and render it
    ///
    /// Existing content of `target` is discarded. Hook slots are kept, so
    /// mounting again continues with the state of the previous tree.
    pub fn mount(&self, tree: VirtualNode, target: NodeId) -> Result<(), Error> {
        if !self.inner.host.contains(target) {
            return Err(Error::RootNotFound(target.to_string()));
        }
        log::debug!("mounting into {target}");
        *self.inner.mount.borrow_mut() = MountState {
            root: Some(target),
            tree: Some(tree),
        };
        self.inner.render_pass()
    }

    /// Mount into the element whose `id` attribute equals `id`
    pub fn mount_by_id(&self, tree: VirtualNode, id: &str) -> Result<(), Error> {
        let target = self
            .inner
            .host
            .find_by_id(id)
            .ok_or_else(|| Error::RootNotFound(id.to_string()))?;
        self.mount(tree, target)
    }

    /// Re-render the mounted tree immediately
    ///
    /// This is what a scheduled frame runs; a no-op before the first mount.
    pub fn rerender(&self) -> Result<(), Error> {
        self.inner.render_pass()
    }

    /// Request a coalesced re-render on the next frame
    pub fn schedule_render(&self) {
        self.inner.clone().request_render();
    }

    /// Whether a re-render is waiting for its frame
    pub fn is_render_pending(&self) -> bool {
        self.inner.scheduler.is_pending()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mount.borrow().root.is_some()
    }

    /// Root target of the mounted tree
    pub fn root(&self) -> Option<NodeId> {
        self.inner.mount.borrow().root
    }

    /// Last mounted top-level node
    pub fn current_tree(&self) -> Option<VirtualNode> {
        self.inner.mount.borrow().tree.clone()
    }

    /// Number of hook slots in use
    pub fn slot_count(&self) -> usize {
        self.inner.slots.len()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.inner.host
    }

    pub fn stats(&self) -> RenderStats {
        RenderStats {
            passes: self.inner.passes.get(),
            nodes_created: self.inner.nodes_created.get(),
            frames_requested: self.inner.scheduler.frames_requested(),
            coalesced_requests: self.inner.scheduler.coalesced_requests(),
        }
    }
}
