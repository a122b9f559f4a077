//! Renderer: materializes virtual nodes into host nodes
//!
//! Rendering is a synchronous, depth-first walk. Leaves become text nodes,
//! components are evaluated with the pass's [`Hooks`] and their output is
//! rendered in their place, fragments contribute their children without a
//! wrapper, and elements get their property bag applied through the
//! [`policy`] table before their children are appended.

pub mod policy;
pub mod strategy;


pub use policy::{classify, PropAction};
pub use strategy::{FullRebuild, RenderStrategy};

use crate::host::{Host, NodeId};
use crate::state::Hooks;
use crate::vnode::{Child, NodeType, Props, VirtualNode};
use crate::Error;

/// Host output of rendering one child
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// A single host node
    Node(NodeId),
    /// The members of a fragment, in order, without a wrapper
    Group(Vec<NodeId>),
}

impl Rendered {
    /// Top-level host nodes in order
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Self::Node(id) => std::slice::from_ref(id),
            Self::Group(ids) => ids,
        }
    }

    /// Append every top-level node to `parent`
    pub fn append_to(&self, host: &dyn Host, parent: NodeId) {
        for node in self.nodes() {
            host.append_child(parent, *node);
        }
    }
}

/// Render statistics for diagnostics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Completed render passes, including the initial mount
    pub passes: u64,
    /// Host nodes created by passes that completed
    pub nodes_created: u64,
    /// Frames requested from the host
    pub frames_requested: u64,
    /// Re-render requests folded into an already pending frame
    pub coalesced_requests: u64,
}

/// One render pass over a host
pub struct Renderer<'a> {
    host: &'a dyn Host,
    hooks: &'a Hooks,
    max_depth: usize,
    created: Vec<NodeId>,
}

impl std::fmt::Debug for Renderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("hooks", self.hooks)
            .field("max_depth", &self.max_depth)
            .field("nodes_created", &self.created.len())
            .finish()
    }
}

impl<'a> Renderer<'a> {
    /// Create a renderer for one pass
    pub fn new(host: &'a dyn Host, hooks: &'a Hooks, max_depth: usize) -> Self {
        Self {
            host,
            hooks,
            max_depth,
            created: Vec::new(),
        }
    }

    /// Host nodes created so far in this pass
    pub fn nodes_created(&self) -> u64 {
        self.created.len() as u64
    }

    /// Ids of the host nodes created so far, in creation order
    pub fn created(&self) -> &[NodeId] {
        &self.created
    }

    /// Discard every host node this pass created
    ///
    /// Used when a pass fails partway so its half-built output does not
    /// linger in the host.
    pub fn discard_created(&mut self) {
        log::debug!("discarding {} nodes of a failed pass", self.created.len());
        for node in self.created.drain(..) {
            self.host.discard(node);
        }
    }

    /// Render any child
    pub fn render(&mut self, child: &Child) -> Result<Rendered, Error> {
        self.render_child(child, 0)
    }

    /// Render a virtual node
    pub fn render_node(&mut self, node: &VirtualNode) -> Result<Rendered, Error> {
        self.render_vnode(node, 0)
    }

    fn render_child(&mut self, child: &Child, depth: usize) -> Result<Rendered, Error> {
        match child {
            Child::Text(text) => Ok(Rendered::Node(self.text(text))),
            Child::Number(n) => Ok(Rendered::Node(self.text(&policy::format_number(*n)))),
            Child::Node(node) => self.render_vnode(node, depth),
        }
    }

    fn render_vnode(&mut self, node: &VirtualNode, depth: usize) -> Result<Rendered, Error> {
        if depth > self.max_depth {
            return Err(Error::DepthExceeded {
                limit: self.max_depth,
            });
        }

        match node.node_type() {
            NodeType::Component(component) => {
                log::trace!("evaluating component {}", component.name());
                let output = component.call(node.props(), self.hooks);
                if let Some(err) = self.hooks.take_failure() {
                    return Err(err.into());
                }
                self.render_child(&output, depth + 1)
            }
            NodeType::Fragment => {
                let mut members = Vec::with_capacity(node.children().len());
                for child in node.children() {
                    members.extend_from_slice(self.render_child(child, depth + 1)?.nodes());
                }
                Ok(Rendered::Group(members))
            }
            NodeType::Element(tag) => {
                let element = self.host.create_element(tag)?;
                self.created.push(element);
                self.apply_props(element, node.props());
                for child in node.children() {
                    self.render_child(child, depth + 1)?
                        .append_to(self.host, element);
                }
                Ok(Rendered::Node(element))
            }
        }
    }

    fn text(&mut self, text: &str) -> NodeId {
        let node = self.host.create_text(text);
        self.created.push(node);
        node
    }

    fn apply_props(&mut self, element: NodeId, props: &Props) {
        for (key, value) in props.iter() {
            match classify(key, value) {
                PropAction::Skip => {}
                PropAction::Ref(target) => target.attach(element),
                PropAction::Listen { event, handler } => {
                    self.host.add_listener(element, &event, handler.clone())
                }
                PropAction::SetAttribute { name, value } => {
                    self.host.set_attribute(element, &name, &value)
                }
            }
        }
    }
}
