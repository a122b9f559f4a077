//! Headless in-memory host tree
//!
//! `MemoryHost` behaves like a tiny DOM: elements with ordered attributes,
//! text nodes, listeners and an animation-frame queue that the embedder
//! drains explicitly with [`MemoryHost::run_frame`].

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::events::{EventHandler, HostEvent};
use crate::host::{FrameCallback, Host, HostError, NodeId};

/// Kind of a node in the memory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with a tag name
    Element(String),
    /// Text leaf
    Text(String),
}

/// A node stored in the memory tree
#[derive(Debug, Clone)]
pub struct MemoryNode {
    kind: NodeKind,
    attributes: Vec<(String, String)>,
    listeners: Vec<(String, EventHandler)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl MemoryNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            listeners: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Node kind
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Attributes in assignment order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Child ids in document order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// In-memory implementation of [`Host`]
pub struct MemoryHost {
    nodes: RefCell<HashMap<NodeId, MemoryNode>>,
    frames: RefCell<VecDeque<FrameCallback>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHost")
            .field("nodes", &self.nodes.borrow().len())
            .field("pending_frames", &self.frames.borrow().len())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(HashMap::new()),
            frames: RefCell::new(VecDeque::new()),
            next_id: Cell::new(1),
        }
    }

    /// Create a detached `div` carrying `id`, suitable as a mount target
    pub fn create_root(&self, id: &str) -> NodeId {
        let node = self.insert(NodeKind::Element("div".to_string()));
        self.set_attribute(node, "id", id);
        node
    }

    fn insert(&self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.next_id.get());
        self.next_id.set(id.value() + 1);
        self.nodes.borrow_mut().insert(id, MemoryNode::new(kind));
        log::trace!("memory host created node {id}");
        id
    }

    /// Snapshot of a node
    pub fn node(&self, node: NodeId) -> Option<MemoryNode> {
        self.nodes.borrow().get(&node).cloned()
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Tag name of an element
    pub fn tag(&self, node: NodeId) -> Option<String> {
        match self.nodes.borrow().get(&node)?.kind {
            NodeKind::Element(ref tag) => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// Value of an attribute
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .borrow()
            .get(&node)?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// Child ids of a node
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// All descendants of a node in depth-first document order
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes
            .get(&node)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(n) = nodes.get(&id) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    /// Descendant elements with the given tag, in document order
    pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.tag(*id).as_deref() == Some(tag))
            .collect()
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut text = String::new();
        collect_text(&nodes, node, &mut text);
        text
    }

    /// Serialize a node and its subtree as HTML
    pub fn to_html(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut html = String::new();
        write_html(&nodes, node, &mut html);
        html
    }

    /// Number of listeners registered on a node
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.nodes
            .borrow()
            .get(&node)
            .map_or(0, |n| n.listeners.len())
    }

    /// Deliver an event to the listeners of its target
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch_event(&self, event: &HostEvent) -> usize {
        // Handlers may re-enter the host, so release the borrow first.
        let handlers: Vec<EventHandler> = match self.nodes.borrow().get(&event.target) {
            Some(n) => n
                .listeners
                .iter()
                .filter(|(name, _)| *name == event.kind)
                .map(|(_, h)| h.clone())
                .collect(),
            None => {
                log::warn!("dispatch to unknown node {}", event.target);
                return 0;
            }
        };
        for h in &handlers {
            h.call(event);
        }
        handlers.len()
    }

    /// Deliver an event without a value
    pub fn dispatch(&self, node: NodeId, kind: &str) -> usize {
        self.dispatch_event(&HostEvent::new(kind, node))
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Run the callbacks queued before this call
    ///
    /// Callbacks requested while the frame runs wait for the following frame.
    /// Returns the number of callbacks run.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<FrameCallback> = self.frames.borrow_mut().drain(..).collect();
        let count = batch.len();
        for callback in batch {
            callback();
        }
        count
    }

    fn remove_subtree(nodes: &mut HashMap<NodeId, MemoryNode>, node: NodeId) {
        if let Some(removed) = nodes.remove(&node) {
            for child in removed.children {
                Self::remove_subtree(nodes, child);
            }
        }
    }
}

fn collect_text(nodes: &HashMap<NodeId, MemoryNode>, node: NodeId, out: &mut String) {
    let Some(n) = nodes.get(&node) else {
        return;
    };
    if let NodeKind::Text(ref text) = n.kind {
        out.push_str(text);
    }
    for child in &n.children {
        collect_text(nodes, *child, out);
    }
}

fn write_html(nodes: &HashMap<NodeId, MemoryNode>, node: NodeId, out: &mut String) {
    let Some(n) = nodes.get(&node) else {
        return;
    };
    match n.kind {
        NodeKind::Text(ref text) => out.push_str(&escape(text, false)),
        NodeKind::Element(ref tag) => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in &n.attributes {
                if value.is_empty() {
                    out.push_str(&format!(" {name}"));
                } else {
                    out.push_str(&format!(" {name}=\"{}\"", escape(value, true)));
                }
            }
            out.push('>');
            for child in &n.children {
                write_html(nodes, *child, out);
            }
            out.push_str(&format!("</{tag}>"));
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Host for MemoryHost {
    fn create_element(&self, tag: &str) -> Result<NodeId, HostError> {
        if tag.is_empty() || tag.chars().any(char::is_whitespace) {
            return Err(HostError::InvalidTag(tag.to_string()));
        }
        Ok(self.insert(NodeKind::Element(tag.to_string())))
    }

    fn create_text(&self, text: &str) -> NodeId {
        self.insert(NodeKind::Text(text.to_string()))
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(n) = nodes.get_mut(&node) else {
            log::warn!("set_attribute on unknown node {node}");
            return;
        };
        if matches!(n.kind, NodeKind::Text(_)) {
            log::warn!("set_attribute on text node {node}");
            return;
        }
        match n.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => n.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn add_listener(&self, node: NodeId, event: &str, handler: EventHandler) {
        match self.nodes.borrow_mut().get_mut(&node) {
            Some(n) => n.listeners.push((event.to_string(), handler)),
            None => log::warn!("add_listener on unknown node {node}"),
        }
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes.contains_key(&parent) || !nodes.contains_key(&child) {
            log::warn!("append_child with unknown node ({parent} <- {child})");
            return;
        }
        let old_parent = nodes.get(&child).and_then(|c| c.parent);
        if let Some(old) = old_parent.and_then(|p| nodes.get_mut(&p)) {
            old.children.retain(|c| *c != child);
        }
        if let Some(c) = nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        if let Some(p) = nodes.get_mut(&parent) {
            p.children.push(child);
        }
    }

    fn clear_children(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let children = match nodes.get_mut(&node) {
            Some(n) => std::mem::take(&mut n.children),
            None => return,
        };
        for child in children {
            Self::remove_subtree(&mut nodes, child);
        }
    }

    fn discard(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let parent = match nodes.get(&node) {
            Some(n) => n.parent,
            None => return,
        };
        if let Some(p) = parent.and_then(|p| nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        Self::remove_subtree(&mut nodes, node);
    }

    fn request_frame(&self, callback: FrameCallback) {
        self.frames.borrow_mut().push_back(callback);
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.borrow().contains_key(&node)
    }

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        let mut matches: Vec<NodeId> = nodes
            .iter()
            .filter(|(_, n)| n.attributes.iter().any(|(k, v)| k == "id" && v == id))
            .map(|(node, _)| *node)
            .collect();
        // Earliest created wins, like document order for a static page.
        matches.sort();
        matches.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::handler;
    use std::rc::Rc;

    #[test]
    fn test_tree_edits_and_serialization() {
        let host = MemoryHost::new();
        let root = host.create_root("app");
        let p = host.create_element("p").unwrap();
        let text = host.create_text("a < b");
        host.set_attribute(p, "class", "note");
        host.set_attribute(p, "hidden", "");
        host.append_child(p, text);
        host.append_child(root, p);

        assert_eq!(host.text_content(root), "a < b");
        assert_eq!(
            host.to_html(root),
            "<div id=\"app\"><p class=\"note\" hidden>a &lt; b</p></div>"
        );
        assert_eq!(host.find_by_tag(root, "p"), vec![p]);
        assert_eq!(host.find_by_id("app"), Some(root));
        assert_eq!(host.find_by_id("missing"), None);
    }

    #[test]
    fn test_invalid_tag_rejected() {
        let host = MemoryHost::new();
        assert!(matches!(
            host.create_element(""),
            Err(HostError::InvalidTag(_))
        ));
        assert!(host.create_element("my tag").is_err());
    }

    #[test]
    fn test_clear_children_discards_subtree() {
        let host = MemoryHost::new();
        let root = host.create_root("app");
        let ul = host.create_element("ul").unwrap();
        let li = host.create_element("li").unwrap();
        host.append_child(ul, li);
        host.append_child(root, ul);
        assert_eq!(host.descendants(root), vec![ul, li]);

        host.clear_children(root);

        assert!(host.children(root).is_empty());
        assert!(!host.contains(ul));
        assert!(!host.contains(li));
        assert!(host.contains(root));
    }

    #[test]
    fn test_discard_detaches_and_frees_subtree() {
        let host = MemoryHost::new();
        let root = host.create_root("app");
        let ul = host.create_element("ul").unwrap();
        let li = host.create_element("li").unwrap();
        let loose = host.create_text("detached");
        host.append_child(ul, li);
        host.append_child(root, ul);
        host.add_listener(li, "click", handler(|_| {}));

        host.discard(ul);
        host.discard(loose);
        host.discard(ul);

        assert!(host.children(root).is_empty());
        assert_eq!(host.node_count(), 1);
        assert!(!host.contains(li));
    }

    #[test]
    fn test_ids_strictly_increase() {
        let host = MemoryHost::new();
        let a = host.create_text("a");
        let b = host.create_element("b").unwrap();
        let c = host.create_text("c");
        assert!(a < b && b < c);
    }

    #[test]
    fn test_dispatch_reaches_matching_listeners() {
        let host = MemoryHost::new();
        let button = host.create_element("button").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        host.add_listener(
            button,
            "click",
            handler(move |e| log.borrow_mut().push(e.kind.clone())),
        );

        assert_eq!(host.dispatch(button, "click"), 1);
        assert_eq!(host.dispatch(button, "input"), 0);
        assert_eq!(*seen.borrow(), vec!["click".to_string()]);
    }

    #[test]
    fn test_run_frame_defers_nested_requests() {
        let host = Rc::new(MemoryHost::new());
        let runs = Rc::new(Cell::new(0));

        let inner_host = host.clone();
        let inner_runs = runs.clone();
        host.request_frame(Box::new(move || {
            inner_runs.set(inner_runs.get() + 1);
            let again = inner_runs.clone();
            inner_host.request_frame(Box::new(move || again.set(again.get() + 1)));
        }));

        assert_eq!(host.run_frame(), 1);
        assert_eq!(runs.get(), 1);
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(host.run_frame(), 1);
        assert_eq!(runs.get(), 2);
    }
}
