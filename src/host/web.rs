//! Browser DOM host backed by `web-sys`

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, Node, Window};

use crate::events::{EventHandler, HostEvent};
use crate::host::{FrameCallback, Host, HostError, NodeId};

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// Host that renders into the live browser document
///
/// Node handles map to `web_sys::Node`s kept in a table; listener closures
/// are retained until their node is discarded by `clear_children`.
pub struct DomHost {
    window: Window,
    document: Document,
    nodes: RefCell<HashMap<NodeId, Node>>,
    children: RefCell<HashMap<NodeId, Vec<NodeId>>>,
    listeners: RefCell<HashMap<NodeId, Vec<Listener>>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomHost")
            .field("nodes", &self.nodes.borrow().len())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

impl DomHost {
    /// Bind to the global window and document
    pub fn new() -> Result<Self, HostError> {
        let window =
            web_sys::window().ok_or_else(|| HostError::Unavailable("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| HostError::Unavailable("no document".to_string()))?;
        Ok(Self {
            window,
            document,
            nodes: RefCell::new(HashMap::new()),
            children: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        })
    }

    fn register(&self, node: Node) -> NodeId {
        let id = NodeId::new(self.next_id.get());
        self.next_id.set(id.value() + 1);
        self.nodes.borrow_mut().insert(id, node);
        id
    }

    fn node(&self, id: NodeId) -> Option<Node> {
        self.nodes.borrow().get(&id).cloned()
    }

    fn forget_subtree(&self, id: NodeId) {
        self.nodes.borrow_mut().remove(&id);
        self.listeners.borrow_mut().remove(&id);
        let children = self.children.borrow_mut().remove(&id).unwrap_or_default();
        for child in children {
            self.forget_subtree(child);
        }
    }
}

impl Host for DomHost {
    fn create_element(&self, tag: &str) -> Result<NodeId, HostError> {
        let element = self
            .document
            .create_element(tag)
            .map_err(|_| HostError::InvalidTag(tag.to_string()))?;
        Ok(self.register(element.unchecked_into::<Node>()))
    }

    fn create_text(&self, text: &str) -> NodeId {
        let text = self.document.create_text_node(text);
        self.register(text.unchecked_into::<Node>())
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self
            .node(node)
            .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
        else {
            log::warn!("set_attribute on non-element {node}");
            return;
        };
        if let Err(err) = element.set_attribute(name, value) {
            log::warn!("set_attribute({name}) failed on {node}: {err:?}");
        }
    }

    fn add_listener(&self, node: NodeId, event: &str, handler: EventHandler) {
        let Some(target) = self.node(node) else {
            log::warn!("add_listener on unknown node {node}");
            return;
        };
        let kind = event.to_string();
        let closure: Listener = Closure::new(move |raw: web_sys::Event| {
            let mut payload = HostEvent::new(kind.clone(), node);
            if let Some(input) = raw
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            {
                payload = payload.with_value(input.value());
            }
            handler.call(&payload);
        });
        if let Err(err) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("add_event_listener({event}) failed on {node}: {err:?}");
            return;
        }
        self.listeners
            .borrow_mut()
            .entry(node)
            .or_default()
            .push(closure);
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        let (Some(p), Some(c)) = (self.node(parent), self.node(child)) else {
            log::warn!("append_child with unknown node ({parent} <- {child})");
            return;
        };
        match p.append_child(&c) {
            Ok(_) => self
                .children
                .borrow_mut()
                .entry(parent)
                .or_default()
                .push(child),
            Err(err) => log::warn!("append_child failed ({parent} <- {child}): {err:?}"),
        }
    }

    fn clear_children(&self, node: NodeId) {
        let Some(target) = self.node(node) else {
            return;
        };
        target.set_text_content(None);
        let children = self.children.borrow_mut().remove(&node).unwrap_or_default();
        for child in children {
            self.forget_subtree(child);
        }
    }

    fn discard(&self, node: NodeId) {
        let Some(target) = self.node(node) else {
            return;
        };
        if let Some(parent) = target.parent_node() {
            if let Err(err) = parent.remove_child(&target) {
                log::warn!("remove_child failed for {node}: {err:?}");
            }
        }
        for siblings in self.children.borrow_mut().values_mut() {
            siblings.retain(|c| *c != node);
        }
        self.forget_subtree(node);
    }

    fn request_frame(&self, callback: FrameCallback) {
        let js = Closure::once_into_js(move || callback());
        if let Err(err) = self.window.request_animation_frame(js.unchecked_ref()) {
            log::error!("request_animation_frame failed: {err:?}");
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.borrow().contains_key(&node)
    }

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let element = self.document.get_element_by_id(id)?;
        let node: Node = element.unchecked_into();
        let known = self
            .nodes
            .borrow()
            .iter()
            .find(|(_, n)| n.is_same_node(Some(&node)))
            .map(|(id, _)| *id);
        Some(known.unwrap_or_else(|| self.register(node)))
    }
}
