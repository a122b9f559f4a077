//! Virtual node model
//!
//! A [`VirtualNode`] is an immutable description of one UI node: an element,
//! a fragment or a component invocation, together with its property bag and
//! normalized children. Producing new UI means producing a new tree; existing
//! nodes are never mutated.

mod element;
mod props;


pub use element::{create_element, create_fragment, ChildInput, FRAGMENT};
pub use props::{NodeRef, PropValue, Props, RefTarget, StyleMap, CHILDREN};

use std::fmt;
use std::rc::Rc;

use crate::state::Hooks;

/// Signature of a component body
pub type ComponentFn = dyn Fn(&Props, &Hooks) -> Child;

/// A named component function
///
/// Components receive their property bag (including `children`) and the
/// render-session [`Hooks`] and return a single child to render in their
/// place.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    func: Rc<ComponentFn>,
}

impl Component {
    /// Wrap a component body
    pub fn new<F>(name: &'static str, func: F) -> Self
    where
        F: Fn(&Props, &Hooks) -> Child + 'static,
    {
        Self {
            name,
            func: Rc::new(func),
        }
    }

    /// Name used in logs and debug output
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Evaluate the component body
    pub fn call(&self, props: &Props, hooks: &Hooks) -> Child {
        (self.func)(props, hooks)
    }

    /// Whether both handles wrap the same function
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("name", &self.name).finish()
    }
}

/// What a virtual node stands for, resolved once at construction
#[derive(Debug, Clone)]
pub enum NodeType {
    /// Host element with a tag name
    Element(String),
    /// Children grouped without a wrapper element
    Fragment,
    /// Component invocation
    Component(Component),
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        if tag == FRAGMENT {
            Self::Fragment
        } else {
            Self::Element(tag.to_string())
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        if tag == FRAGMENT {
            Self::Fragment
        } else {
            Self::Element(tag)
        }
    }
}

impl From<Component> for NodeType {
    fn from(component: Component) -> Self {
        Self::Component(component)
    }
}

/// A normalized child: a node or leaf content
#[derive(Debug, Clone)]
pub enum Child {
    Node(VirtualNode),
    Text(String),
    Number(f64),
}

impl Child {
    pub fn as_node(&self) -> Option<&VirtualNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Equality of leaves by value and of nodes by identity
impl PartialEq for Child {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Node(a), Self::Node(b)) => a.ptr_eq(b),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            _ => false,
        }
    }
}

impl From<VirtualNode> for Child {
    fn from(node: VirtualNode) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

macro_rules! number_child {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Child {
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

number_child!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

#[derive(Debug)]
struct NodeData {
    node_type: NodeType,
    props: Props,
    children: Rc<[Child]>,
}

/// Immutable virtual node; clones share the same data
#[derive(Debug, Clone)]
pub struct VirtualNode {
    data: Rc<NodeData>,
}

impl VirtualNode {
    /// Assemble a node; `props` must already mirror `children`
    pub(crate) fn from_parts(node_type: NodeType, props: Props, children: Rc<[Child]>) -> Self {
        Self {
            data: Rc::new(NodeData {
                node_type,
                props,
                children,
            }),
        }
    }

    pub fn node_type(&self) -> &NodeType {
        &self.data.node_type
    }

    /// Property bag, including the mirrored `children` entry
    pub fn props(&self) -> &Props {
        &self.data.props
    }

    pub fn children(&self) -> &[Child] {
        &self.data.children
    }

    /// Shared handle to the child list
    pub fn children_rc(&self) -> &Rc<[Child]> {
        &self.data.children
    }

    /// Tag name for element nodes
    pub fn tag(&self) -> Option<&str> {
        match self.data.node_type {
            NodeType::Element(ref tag) => Some(tag),
            _ => None,
        }
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}
