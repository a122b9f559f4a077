//! Element factory

use std::rc::Rc;

use crate::vnode::{Child, NodeType, PropValue, Props, VirtualNode, CHILDREN};

/// Reserved tag resolving to [`NodeType::Fragment`]
pub const FRAGMENT: &str = "fragment";

/// A child as written at the call site, before normalization
///
/// `Null`, `Bool` and nested `List`s only exist here: the factory drops the
/// first two and splices lists into the surrounding sequence.
#[derive(Debug, Clone)]
pub enum ChildInput {
    Node(VirtualNode),
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
    List(Vec<ChildInput>),
}

impl ChildInput {
    fn flatten_into(self, out: &mut Vec<Child>) {
        match self {
            Self::Node(node) => out.push(Child::Node(node)),
            Self::Text(text) => out.push(Child::Text(text)),
            Self::Number(n) => out.push(Child::Number(n)),
            Self::Bool(_) | Self::Null => {}
            Self::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

impl From<VirtualNode> for ChildInput {
    fn from(node: VirtualNode) -> Self {
        Self::Node(node)
    }
}

impl From<Child> for ChildInput {
    fn from(child: Child) -> Self {
        match child {
            Child::Node(node) => Self::Node(node),
            Child::Text(text) => Self::Text(text),
            Child::Number(n) => Self::Number(n),
        }
    }
}

impl From<&str> for ChildInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ChildInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for ChildInput {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<()> for ChildInput {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

macro_rules! number_input {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ChildInput {
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

number_input!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<ChildInput>> From<Option<T>> for ChildInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<ChildInput>> From<Vec<T>> for ChildInput {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Build a virtual node
///
/// Children are flattened and stripped of `Null`/`Bool` entries. The
/// property bag is copied, never shared with the caller, and receives the
/// normalized list under `children`, replacing any caller-supplied entry.
pub fn create_element<T, I>(node_type: T, props: Option<Props>, children: I) -> VirtualNode
where
    T: Into<NodeType>,
    I: IntoIterator,
    I::Item: Into<ChildInput>,
{
    let mut flat = Vec::new();
    for child in children {
        child.into().flatten_into(&mut flat);
    }
    let children: Rc<[Child]> = flat.into();

    let mut props = props.unwrap_or_default();
    props.insert(CHILDREN, PropValue::Children(children.clone()));

    VirtualNode::from_parts(node_type.into(), props, children)
}

/// Build a fragment node
pub fn create_fragment<I>(props: Option<Props>, children: I) -> VirtualNode
where
    I: IntoIterator,
    I::Item: Into<ChildInput>,
{
    create_element(NodeType::Fragment, props, children)
}
