//! Property bags attached to virtual nodes

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::events::EventHandler;
use crate::host::NodeId;
use crate::vnode::Child;

/// Key under which a node's normalized children are mirrored
pub const CHILDREN: &str = "children";

/// Mutable slot receiving the host node created for a `ref` prop
#[derive(Debug, Clone, Default)]
pub struct NodeRef {
    current: Rc<Cell<Option<NodeId>>>,
}

impl NodeRef {
    /// Create an empty ref
    pub fn new() -> Self {
        Self::default()
    }

    /// Node assigned by the most recent render, if any
    pub fn current(&self) -> Option<NodeId> {
        self.current.get()
    }

    /// Overwrite the slot
    pub fn set(&self, node: Option<NodeId>) {
        self.current.set(node);
    }
}

/// Value accepted by the `ref` prop
#[derive(Clone)]
pub enum RefTarget {
    /// Invoked with the created node
    Callback(Rc<dyn Fn(NodeId)>),
    /// Receives the created node in its `current` slot
    Cell(NodeRef),
}

impl RefTarget {
    /// Ref that calls `func` with the created node
    pub fn callback<F: Fn(NodeId) + 'static>(func: F) -> Self {
        Self::Callback(Rc::new(func))
    }

    /// Hand `node` to the target
    pub fn attach(&self, node: NodeId) {
        match self {
            Self::Callback(func) => func(node),
            Self::Cell(slot) => slot.set(Some(node)),
        }
    }
}

impl fmt::Debug for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("RefTarget::Callback"),
            Self::Cell(slot) => f.debug_tuple("RefTarget::Cell").field(slot).finish(),
        }
    }
}

/// Camel-case style declarations in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    /// Create an empty style map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a declaration, keeping the original position on replace
    pub fn set(mut self, property: impl Into<String>, value: impl ToString) -> Self {
        let property = property.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
        self
    }

    /// Declarations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(StyleMap::new(), |map, (k, v)| map.set(k, v))
    }
}

/// A single property value
#[derive(Clone)]
pub enum PropValue {
    /// Absent value; never applied
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Style given as a mapping
    Style(StyleMap),
    Handler(EventHandler),
    Ref(RefTarget),
    /// Normalized child list, only ever stored under [`CHILDREN`]
    Children(Rc<[Child]>),
    /// Opaque component data, never written to the host
    Any(Rc<dyn Any>),
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Style(s) => f.debug_tuple("Style").field(s).finish(),
            Self::Handler(h) => f.debug_tuple("Handler").field(h).finish(),
            Self::Ref(r) => f.debug_tuple("Ref").field(r).finish(),
            Self::Children(c) => write!(f, "Children([{} children])", c.len()),
            Self::Any(_) => f.write_str("Any(..)"),
        }
    }
}

impl PropValue {
    /// Wrap arbitrary component data
    pub fn any<T: Any>(value: T) -> Self {
        Self::Any(Rc::new(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            Self::Handler(h) => Some(h),
            _ => None,
        }
    }

    /// Downcast opaque component data
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Any(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! number_prop {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PropValue {
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

number_prop!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<StyleMap> for PropValue {
    fn from(value: StyleMap) -> Self {
        Self::Style(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        Self::Handler(value)
    }
}

impl From<RefTarget> for PropValue {
    fn from(value: RefTarget) -> Self {
        Self::Ref(value)
    }
}

impl From<NodeRef> for PropValue {
    fn from(value: NodeRef) -> Self {
        Self::Ref(RefTarget::Cell(value))
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Insertion-ordered property bag
#[derive(Debug, Clone, Default)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    /// Create an empty property bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Props::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace an entry, keeping the original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropValue::as_number)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PropValue::as_bool)
    }

    pub fn get_handler(&self, key: &str) -> Option<&EventHandler> {
        self.get(key).and_then(PropValue::as_handler)
    }

    pub fn get_any<T: Any>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(PropValue::downcast_ref::<T>)
    }

    /// The mirrored child list, empty when the bag was never attached to a node
    pub fn children(&self) -> &[Child] {
        match self.get(CHILDREN) {
            Some(PropValue::Children(children)) => &children[..],
            _ => &[],
        }
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
