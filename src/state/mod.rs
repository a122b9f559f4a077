//! Positional state hooks
//!
//! State lives in a [`SlotStore`]: an ordered sequence of type-erased slots
//! shared by every render pass of a runtime. Each pass creates a fresh
//! [`Hooks`] session whose cursor starts at zero, so the n-th `use_state`
//! call of a pass always binds to slot n-1. Slot identity is purely
//! positional; there is no per-component-instance scoping.


use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt;
use std::rc::{Rc, Weak};

/// Receiver of re-render requests issued by state setters
pub trait RenderRequest {
    /// Ask for a re-render; implementations coalesce repeated requests
    fn request_render(self: Rc<Self>);
}

/// Errors raised when hook calls do not line up with stored slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// The slot at `index` holds a value of a different type
    TypeMismatch {
        /// Slot position
        index: usize,
        /// Type requested by the caller
        expected: &'static str,
    },
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { index, expected } => write!(
                f,
                "Hook slot {} does not hold a {}; state hooks must be called in the same order on every render",
                index, expected
            ),
        }
    }
}

impl Error for HookError {}

type Slot = Option<Box<dyn Any>>;

/// Ordered hook slots shared across render passes
#[derive(Clone, Default)]
pub struct SlotStore {
    slots: Rc<RefCell<Vec<Slot>>>,
}

impl fmt::Debug for SlotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotStore")
            .field("slots", &format!("[{} slots]", self.len()))
            .finish()
    }
}

impl SlotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots ever initialised
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone the value held at `index`, if it has type `T`
    pub fn get<T: Clone + 'static>(&self, index: usize) -> Option<T> {
        self.slots
            .borrow()
            .get(index)
            .and_then(Option::as_ref)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Overwrite the value at `index`, growing the store if needed
    pub fn set<T: 'static>(&self, index: usize, value: T) {
        let mut slots = self.slots.borrow_mut();
        if slots.len() <= index {
            slots.resize_with(index + 1, || None);
        }
        slots[index] = Some(Box::new(value));
    }

    /// Initialise the slot at `index` unless it already holds a value
    ///
    /// Fails when an existing value has a type other than `T`.
    fn ensure<T: 'static>(&self, index: usize, initial: &T) -> Result<(), HookError>
    where
        T: Clone,
    {
        let occupied = match self.slots.borrow().get(index) {
            Some(Some(value)) => Some(value.is::<T>()),
            _ => None,
        };
        match occupied {
            Some(true) => Ok(()),
            Some(false) => Err(HookError::TypeMismatch {
                index,
                expected: type_name::<T>(),
            }),
            None => {
                log::trace!("initialising hook slot {index} as {}", type_name::<T>());
                self.set(index, initial.clone());
                Ok(())
            }
        }
    }
}

/// Render-session context handed to component functions
///
/// A `Hooks` value exists only for the duration of one render pass, which
/// makes calling a hook outside a pass impossible.
pub struct Hooks {
    store: SlotStore,
    cursor: Cell<usize>,
    requester: Weak<dyn RenderRequest>,
    failure: RefCell<Option<HookError>>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("store", &self.store)
            .field("cursor", &self.cursor.get())
            .finish()
    }
}

impl Hooks {
    /// Start a session with the cursor at zero
    pub fn new(store: SlotStore, requester: Weak<dyn RenderRequest>) -> Self {
        Self {
            store,
            cursor: Cell::new(0),
            requester,
            failure: RefCell::new(None),
        }
    }

    /// Number of hooks called so far in this pass
    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    /// Take the first hook failure recorded in this session
    pub fn take_failure(&self) -> Option<HookError> {
        self.failure.borrow_mut().take()
    }

    /// Bind the next slot, initialising it with `initial` on first use
    ///
    /// # Panics
    ///
    /// Panics when the slot already holds a value of another type, which
    /// means hooks were called in a different order than on a previous pass.
    /// Use [`Hooks::try_use_state`] to handle that case instead.
    pub fn use_state<T: Clone + 'static>(&self, initial: T) -> (StateGetter<T>, StateSetter<T>) {
        match self.try_use_state(initial) {
            Ok(pair) => pair,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`Hooks::use_state`]
    ///
    /// The cursor advances even on failure so later hooks keep their slots.
    /// The first failure of a session is also kept for the renderer, which
    /// aborts the pass once the failing component returns.
    pub fn try_use_state<T: Clone + 'static>(
        &self,
        initial: T,
    ) -> Result<(StateGetter<T>, StateSetter<T>), HookError> {
        let index = self.cursor.get();
        self.cursor.set(index + 1);
        if let Err(err) = self.store.ensure(index, &initial) {
            self.failure.borrow_mut().get_or_insert_with(|| err.clone());
            return Err(err);
        }

        let getter = StateGetter {
            store: self.store.clone(),
            index,
            initial,
        };
        let setter = StateSetter {
            store: self.store.clone(),
            index,
            requester: self.requester.clone(),
            _marker: std::marker::PhantomData,
        };
        Ok((getter, setter))
    }
}

/// Reads the live value of one hook slot
#[derive(Clone)]
pub struct StateGetter<T> {
    store: SlotStore,
    index: usize,
    initial: T,
}

impl<T: fmt::Debug> fmt::Debug for StateGetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGetter")
            .field("index", &self.index)
            .field("initial", &self.initial)
            .finish()
    }
}

impl<T: Clone + 'static> StateGetter<T> {
    /// Current slot value, or the initial value if the slot is empty
    pub fn get(&self) -> T {
        self.store
            .get::<T>(self.index)
            .unwrap_or_else(|| self.initial.clone())
    }

    /// Slot position
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Writes one hook slot and schedules a re-render
pub struct StateSetter<T> {
    store: SlotStore,
    index: usize,
    requester: Weak<dyn RenderRequest>,
    _marker: std::marker::PhantomData<fn(T)>,
}

impl<T> Clone for StateSetter<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            index: self.index,
            requester: self.requester.clone(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> fmt::Debug for StateSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSetter")
            .field("index", &self.index)
            .finish()
    }
}

impl<T: 'static> StateSetter<T> {
    /// Overwrite the slot and request a re-render
    ///
    /// There is no equality check: setting an unchanged value still
    /// re-renders.
    pub fn set(&self, value: T) {
        self.store.set(self.index, value);
        match self.requester.upgrade() {
            Some(requester) => requester.request_render(),
            None => log::warn!("state slot {} set after its runtime was dropped", self.index),
        }
    }

    /// Slot position
    pub fn index(&self) -> usize {
        self.index
    }
}
