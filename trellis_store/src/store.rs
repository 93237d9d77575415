// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The store itself: state slot, listener list, and batching.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

/// Identifier of a listener registered on a [`Store`] or an [`Emitter`](crate::Emitter).
///
/// Identifiers are never reused within the store or emitter that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

type Listener<T> = Rc<dyn Fn(&Rc<T>)>;

struct Shared<T> {
    state: RefCell<Rc<T>>,
    initial: Rc<T>,
    listeners: RefCell<Vec<(ListenerId, Listener<T>)>>,
    next_listener: Cell<u64>,
    batch_depth: Cell<u32>,
    pending: Cell<bool>,
}

/// Shared, copy-on-write state container.
///
/// A `Store` is a cheap handle: clones refer to the same state and listener list.
///
/// ## Example
///
/// ```rust
/// use std::rc::Rc;
/// use trellis_store::Store;
///
/// let store = Store::new(vec![1, 2, 3]);
/// let before = store.state();
///
/// // Returning the same `Rc` is a no-op.
/// assert!(!store.set_state(|s| Rc::clone(s)));
/// assert!(Rc::ptr_eq(&before, &store.state()));
///
/// // Returning a new `Rc` installs it.
/// assert!(store.set_state(|s| {
///     let mut next = (**s).clone();
///     next.push(4);
///     Rc::new(next)
/// }));
/// assert_eq!(*store.state(), vec![1, 2, 3, 4]);
/// ```
pub struct Store<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.shared.state.borrow())
            .field("listeners", &self.shared.listeners.borrow().len())
            .field("batch_depth", &self.shared.batch_depth.get())
            .finish_non_exhaustive()
    }
}

impl<T: Default + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> Store<T> {
    /// Create a store holding `initial`.
    pub fn new(initial: T) -> Self {
        Self::from_rc(Rc::new(initial))
    }

    /// Create a store from an already shared initial state.
    pub fn from_rc(initial: Rc<T>) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(Rc::clone(&initial)),
                initial,
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                batch_depth: Cell::new(0),
                pending: Cell::new(false),
            }),
        }
    }

    /// Current state.
    pub fn state(&self) -> Rc<T> {
        Rc::clone(&self.shared.state.borrow())
    }

    /// The state this store was created with.
    pub fn initial_state(&self) -> Rc<T> {
        Rc::clone(&self.shared.initial)
    }

    /// Run `update` against the current state and install its result.
    ///
    /// If `update` returns the very same `Rc` it was given, nothing happens and no
    /// listener runs. Otherwise the new state is installed and every listener runs before
    /// this returns (or once the outermost [`Store::batch`] ends).
    ///
    /// Returns `true` if the state changed.
    pub fn set_state(&self, update: impl FnOnce(&Rc<T>) -> Rc<T>) -> bool {
        let current = self.state();
        let next = update(&current);
        if Rc::ptr_eq(&current, &next) {
            return false;
        }
        *self.shared.state.borrow_mut() = next;
        self.notify();
        true
    }

    /// Install `next` unconditionally.
    pub fn replace(&self, next: T) {
        self.set_state(|_| Rc::new(next));
    }

    /// Register a listener that runs after every state change.
    pub fn subscribe(&self, listener: impl Fn(&Rc<T>) + 'static) -> ListenerId {
        let id = ListenerId(self.shared.next_listener.get());
        self.shared.next_listener.set(id.0 + 1);
        self.shared
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(l, _)| *l != id);
        listeners.len() != before
    }

    /// Whether `id` is currently registered.
    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.shared
            .listeners
            .borrow()
            .iter()
            .any(|(l, _)| *l == id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }

    /// Defer notifications until `f` returns.
    ///
    /// Writes inside `f` are applied immediately (reads see them), but listeners run once,
    /// after the outermost batch ends, and only if at least one write changed the state.
    /// Selectors still compare against the last slice they delivered, so an observer whose
    /// slice ends up unchanged is not notified.
    ///
    /// If `f` panics the batch still ends. Notifications it deferred go out with the next
    /// change.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        let depth = self.shared.batch_depth.get();
        self.shared.batch_depth.set(depth + 1);
        let out = {
            let _restore = BatchDepth {
                depth: &self.shared.batch_depth,
                outer: depth,
            };
            f()
        };
        if depth == 0 && self.shared.pending.replace(false) {
            self.fan_out();
        }
        out
    }

    fn notify(&self) {
        if self.shared.batch_depth.get() > 0 {
            self.shared.pending.set(true);
            return;
        }
        self.shared.pending.set(false);
        self.fan_out();
    }

    fn fan_out(&self) {
        // Snapshot so listeners may (un)subscribe while we iterate.
        let listeners: Vec<(ListenerId, Listener<T>)> = self.shared.listeners.borrow().clone();
        for (id, listener) in listeners {
            if !self.is_subscribed(id) {
                continue;
            }
            let state = self.state();
            listener(&state);
        }
    }
}

/// Puts the batch depth back when a batch body returns or unwinds.
struct BatchDepth<'a> {
    depth: &'a Cell<u32>,
    outer: u32,
}

impl Drop for BatchDepth<'_> {
    fn drop(&mut self) {
        self.depth.set(self.outer);
    }
}
