// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector subscriptions: derived slices with change detection.
//!
//! A selection pairs a pure function of state with an equality check. The function re-runs
//! on every store change, and the listener only fires when the new slice is unequal to the
//! previously delivered one. This is what keeps an observer of one subtree quiet while an
//! unrelated subtree is being mutated.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::store::{ListenerId, Store};

/// Reference equality for shared slices.
///
/// Use with [`Store::select_with`] when the slice is an `Rc` taken from copy-on-write state:
/// unchanged parts of the state keep their identity, changed parts get a new allocation.
pub fn rc_ptr_eq<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    Rc::ptr_eq(a, b)
}

/// Reference equality for optional shared slices. Two `None`s are equal.
pub fn option_rc_ptr_eq<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Handle to a live selector subscription.
///
/// The handle caches the last delivered slice. Dropping the handle does not unsubscribe;
/// call [`Selection::unsubscribe`] with the originating store.
pub struct Selection<S> {
    id: ListenerId,
    slice: Rc<RefCell<Rc<S>>>,
}

impl<S: fmt::Debug> fmt::Debug for Selection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("id", &self.id)
            .field("slice", &*self.slice.borrow())
            .finish()
    }
}

impl<S> Selection<S> {
    /// Listener identifier on the originating store.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The most recently delivered slice.
    pub fn current(&self) -> Rc<S> {
        Rc::clone(&self.slice.borrow())
    }

    /// Clone of the most recently delivered slice.
    pub fn get(&self) -> S
    where
        S: Clone,
    {
        (**self.slice.borrow()).clone()
    }

    /// Borrow the most recently delivered slice.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let slice = self.current();
        f(&slice)
    }

    /// Stop receiving updates from `store`.
    pub fn unsubscribe<T: 'static>(&self, store: &Store<T>) -> bool {
        store.unsubscribe(self.id)
    }
}

impl<T: 'static> Store<T> {
    /// Subscribe to a derived slice compared with `PartialEq`.
    ///
    /// `listener` runs only when the slice changes. See [`Store::select_with`].
    pub fn select<S, F, L>(&self, selector: F, listener: L) -> Selection<S>
    where
        S: PartialEq + 'static,
        F: Fn(&T) -> S + 'static,
        L: Fn(&S) + 'static,
    {
        self.select_with(selector, |a: &S, b: &S| a == b, listener)
    }

    /// Subscribe to a derived slice compared with `is_equal`.
    ///
    /// The selector runs immediately to seed the cached slice; the listener is not called
    /// for that initial value. Afterwards, on every state change the selector re-runs and
    /// the listener fires with the new slice if `is_equal(previous, next)` is `false`.
    pub fn select_with<S, F, E, L>(&self, selector: F, is_equal: E, listener: L) -> Selection<S>
    where
        S: 'static,
        F: Fn(&T) -> S + 'static,
        E: Fn(&S, &S) -> bool + 'static,
        L: Fn(&S) + 'static,
    {
        let slice = Rc::new(RefCell::new(Rc::new(selector(&self.state()))));
        let cached = Rc::clone(&slice);
        let id = self.subscribe(move |state| {
            let next = selector(state);
            let previous = Rc::clone(&cached.borrow());
            if is_equal(&previous, &next) {
                return;
            }
            let next = Rc::new(next);
            *cached.borrow_mut() = Rc::clone(&next);
            listener(&next);
        });
        Selection { id, slice }
    }
}
