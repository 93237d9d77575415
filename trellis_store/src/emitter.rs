// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small typed event channel.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::store::ListenerId;

type Handler<P> = Rc<dyn Fn(&P)>;

/// Synchronous event emitter keyed by an event tag `E`, carrying payload `P`.
///
/// Handlers for an event run in registration order during [`Emitter::emit`]. Like
/// [`Store`](crate::Store), no borrow is held while a handler runs, so handlers may listen,
/// unlisten, or emit again.
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use trellis_store::Emitter;
///
/// #[derive(Copy, Clone, Debug, PartialEq)]
/// enum Lifecycle {
///     Open,
///     Close,
/// }
///
/// let emitter: Emitter<Lifecycle, u32> = Emitter::new();
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&log);
/// emitter.listen(Lifecycle::Open, move |id| sink.borrow_mut().push(*id));
///
/// emitter.emit(Lifecycle::Open, &1);
/// emitter.emit(Lifecycle::Close, &2);
/// assert_eq!(*log.borrow(), vec![1]);
/// ```
pub struct Emitter<E, P> {
    handlers: RefCell<Vec<(ListenerId, E, Handler<P>)>>,
    next_id: Cell<u64>,
}

impl<E: fmt::Debug, P> fmt::Debug for Emitter<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.borrow();
        f.debug_struct("Emitter")
            .field(
                "events",
                &handlers.iter().map(|(_, e, _)| e).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl<E: PartialEq + Copy, P: 'static> Default for Emitter<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PartialEq + Copy, P: 'static> Emitter<E, P> {
    /// Create an emitter with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Run `handler` every time `event` is emitted.
    pub fn listen(&self, event: E, handler: impl Fn(&P) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers
            .borrow_mut()
            .push((id, event, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(h, _, _)| *h != id);
        handlers.len() != before
    }

    /// Deliver `payload` to every handler of `event`.
    pub fn emit(&self, event: E, payload: &P) {
        let matching: Vec<(ListenerId, Handler<P>)> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(id, _, h)| (*id, Rc::clone(h)))
            .collect();
        for (id, handler) in matching {
            if self.handlers.borrow().iter().any(|(h, _, _)| *h == id) {
                handler(payload);
            }
        }
    }

    /// Number of handlers registered for `event`.
    pub fn listener_count(&self, event: E) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .count()
    }
}
