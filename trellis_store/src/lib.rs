// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_store --heading-base-level=0

//! Trellis Store: a copy-on-write state container with selector subscriptions.
//!
//! Trellis Store is the leaf building block for the other Trellis crates.
//!
//! - [`Store`] holds an `Rc<T>` and replaces it wholesale on every update. An updater that
//!   returns the same `Rc` is a no-op, so "nothing changed" is detected by pointer identity.
//! - Subscribers run synchronously, in registration order, before [`Store::set_state`] returns.
//! - [`Store::select`] / [`Store::select_with`] register a pure function of state plus an
//!   equality check; the listener only runs when the derived slice actually changes.
//! - [`Emitter`] is a small typed event channel for lifecycle events that are not state.
//!
//! There is no global state: every store is an explicit value, and cloning a [`Store`] clones
//! the handle, not the state.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use trellis_store::Store;
//!
//! #[derive(Debug, Default)]
//! struct Counters {
//!     left: u32,
//!     right: u32,
//! }
//!
//! let store = Store::new(Counters::default());
//! let fired = Rc::new(Cell::new(0));
//!
//! // Only interested in `left`.
//! let seen = Rc::clone(&fired);
//! let left = store.select(|s: &Counters| s.left, move |_| seen.set(seen.get() + 1));
//!
//! store.set_state(|s| Rc::new(Counters { right: s.right + 1, ..**s }));
//! assert_eq!(fired.get(), 0);
//!
//! store.set_state(|s| Rc::new(Counters { left: s.left + 1, ..**s }));
//! assert_eq!(fired.get(), 1);
//! assert_eq!(left.get(), 1);
//! ```
//!
//! ## Re-entrancy
//!
//! No internal borrow is held while a listener runs, so listeners may read any store and
//! call [`Store::set_state`] again. A nested update fans out completely before the outer
//! fan-out continues; each listener always observes the state current at the moment it runs.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod emitter;
mod selector;
mod store;

pub use emitter::Emitter;
pub use selector::{Selection, option_rc_ptr_eq, rc_ptr_eq};
pub use store::{ListenerId, Store};
