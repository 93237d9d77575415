// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_stack --heading-base-level=0

//! Trellis Stack: a push/pop stack whose transitions wait for the view.
//!
//! [`AsyncStack`] is the simpler of the two navigation models. Each pushed item moves through
//! [`StackItemStatus`]: `Pushing → Settled → Popping → Popped`. The move out of `Pushing` and
//! the move out of `Popping` happen only when the view layer acknowledges the matching
//! animation with [`AsyncStack::push_end`] or [`AsyncStack::pop_end`], and the [`StackItem`]
//! handle returned by [`AsyncStack::push`] carries a [`Completion`] future for each.
//!
//! Every transition is also reported as a [`StackEvent`]. Popping an item that is still
//! pushing settles it first, so the events for one item always arrive as
//! `PushStart, PushEnd, PopStart, PopEnd`.
//!
//! ## History replay
//!
//! [`AsyncStack::snapshot`] and [`AsyncStack::restore`] remember and replay the order of
//! visible items under a numeric key. [`sync_with_history`] drives them from a
//! [`LocationHistory`]: each visited entry gets a snapshot, and moving back restores it.
//!
//! ## Liveness
//!
//! Completions have no timeout. If the view never acknowledges a transition, the future
//! never resolves. It resolves to `Err(Canceled)` only when the item or the stack is
//! dropped.
//!
//! ## Example
//!
//! ```rust
//! use futures::executor::block_on;
//! use trellis_stack::{AsyncStack, StackItemStatus};
//!
//! let stack = AsyncStack::new();
//! let item = stack.push("details");
//!
//! // The view finished its enter animation.
//! stack.push_end(item.id);
//! block_on(item.pushed).unwrap();
//!
//! stack.pop();
//! assert_eq!(stack.state().top().unwrap().status(), StackItemStatus::Popping);
//!
//! // The view finished its exit animation.
//! stack.pop_end(item.id);
//! block_on(item.popped).unwrap();
//! assert!(stack.state().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod location;
mod stack;

pub use location::{
    DEFAULT_SCHEME, HistoryEntry, HistorySync, LocationConfig, LocationEvent, LocationHistory,
    LocationState, sync_with_history,
};
pub use stack::{
    AsyncStack, Canceled, Completion, PopCount, StackEntry, StackEvent, StackItem,
    StackItemStatus, StackState,
};
