// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_render_tree --heading-base-level=0

//! Trellis Render Tree: one shared registry for nested UI containers.
//!
//! Stacks, tab groups, screens, panels, and overlays register themselves here as they mount,
//! so cross-cutting questions get one generic answer:
//!
//! - How deep is this stack nested inside other stacks? ([`RenderTree::depth`])
//! - Is this screen visible once every ancestor is taken into account? ([`RenderTree::is_active`])
//! - Which container should an untargeted action apply to? ([`RenderTree::deepest_active_of_type`])
//!
//! ## Lifecycle contract
//!
//! Containers call [`RenderTreeStore::register`] on mount and again whenever their kind,
//! parent, or activity changes, then [`RenderTreeStore::unregister`] exactly once on unmount.
//! Parents register before their children. Unregistering a node removes its whole subtree in
//! one transition, so observers never see a half-removed subtree.
//!
//! ## Derived values
//!
//! - *Depth* is type-scoped: the number of nodes of the node's own kind on the path to the
//!   root, inclusive. A stack inside a panel inside a stack has depth 2.
//! - *Activity* is inherited: a node is active only if it and every ancestor are active.
//!
//! Both are cached on each [`RenderNode`] and recomputed for the affected subtree as part of
//! the change that invalidated them.
//!
//! ## Resolution
//!
//! [`RenderTree::deepest_active_of_type`] picks, among active nodes of a kind, the one with the
//! greatest depth. Ties go to the most recently registered node.
//!
//! ## API overview
//!
//! - [`RenderTree`]: the pure tree with registration and queries.
//! - [`RenderTreeStore`]: observable wrapper with selectors, id generation, and resolution.
//! - [`RenderNode`]: immutable node snapshot.
//! - [`NodeChanges`]: what a registration changed.
//! - [`DebugNode`]: nested snapshot for inspection, printable with `Display`.
//! - [`kinds`]: the kind tags the Trellis crates agree on.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod debug;
mod store;
mod tree;
mod types;

pub use debug::DebugNode;
pub use store::RenderTreeStore;
pub use tree::{Ancestors, Iter, RenderTree};
pub use types::{NodeChanges, ROOT_ID, ROOT_KIND, RenderNode, RenderTreeError, kinds};
