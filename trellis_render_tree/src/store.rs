// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable render tree: a [`Store`] of [`RenderTree`] snapshots plus id generation.

use alloc::format;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;
use trellis_store::{ListenerId, Selection, Store, option_rc_ptr_eq};

use crate::tree::RenderTree;
use crate::types::{NodeChanges, RenderNode, RenderTreeError};

/// Shared, observable render tree.
///
/// Every successful change installs a new [`RenderTree`] snapshot and notifies subscribers
/// before returning. Calls that change nothing keep the current snapshot and notify no one.
///
/// Cloning the store clones the handle; containers all over the UI hold clones of one store.
///
/// ## Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use trellis_render_tree::{RenderTreeStore, kinds};
///
/// let tree = RenderTreeStore::new();
/// tree.register("main", kinds::STACK, None, true).unwrap();
///
/// let depth_changes = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&depth_changes);
/// let depth = tree.select_depth("nested", move |_| seen.set(seen.get() + 1));
/// assert_eq!(depth.get(), None);
///
/// tree.register("nested", kinds::STACK, Some("main"), true).unwrap();
/// assert_eq!(depth.get(), Some(2));
/// assert_eq!(depth_changes.get(), 1);
///
/// assert_eq!(tree.resolve(None, kinds::STACK).as_deref(), Some("nested"));
/// assert_eq!(tree.resolve(Some("main"), kinds::STACK).as_deref(), Some("main"));
/// ```
#[derive(Clone)]
pub struct RenderTreeStore {
    store: Store<RenderTree>,
    counters: Rc<RefCell<HashMap<Rc<str>, u64>>>,
}

impl fmt::Debug for RenderTreeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTreeStore")
            .field("store", &self.store)
            .field("counters", &self.counters.borrow())
            .finish()
    }
}

impl Default for RenderTreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTreeStore {
    /// Create a store holding an empty tree (root only).
    pub fn new() -> Self {
        Self {
            store: Store::new(RenderTree::new()),
            counters: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Store<RenderTree> {
        &self.store
    }

    /// Current snapshot.
    pub fn state(&self) -> Rc<RenderTree> {
        self.store.state()
    }

    /// Register or update a node. See [`RenderTree::register`].
    ///
    /// Subscribers are notified only when the returned [`NodeChanges`] is non-empty.
    pub fn register(
        &self,
        id: &str,
        kind: &str,
        parent: Option<&str>,
        active: bool,
    ) -> Result<NodeChanges, RenderTreeError> {
        let current = self.store.state();
        if current.registration_changes(id, kind, parent, active)?.is_empty() {
            return Ok(NodeChanges::empty());
        }
        let mut next = (*current).clone();
        let changes = next.register(id, kind, parent, active)?;
        if !changes.is_empty() {
            self.store.set_state(|_| Rc::new(next));
        }
        Ok(changes)
    }

    /// Remove a node and its subtree in one transition. See [`RenderTree::unregister`].
    pub fn unregister(&self, id: &str) -> bool {
        let mut next = (*self.store.state()).clone();
        if !next.unregister(id) {
            return false;
        }
        self.store.set_state(|_| Rc::new(next));
        true
    }

    /// Generate a fresh id of the form `rt:<kind>-<n>`.
    ///
    /// Counters are per kind and per store, starting at 1.
    pub fn generate_id(&self, kind: &str) -> Rc<str> {
        let mut counters = self.counters.borrow_mut();
        let n = match counters.get_mut(kind) {
            Some(n) => {
                *n += 1;
                *n
            }
            None => {
                counters.insert(kind.into(), 1);
                1
            }
        };
        format!("rt:{kind}-{n}").into()
    }

    /// The explicit id if given, otherwise the deepest active node of `kind`.
    ///
    /// An explicit id is returned as is, registered or not.
    pub fn resolve(&self, explicit: Option<&str>, kind: &str) -> Option<Rc<str>> {
        if let Some(id) = explicit {
            return Some(id.into());
        }
        self.store
            .state()
            .deepest_active_of_type(kind)
            .map(|n| Rc::clone(&n.id))
    }

    /// Register a listener for every tree change.
    pub fn subscribe(&self, listener: impl Fn(&Rc<RenderTree>) + 'static) -> ListenerId {
        self.store.subscribe(listener)
    }

    /// Remove a listener.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Observe one node's snapshot.
    ///
    /// Fires when the node appears, disappears, or is replaced. Changes elsewhere in the tree
    /// that leave this node untouched do not fire.
    pub fn select_node(
        &self,
        id: &str,
        listener: impl Fn(&Option<Rc<RenderNode>>) + 'static,
    ) -> Selection<Option<Rc<RenderNode>>> {
        let id: Rc<str> = id.into();
        self.store.select_with(
            move |tree| tree.node_rc(&id).cloned(),
            option_rc_ptr_eq,
            listener,
        )
    }

    /// Observe one node's type-scoped depth.
    pub fn select_depth(
        &self,
        id: &str,
        listener: impl Fn(&Option<u32>) + 'static,
    ) -> Selection<Option<u32>> {
        let id: Rc<str> = id.into();
        self.store.select(move |tree| tree.depth(&id), listener)
    }

    /// Observe one node's inherited activity. Unknown ids read as inactive.
    pub fn select_active(&self, id: &str, listener: impl Fn(&bool) + 'static) -> Selection<bool> {
        let id: Rc<str> = id.into();
        self.store.select(move |tree| tree.is_active(&id), listener)
    }

    /// Observe an arbitrary slice of the tree with a custom equality.
    pub fn select_in<S, F, E, L>(&self, selector: F, is_equal: E, listener: L) -> Selection<S>
    where
        S: 'static,
        F: Fn(&RenderTree) -> S + 'static,
        E: Fn(&S, &S) -> bool + 'static,
        L: Fn(&S) + 'static,
    {
        self.store.select_with(selector, is_equal, listener)
    }

    /// Emit the nested debug tree through the `log` facade at debug level.
    pub fn log_debug_tree(&self, label: &str) {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("{label}\n{}", self.store.state().debug_tree());
        }
    }
}
