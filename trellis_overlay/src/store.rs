// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic overlay store shared by toasts, sheets, and modals.

use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use trellis_render_tree::RenderTreeStore;
use trellis_store::{ListenerId, Selection, Store, option_rc_ptr_eq};

/// Lifecycle of a presented overlay.
///
/// `Opening → Open` once the view reports it finished appearing, `Opening | Open → Closing`
/// on dismissal, and a closing entry is removed once the view reports it finished
/// disappearing. Nothing moves backwards out of `Closing`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverlayStatus {
    /// Presented, appear transition running.
    Opening,
    /// Fully visible.
    Open,
    /// Dismissed, disappear transition running.
    Closing,
}

/// Options attached to a presented overlay.
pub trait OverlayOptions {
    /// Render tree kind of the containers hosting this flavour of overlay.
    const KIND: &'static str;

    /// Caller-chosen id. Presenting an id that is already present replaces that entry.
    fn id(&self) -> Option<&str>;
}

/// Options with nothing but an id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BaseOptions {
    /// Caller-chosen id.
    pub id: Option<Rc<str>>,
}

impl BaseOptions {
    /// Options with the given id.
    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

impl OverlayOptions for BaseOptions {
    const KIND: &'static str = "overlay";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// One presented overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayEntry<E, O> {
    key: Rc<str>,
    element: E,
    options: O,
    status: OverlayStatus,
}

impl<E, O: OverlayOptions> OverlayEntry<E, O> {
    /// Stable key, kept across in-place replacement.
    ///
    /// Containers hosting the entry register their render tree node under this key.
    pub fn key(&self) -> &Rc<str> {
        &self.key
    }

    /// The presented payload.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Options the entry was presented with.
    pub fn options(&self) -> &O {
        &self.options
    }

    /// Current lifecycle status.
    pub fn status(&self) -> OverlayStatus {
        self.status
    }

    fn matches(&self, id_or_key: &str) -> bool {
        *self.key == *id_or_key || self.options.id() == Some(id_or_key)
    }

    fn with_status(&self, status: OverlayStatus) -> Self
    where
        E: Clone,
        O: Clone,
    {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Presented overlays in presentation order.
pub struct OverlayState<E, O> {
    pub(crate) entries: Vec<Rc<OverlayEntry<E, O>>>,
}

impl<E, O> Clone for OverlayState<E, O> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<E, O> Default for OverlayState<E, O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: fmt::Debug, O: fmt::Debug> fmt::Debug for OverlayState<E, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<E, O: OverlayOptions> OverlayState<E, O> {
    /// All entries, oldest first.
    pub fn entries(&self) -> &[Rc<OverlayEntry<E, O>>] {
        &self.entries
    }

    /// Entry whose key or option id equals `id_or_key`.
    pub fn get(&self, id_or_key: &str) -> Option<&Rc<OverlayEntry<E, O>>> {
        self.entries.iter().find(|e| e.matches(id_or_key))
    }

    /// Number of entries, closing ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is presented.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, pred: impl Fn(&OverlayEntry<E, O>) -> bool) -> Option<usize> {
        self.entries.iter().position(|e| pred(&**e))
    }
}

/// Presentation state for one flavour of overlay.
///
/// ## Example
///
/// ```rust
/// use trellis_overlay::{BaseOptions, OverlayStatus, OverlayStore};
/// use trellis_render_tree::RenderTreeStore;
///
/// let overlays: OverlayStore<&str, BaseOptions> = OverlayStore::new(RenderTreeStore::new());
///
/// let key = overlays.present("hello", BaseOptions::with_id("greeting"));
/// assert_eq!(&*key, "overlay-1");
///
/// // Same id: replaced in place under the same key.
/// let again = overlays.present("hello again", BaseOptions::with_id("greeting"));
/// assert_eq!(key, again);
/// assert_eq!(overlays.state().len(), 1);
///
/// overlays.mark_did_open(&key);
/// overlays.dismiss(None);
/// assert_eq!(overlays.state().entries()[0].status(), OverlayStatus::Closing);
///
/// overlays.mark_did_dismiss(&key);
/// assert!(overlays.state().is_empty());
/// ```
pub struct OverlayStore<E, O> {
    kind: Rc<str>,
    store: Store<OverlayState<E, O>>,
    render_tree: RenderTreeStore,
    counter: Rc<Cell<u64>>,
}

impl<E, O> Clone for OverlayStore<E, O> {
    fn clone(&self) -> Self {
        Self {
            kind: Rc::clone(&self.kind),
            store: self.store.clone(),
            render_tree: self.render_tree.clone(),
            counter: Rc::clone(&self.counter),
        }
    }
}

impl<E: fmt::Debug + 'static, O: fmt::Debug + 'static> fmt::Debug for OverlayStore<E, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayStore")
            .field("kind", &self.kind)
            .field("state", &self.store.state())
            .field("counter", &self.counter.get())
            .finish_non_exhaustive()
    }
}

impl<E, O> OverlayStore<E, O>
where
    E: Clone + 'static,
    O: OverlayOptions + Clone + 'static,
{
    /// Store for overlays of kind [`O::KIND`](OverlayOptions::KIND).
    pub fn new(render_tree: RenderTreeStore) -> Self {
        Self::with_kind(O::KIND, render_tree)
    }

    /// Store for overlays hosted by render tree nodes of `kind`.
    pub fn with_kind(kind: &str, render_tree: RenderTreeStore) -> Self {
        Self {
            kind: kind.into(),
            store: Store::new(OverlayState::default()),
            render_tree,
            counter: Rc::new(Cell::new(0)),
        }
    }

    /// Render tree kind this store resolves implicit dismissals against.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The underlying state store.
    pub fn store(&self) -> &Store<OverlayState<E, O>> {
        &self.store
    }

    /// Current state.
    pub fn state(&self) -> Rc<OverlayState<E, O>> {
        self.store.state()
    }

    /// Present `element` and return its key.
    ///
    /// If `options` carries an id that an entry already has, that entry keeps its key and
    /// position but takes the new element and options, and goes back to
    /// [`OverlayStatus::Opening`]. Otherwise a new entry is appended under a fresh
    /// `<kind>-<n>` key.
    pub fn present(&self, element: E, options: O) -> Rc<str> {
        let duplicate = options
            .id()
            .and_then(|id| self.store.state().position(|e| e.options.id() == Some(id)));
        let key = match duplicate {
            Some(index) => Rc::clone(&self.store.state().entries[index].key),
            None => {
                let n = self.counter.get() + 1;
                self.counter.set(n);
                format!("{}-{n}", self.kind).into()
            }
        };
        let entry = Rc::new(OverlayEntry {
            key: Rc::clone(&key),
            element,
            options,
            status: OverlayStatus::Opening,
        });
        self.store.set_state(|prev| {
            let mut next = (**prev).clone();
            match duplicate {
                Some(index) => next.entries[index] = entry,
                None => next.entries.push(entry),
            }
            Rc::new(next)
        });
        log::debug!(
            "{}: presented `{key}`{}",
            self.kind,
            if duplicate.is_some() { " in place" } else { "" }
        );
        key
    }

    /// Start closing an overlay.
    ///
    /// With `Some(id_or_key)` the matching entry is targeted. With `None` the entry hosted by
    /// the deepest active render tree node of this store's kind is targeted, falling back to
    /// the most recent entry that is not already closing. Returns whether anything changed.
    pub fn dismiss(&self, target: Option<&str>) -> bool {
        let state = self.store.state();
        let index = match target {
            Some(id_or_key) => state.position(|e| e.matches(id_or_key)),
            None => {
                let tree = self.render_tree.state();
                let active = tree
                    .deepest_active_of_type(&self.kind)
                    .and_then(|node| state.position(|e| *e.key == *node.id()))
                    .filter(|&i| state.entries[i].status != OverlayStatus::Closing);
                active.or_else(|| {
                    state
                        .entries
                        .iter()
                        .rposition(|e| e.status != OverlayStatus::Closing)
                })
            }
        };
        drop(state);
        let Some(index) = index else {
            return false;
        };
        self.set_status(index, OverlayStatus::Closing, |s| s != OverlayStatus::Closing)
    }

    /// Start closing every entry that is not already closing, in one transition.
    pub fn dismiss_all(&self) -> bool {
        self.store.set_state(|prev| {
            if prev.entries.iter().all(|e| e.status == OverlayStatus::Closing) {
                return Rc::clone(prev);
            }
            let entries = prev
                .entries
                .iter()
                .map(|e| match e.status {
                    OverlayStatus::Closing => Rc::clone(e),
                    _ => Rc::new(e.with_status(OverlayStatus::Closing)),
                })
                .collect();
            Rc::new(OverlayState { entries })
        })
    }

    /// Remove an entry immediately, whatever its status.
    pub fn remove(&self, id_or_key: &str) -> bool {
        self.store.set_state(|prev| {
            let Some(index) = prev.position(|e| e.matches(id_or_key)) else {
                return Rc::clone(prev);
            };
            let mut next = (**prev).clone();
            next.entries.remove(index);
            Rc::new(next)
        })
    }

    /// The view finished presenting `key`: `Opening → Open`.
    pub fn mark_did_open(&self, key: &str) -> bool {
        let Some(index) = self.store.state().position(|e| *e.key == *key) else {
            return false;
        };
        self.set_status(index, OverlayStatus::Open, |s| s == OverlayStatus::Opening)
    }

    /// The view finished dismissing `key`: a closing entry is removed.
    ///
    /// Entries that are not closing are left alone.
    pub fn mark_did_dismiss(&self, key: &str) -> bool {
        self.store.set_state(|prev| {
            let Some(index) = prev
                .position(|e| *e.key == *key && e.status == OverlayStatus::Closing)
            else {
                return Rc::clone(prev);
            };
            let mut next = (**prev).clone();
            next.entries.remove(index);
            Rc::new(next)
        })
    }

    /// Register a listener for every change.
    pub fn subscribe(&self, listener: impl Fn(&Rc<OverlayState<E, O>>) + 'static) -> ListenerId {
        self.store.subscribe(listener)
    }

    /// Remove a listener.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Observe one entry by id or key. Fires when it is added, replaced, or removed.
    pub fn select_entry(
        &self,
        id_or_key: &str,
        listener: impl Fn(&Option<Rc<OverlayEntry<E, O>>>) + 'static,
    ) -> Selection<Option<Rc<OverlayEntry<E, O>>>> {
        let target: Rc<str> = id_or_key.into();
        self.store.select_with(
            move |state| state.get(&target).cloned(),
            option_rc_ptr_eq,
            listener,
        )
    }

    fn set_status(
        &self,
        index: usize,
        status: OverlayStatus,
        allowed: impl Fn(OverlayStatus) -> bool,
    ) -> bool {
        self.store.set_state(|prev| {
            let Some(entry) = prev.entries.get(index).filter(|e| allowed(e.status)) else {
                return Rc::clone(prev);
            };
            let mut next = (**prev).clone();
            next.entries[index] = Rc::new(entry.with_status(status));
            Rc::new(next)
        })
    }
}
