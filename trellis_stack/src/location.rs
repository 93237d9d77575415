// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory location history, and keeping stacks in step with it.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use trellis_store::{Emitter, ListenerId, Store};

use crate::stack::AsyncStack;

/// Scheme used when none is configured.
pub const DEFAULT_SCHEME: &str = "app://";

/// One visited location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    id: u64,
    path: Rc<str>,
}

impl HistoryEntry {
    /// Id of this visit. The initial entry is 0; later visits count up from there.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Path, starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// What moved the history.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocationEvent {
    /// The history was reset by [`LocationHistory::init`].
    Init,
    /// A new location was visited.
    Navigate,
    /// The history moved back.
    Back,
}

/// Settings for [`LocationHistory::init`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationConfig {
    /// Prefix of every URL, such as `myapp://`.
    pub scheme: Rc<str>,
    /// Path of the initial entry.
    pub initial_path: Rc<str>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.into(),
            initial_path: "/".into(),
        }
    }
}

/// The current location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationState {
    current: Rc<HistoryEntry>,
    scheme: Rc<str>,
    can_go_back: bool,
}

impl LocationState {
    /// The current entry.
    pub fn current(&self) -> &Rc<HistoryEntry> {
        &self.current
    }

    /// Full URL of the current entry.
    pub fn url(&self) -> String {
        format!("{}{}", self.scheme, self.current.path)
    }

    /// Whether [`LocationHistory::go_back`] with an amount of 1 would move.
    pub fn can_go_back(&self) -> bool {
        self.can_go_back
    }
}

struct Timeline {
    scheme: Rc<str>,
    next_id: u64,
    index: usize,
    entries: Vec<Rc<HistoryEntry>>,
}

impl Timeline {
    fn new(config: LocationConfig) -> Self {
        Self {
            scheme: config.scheme,
            next_id: 1,
            index: 0,
            entries: alloc::vec![Rc::new(HistoryEntry {
                id: 0,
                path: config.initial_path,
            })],
        }
    }

    fn state(&self) -> LocationState {
        LocationState {
            current: Rc::clone(&self.entries[self.index]),
            scheme: Rc::clone(&self.scheme),
            can_go_back: self.index > 0,
        }
    }
}

struct Inner {
    store: Store<LocationState>,
    events: Emitter<LocationEvent, Rc<HistoryEntry>>,
    timeline: RefCell<Timeline>,
}

/// A linear history of visited paths.
///
/// Navigating from the middle of the history drops the entries after the current one.
/// Cloning gives another handle to the same history.
#[derive(Clone)]
pub struct LocationHistory {
    inner: Rc<Inner>,
}

impl fmt::Debug for LocationHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationHistory")
            .field("state", &self.inner.store.state())
            .finish_non_exhaustive()
    }
}

impl Default for LocationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationHistory {
    /// A history holding the default initial entry.
    pub fn new() -> Self {
        Self::with_config(LocationConfig::default())
    }

    /// A history holding the initial entry described by `config`. No event is emitted.
    pub fn with_config(config: LocationConfig) -> Self {
        let timeline = Timeline::new(config);
        Self {
            inner: Rc::new(Inner {
                store: Store::new(timeline.state()),
                events: Emitter::new(),
                timeline: RefCell::new(timeline),
            }),
        }
    }

    /// The underlying state store.
    pub fn store(&self) -> &Store<LocationState> {
        &self.inner.store
    }

    /// Current state.
    pub fn state(&self) -> Rc<LocationState> {
        self.inner.store.state()
    }

    /// The current entry.
    pub fn current(&self) -> Rc<HistoryEntry> {
        Rc::clone(self.inner.store.state().current())
    }

    /// Number of entries, including ones ahead of the current entry.
    pub fn len(&self) -> usize {
        self.inner.timeline.borrow().entries.len()
    }

    /// Always `false`: there is at least the initial entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Throw away every entry and start over from `config`.
    pub fn init(&self, config: LocationConfig) {
        *self.inner.timeline.borrow_mut() = Timeline::new(config);
        self.commit(LocationEvent::Init);
    }

    /// Visit `path`.
    pub fn navigate(&self, path: &str) {
        {
            let mut timeline = self.inner.timeline.borrow_mut();
            let id = timeline.next_id;
            timeline.next_id += 1;
            let keep = timeline.index + 1;
            timeline.entries.truncate(keep);
            timeline.entries.push(Rc::new(HistoryEntry {
                id,
                path: path.into(),
            }));
            timeline.index = keep;
        }
        self.commit(LocationEvent::Navigate);
    }

    /// Move back `amount` entries. Returns `false`, changing nothing, if there are not that
    /// many entries behind the current one.
    pub fn go_back(&self, amount: usize) -> bool {
        if amount == 0 {
            return false;
        }
        {
            let mut timeline = self.inner.timeline.borrow_mut();
            let Some(index) = timeline.index.checked_sub(amount) else {
                return false;
            };
            timeline.index = index;
        }
        self.commit(LocationEvent::Back);
        true
    }

    /// Register a listener for every change.
    pub fn subscribe(&self, listener: impl Fn(&Rc<LocationState>) + 'static) -> ListenerId {
        self.inner.store.subscribe(listener)
    }

    /// Remove a state listener.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.store.unsubscribe(id)
    }

    /// Run `handler` with the new current entry every time `event` happens.
    pub fn listen(
        &self,
        event: LocationEvent,
        handler: impl Fn(&Rc<HistoryEntry>) + 'static,
    ) -> ListenerId {
        self.inner.events.listen(event, handler)
    }

    /// Remove an event handler.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        self.inner.events.unlisten(id)
    }

    fn commit(&self, event: LocationEvent) {
        let next = self.inner.timeline.borrow().state();
        let current = Rc::clone(&next.current);
        log::debug!("location: {event:?} -> {} ({})", current.path, current.id);
        self.inner.store.replace(next);
        self.inner.events.emit(event, &current);
    }
}

/// Listeners installed by [`sync_with_history`].
///
/// Dropping the handle leaves them installed.
#[derive(Debug)]
pub struct HistorySync {
    ids: [ListenerId; 3],
}

impl HistorySync {
    /// Stop following the history.
    pub fn detach(self, history: &LocationHistory) {
        for id in self.ids {
            history.unlisten(id);
        }
    }
}

/// Keep `stack` in step with `history`.
///
/// The stack is snapshotted under the current entry's id now and after every
/// [`navigate`](LocationHistory::navigate) or [`init`](LocationHistory::init); moving back
/// restores the snapshot of the entry moved to. Push before navigating so that the new
/// entry's snapshot includes the pushed item.
pub fn sync_with_history<T: Clone + 'static>(
    history: &LocationHistory,
    stack: &AsyncStack<T>,
) -> HistorySync {
    stack.snapshot(history.current().id());
    let snapshot = |stack: &AsyncStack<T>| {
        let stack = stack.clone();
        move |entry: &Rc<HistoryEntry>| stack.snapshot(entry.id())
    };
    let init = history.listen(LocationEvent::Init, snapshot(stack));
    let navigate = history.listen(LocationEvent::Navigate, snapshot(stack));
    let stack = stack.clone();
    let back = history.listen(LocationEvent::Back, move |entry| {
        stack.restore(entry.id());
    });
    HistorySync {
        ids: [init, navigate, back],
    }
}
