// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stack itself.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_channel::oneshot;
use hashbrown::HashMap;
use trellis_store::{Emitter, ListenerId, Store};

pub use futures_channel::oneshot::Canceled;

/// Where an item is in its lifecycle.
///
/// `Pushing → Settled → Popping → Popped`. A popped item has already left the stack; the
/// status is only seen in [`StackEvent::PopEnd`] payloads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StackItemStatus {
    /// Pushed, enter transition running.
    Pushing,
    /// On the stack and idle.
    Settled,
    /// Popped, exit transition running. Still on the stack.
    Popping,
    /// Exit transition finished.
    Popped,
}

/// Lifecycle events, delivered after the state change they describe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StackEvent {
    /// An item was pushed.
    PushStart,
    /// An item settled.
    PushEnd,
    /// An item started popping.
    PopStart,
    /// An item finished popping and was evicted.
    PopEnd,
}

/// How many items [`AsyncStack::pop_many`] pops.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PopCount {
    /// Up to this many.
    Count(usize),
    /// Every item that is not already popping.
    All,
}

/// An item as stored in the stack.
#[derive(Clone, Debug, PartialEq)]
pub struct StackEntry<T> {
    id: u64,
    data: T,
    status: StackItemStatus,
}

impl<T> StackEntry<T> {
    /// Id assigned on push. Ids start at 1 and are never reused by a stack.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The pushed data.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Current status.
    pub fn status(&self) -> StackItemStatus {
        self.status
    }
}

/// The visible items, bottom first.
#[derive(Debug)]
pub struct StackState<T> {
    items: Vec<Rc<StackEntry<T>>>,
}

impl<T> Default for StackState<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> StackState<T> {
    /// Items, bottom first.
    pub fn items(&self) -> &[Rc<StackEntry<T>>] {
        &self.items
    }

    /// The item with `id`, if it is visible.
    pub fn get(&self, id: u64) -> Option<&Rc<StackEntry<T>>> {
        self.items.iter().find(|e| e.id == id)
    }

    /// The topmost item.
    pub fn top(&self) -> Option<&Rc<StackEntry<T>>> {
        self.items.last()
    }

    /// Number of visible items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item is visible.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Resolves when the view acknowledges a transition.
///
/// Yields `Err(Canceled)` if the acknowledgement can no longer arrive: the item was dropped by
/// [`AsyncStack::restore`] or the stack itself was dropped. There is no timeout.
#[must_use = "completions do nothing unless polled"]
pub struct Completion {
    rx: oneshot::Receiver<()>,
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

impl Future for Completion {
    type Output = Result<(), Canceled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx)
    }
}

/// Handle returned by [`AsyncStack::push`].
#[derive(Debug)]
pub struct StackItem {
    /// Id of the pushed item.
    pub id: u64,
    /// Resolves on [`AsyncStack::push_end`].
    pub pushed: Completion,
    /// Resolves on [`AsyncStack::pop_end`].
    pub popped: Completion,
}

struct Pending {
    pushed: Option<oneshot::Sender<()>>,
    popped: Option<oneshot::Sender<()>>,
}

struct Model<T> {
    next_id: u64,
    /// Visible order. Every id here is in `by_id`.
    ids: Vec<u64>,
    /// Live items, including ones hidden by a restore that a later restore may bring back.
    by_id: HashMap<u64, Rc<StackEntry<T>>>,
    snapshots: HashMap<u64, Vec<u64>>,
    pending: HashMap<u64, Pending>,
}

impl<T> Model<T> {
    fn visible(&self) -> StackState<T> {
        StackState {
            items: self
                .ids
                .iter()
                .filter_map(|id| self.by_id.get(id).cloned())
                .collect(),
        }
    }

    fn set_status(&mut self, id: u64, status: StackItemStatus) -> Option<Rc<StackEntry<T>>>
    where
        T: Clone,
    {
        let entry = self.by_id.get_mut(&id)?;
        Rc::make_mut(entry).status = status;
        Some(Rc::clone(entry))
    }
}

struct Inner<T> {
    store: Store<StackState<T>>,
    events: Emitter<StackEvent, Rc<StackEntry<T>>>,
    model: RefCell<Model<T>>,
}

/// A stack whose push and pop transitions finish only when the view says so.
///
/// [`push`](Self::push) adds an item in [`StackItemStatus::Pushing`] and returns completions
/// for both of its transitions. The view calls [`push_end`](Self::push_end) once the enter
/// animation is done and [`pop_end`](Self::pop_end) once the exit animation is done; only
/// then does a popped item leave the stack.
///
/// Cloning gives another handle to the same stack.
pub struct AsyncStack<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for AsyncStack<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for AsyncStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncStack")
            .field("items", &self.inner.store.state().items)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> Default for AsyncStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> AsyncStack<T> {
    /// An empty stack.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                store: Store::new(StackState::default()),
                events: Emitter::new(),
                model: RefCell::new(Model {
                    next_id: 0,
                    ids: Vec::new(),
                    by_id: HashMap::new(),
                    snapshots: HashMap::new(),
                    pending: HashMap::new(),
                }),
            }),
        }
    }

    /// The underlying state store.
    pub fn store(&self) -> &Store<StackState<T>> {
        &self.inner.store
    }

    /// Current visible items.
    pub fn state(&self) -> Rc<StackState<T>> {
        self.inner.store.state()
    }

    /// Push `data` on top.
    pub fn push(&self, data: T) -> StackItem {
        let (push_tx, push_rx) = oneshot::channel();
        let (pop_tx, pop_rx) = oneshot::channel();
        let entry = {
            let mut model = self.inner.model.borrow_mut();
            model.next_id += 1;
            let id = model.next_id;
            let entry = Rc::new(StackEntry {
                id,
                data,
                status: StackItemStatus::Pushing,
            });
            model.ids.push(id);
            model.by_id.insert(id, Rc::clone(&entry));
            model.pending.insert(
                id,
                Pending {
                    pushed: Some(push_tx),
                    popped: Some(pop_tx),
                },
            );
            entry
        };
        log::debug!("stack: push {}", entry.id);
        self.commit();
        self.inner.events.emit(StackEvent::PushStart, &entry);
        StackItem {
            id: entry.id,
            pushed: Completion { rx: push_rx },
            popped: Completion { rx: pop_rx },
        }
    }

    /// The view finished presenting `id`: `Pushing → Settled`.
    ///
    /// Returns `false`, changing nothing, if `id` is not pushing.
    pub fn push_end(&self, id: u64) -> bool {
        let (entry, pushed) = {
            let mut model = self.inner.model.borrow_mut();
            if model.by_id.get(&id).map(|e| e.status) != Some(StackItemStatus::Pushing) {
                return false;
            }
            let pushed = model.pending.get_mut(&id).and_then(|p| p.pushed.take());
            (model.set_status(id, StackItemStatus::Settled), pushed)
        };
        // Sent outside the borrow: waking a task may call back into the stack.
        if let Some(tx) = pushed {
            // The receiver may already be gone.
            let _ = tx.send(());
        }
        let Some(entry) = entry else {
            return false;
        };
        log::debug!("stack: push end {id}");
        self.commit();
        self.inner.events.emit(StackEvent::PushEnd, &entry);
        true
    }

    /// Start popping the topmost item that is not already popping, and return its id.
    ///
    /// The item stays on the stack until [`pop_end`](Self::pop_end). An item still pushing
    /// is settled first, so observers always see `PushEnd` before `PopStart`.
    pub fn pop(&self) -> Option<u64> {
        let top = {
            let model = self.inner.model.borrow();
            model.ids.iter().rev().copied().find(|id| {
                model
                    .by_id
                    .get(id)
                    .is_some_and(|e| e.status != StackItemStatus::Popping)
            })
        }?;
        self.push_end(top);
        let entry = self
            .inner
            .model
            .borrow_mut()
            .set_status(top, StackItemStatus::Popping)?;
        log::debug!("stack: pop {top}");
        self.commit();
        self.inner.events.emit(StackEvent::PopStart, &entry);
        Some(top)
    }

    /// Pop several items from the top, returning their ids topmost first.
    pub fn pop_many(&self, count: PopCount) -> Vec<u64> {
        let limit = match count {
            PopCount::Count(n) => n,
            PopCount::All => usize::MAX,
        };
        let mut popped = Vec::new();
        while popped.len() < limit {
            let Some(id) = self.pop() else {
                break;
            };
            popped.push(id);
        }
        popped
    }

    /// The view finished dismissing `id`: `Popping → Popped`, and the item is evicted.
    ///
    /// Returns `false`, changing nothing, if `id` is not popping.
    pub fn pop_end(&self, id: u64) -> bool {
        let (entry, pending) = {
            let mut model = self.inner.model.borrow_mut();
            if model.by_id.get(&id).map(|e| e.status) != Some(StackItemStatus::Popping) {
                return false;
            }
            let Some(mut entry) = model.by_id.remove(&id) else {
                return false;
            };
            Rc::make_mut(&mut entry).status = StackItemStatus::Popped;
            model.ids.retain(|i| *i != id);
            (entry, model.pending.remove(&id))
        };
        if let Some(tx) = pending.and_then(|p| p.popped) {
            let _ = tx.send(());
        }
        log::debug!("stack: pop end {id}");
        self.commit();
        self.inner.events.emit(StackEvent::PopEnd, &entry);
        true
    }

    /// Edit the data of a live item in place. Returns `false` if `id` is not live.
    pub fn update(&self, id: u64, f: impl FnOnce(&mut T)) -> bool {
        let visible = {
            let mut model = self.inner.model.borrow_mut();
            let Some(entry) = model.by_id.get_mut(&id) else {
                return false;
            };
            f(&mut Rc::make_mut(entry).data);
            model.ids.contains(&id)
        };
        if visible {
            self.commit();
        }
        true
    }

    /// Remember the current visible order under `key`, replacing any earlier snapshot.
    pub fn snapshot(&self, key: u64) {
        let mut model = self.inner.model.borrow_mut();
        let ids = model.ids.clone();
        log::debug!("stack: snapshot {key} = {ids:?}");
        model.snapshots.insert(key, ids);
    }

    /// Replay the order remembered under `key`. Items evicted since are skipped.
    ///
    /// An unknown `key` means the history this stack was following is gone, so every item
    /// and snapshot is dropped; outstanding completions resolve to `Err(Canceled)`. Returns
    /// whether `key` was known.
    pub fn restore(&self, key: u64) -> bool {
        let (known, dropped) = {
            let mut model = self.inner.model.borrow_mut();
            let snapshot = model.snapshots.get(&key).cloned();
            match snapshot {
                Some(ids) => {
                    let ids: Vec<u64> = ids
                        .into_iter()
                        .filter(|id| model.by_id.contains_key(id))
                        .collect();
                    model.ids = ids;
                    (true, HashMap::new())
                }
                None => {
                    model.ids.clear();
                    model.by_id.clear();
                    model.snapshots.clear();
                    (false, core::mem::take(&mut model.pending))
                }
            }
        };
        // Senders go away outside the borrow; waking a task may run arbitrary code.
        drop(dropped);
        log::debug!("stack: restore {key} (known: {known})");
        self.commit();
        known
    }

    /// Register a listener for every visible change.
    pub fn subscribe(&self, listener: impl Fn(&Rc<StackState<T>>) + 'static) -> ListenerId {
        self.inner.store.subscribe(listener)
    }

    /// Remove a state listener.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.store.unsubscribe(id)
    }

    /// Run `handler` for every `event`.
    pub fn listen(
        &self,
        event: StackEvent,
        handler: impl Fn(&Rc<StackEntry<T>>) + 'static,
    ) -> ListenerId {
        self.inner.events.listen(event, handler)
    }

    /// Remove an event handler.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        self.inner.events.unlisten(id)
    }

    fn commit(&self) {
        let next = self.inner.model.borrow().visible();
        self.inner.store.replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::Cell;
    use futures::FutureExt;
    use futures::executor::block_on;

    fn record(stack: &AsyncStack<&'static str>) -> Rc<RefCell<Vec<(StackEvent, u64)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for event in [
            StackEvent::PushStart,
            StackEvent::PushEnd,
            StackEvent::PopStart,
            StackEvent::PopEnd,
        ] {
            let sink = Rc::clone(&log);
            stack.listen(event, move |e| sink.borrow_mut().push((event, e.id())));
        }
        log
    }

    fn ids(stack: &AsyncStack<&'static str>) -> Vec<u64> {
        stack.state().items().iter().map(|e| e.id()).collect()
    }

    #[test]
    fn push_settles_on_acknowledgement() {
        let stack = AsyncStack::new();
        let StackItem { id, mut pushed, .. } = stack.push("home");
        assert_eq!(stack.state().top().unwrap().status(), StackItemStatus::Pushing);
        assert!((&mut pushed).now_or_never().is_none());

        assert!(stack.push_end(id));
        assert_eq!(block_on(pushed), Ok(()));
        assert_eq!(stack.state().top().unwrap().status(), StackItemStatus::Settled);
        assert!(!stack.push_end(id));
    }

    #[test]
    fn popping_before_push_end_keeps_event_order() {
        let stack = AsyncStack::new();
        let log = record(&stack);
        let item = stack.push("details");

        assert_eq!(stack.pop(), Some(item.id));
        assert_eq!(block_on(item.pushed), Ok(()));
        // Still visible until the view acknowledges.
        assert_eq!(ids(&stack), [item.id]);
        assert_eq!(stack.state().top().unwrap().status(), StackItemStatus::Popping);

        assert!(stack.pop_end(item.id));
        assert_eq!(block_on(item.popped), Ok(()));
        assert!(stack.state().is_empty());
        assert_eq!(
            *log.borrow(),
            vec![
                (StackEvent::PushStart, 1),
                (StackEvent::PushEnd, 1),
                (StackEvent::PopStart, 1),
                (StackEvent::PopEnd, 1),
            ]
        );
        assert!(!stack.pop_end(item.id));
    }

    #[test]
    fn pop_skips_items_already_popping() {
        let stack = AsyncStack::new();
        let a = stack.push("a").id;
        let b = stack.push("b").id;
        assert_eq!(stack.pop(), Some(b));
        assert_eq!(stack.pop(), Some(a));
        assert_eq!(stack.pop(), None);

        assert!(!stack.pop_end(99));
        assert!(stack.pop_end(a));
        assert_eq!(ids(&stack), [b]);
    }

    #[test]
    fn pop_many_counts_from_the_top() {
        let stack = AsyncStack::new();
        let items: Vec<u64> = ["a", "b", "c", "d"].map(|s| stack.push(s).id).into();
        assert_eq!(stack.pop_many(PopCount::Count(2)), [items[3], items[2]]);
        assert_eq!(stack.pop_many(PopCount::All), [items[1], items[0]]);
        assert!(stack.pop_many(PopCount::All).is_empty());
    }

    #[test]
    fn update_edits_data_in_place() {
        let stack: AsyncStack<String> = AsyncStack::new();
        let id = stack.push("draft".into()).id;
        let notified = Rc::new(Cell::new(0));
        let n = Rc::clone(&notified);
        stack.subscribe(move |_| n.set(n.get() + 1));

        assert!(stack.update(id, |s| s.push_str(" 2")));
        assert_eq!(stack.state().get(id).unwrap().data(), "draft 2");
        assert_eq!(notified.get(), 1);
        assert!(!stack.update(id + 1, |_| {}));
    }

    #[test]
    fn restore_replays_snapshots() {
        let stack = AsyncStack::new();
        let a = stack.push("a").id;
        stack.snapshot(1);
        let b = stack.push("b").id;
        stack.snapshot(2);

        assert!(stack.restore(1));
        assert_eq!(ids(&stack), [a]);
        assert!(stack.restore(2));
        assert_eq!(ids(&stack), [a, b]);

        // Evicted items do not come back.
        stack.pop();
        stack.pop_end(b);
        assert!(stack.restore(2));
        assert_eq!(ids(&stack), [a]);
    }

    #[test]
    fn restoring_an_unknown_key_clears_everything() {
        let stack = AsyncStack::new();
        let item = stack.push("a");
        stack.snapshot(1);

        assert!(!stack.restore(7));
        assert!(stack.state().is_empty());
        assert_eq!(block_on(item.pushed), Err(Canceled));
        assert_eq!(block_on(item.popped), Err(Canceled));
        // Snapshots went too.
        assert!(!stack.restore(1));
    }

    #[test]
    fn dropping_the_stack_cancels_completions() {
        let stack = AsyncStack::new();
        let item = stack.push(1_u8);
        drop(stack);
        assert_eq!(block_on(item.pushed), Err(Canceled));
    }

    #[test]
    fn handlers_may_call_back_into_the_stack() {
        let stack = AsyncStack::new();
        let inner = stack.clone();
        // Settle every push as soon as it starts.
        stack.listen(StackEvent::PushStart, move |e| {
            inner.push_end(e.id());
        });
        let item = stack.push("auto");
        assert_eq!(item.pushed.now_or_never(), Some(Ok(())));
        assert_eq!(stack.state().top().unwrap().status(), StackItemStatus::Settled);
    }

    #[test]
    fn woken_tasks_may_call_back_into_the_stack() {
        use core::task::Waker;
        use std::sync::Arc;
        use std::task::Wake;

        std::thread_local! {
            static STACK: RefCell<Option<AsyncStack<&'static str>>> = const { RefCell::new(None) };
        }

        // Snapshots the stack from inside the wake-up, like an executor polling inline.
        struct SnapshotOnWake(u64);

        impl Wake for SnapshotOnWake {
            fn wake(self: Arc<Self>) {
                STACK.with(|stack| {
                    if let Some(stack) = &*stack.borrow() {
                        stack.snapshot(self.0);
                    }
                });
            }
        }

        let stack = AsyncStack::new();
        STACK.with(|slot| *slot.borrow_mut() = Some(stack.clone()));
        let StackItem {
            id,
            mut pushed,
            mut popped,
        } = stack.push("inline");

        let waker = Waker::from(Arc::new(SnapshotOnWake(1)));
        let mut cx = Context::from_waker(&waker);
        assert!(Pin::new(&mut pushed).poll(&mut cx).is_pending());
        assert!(stack.push_end(id));
        assert_eq!(Pin::new(&mut pushed).poll(&mut cx), Poll::Ready(Ok(())));

        let waker = Waker::from(Arc::new(SnapshotOnWake(2)));
        let mut cx = Context::from_waker(&waker);
        assert!(Pin::new(&mut popped).poll(&mut cx).is_pending());
        stack.pop();
        assert!(stack.pop_end(id));
        assert_eq!(Pin::new(&mut popped).poll(&mut cx), Poll::Ready(Ok(())));

        // Both wake-ups ran: the snapshots exist.
        assert!(stack.restore(1));
        assert!(stack.restore(2));
        STACK.with(|slot| slot.borrow_mut().take());
    }
}
