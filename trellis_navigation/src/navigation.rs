// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigation client: push, pop, and tab switching over a shared store.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use trellis_render_tree::{RenderNode, RenderTree, RenderTreeStore, kinds};
use trellis_store::{ListenerId, Selection, Store, option_rc_ptr_eq};

use crate::types::{
    NavigationConfig, NavigationError, NavigationState, PopOptions, PushOptions, ScreenEntry,
    TabOptions,
};

/// Navigation state plus the render tree it resolves implicit targets against.
///
/// Operations without an explicit target apply to the deepest active container of the
/// required kind, so `push_screen` from anywhere in the UI lands on the stack the user is
/// looking at, however deeply it is nested.
///
/// Cloning a `Navigation` clones the handle; all clones share state, render tree, and
/// configuration.
///
/// Stacks and tab groups that leave the render tree lose their navigation state, so an
/// unmounted container neither keeps its screens alive nor accepts explicit pushes. State
/// seeded for containers that were never registered is kept until
/// [`forget_stack`](Self::forget_stack) or [`forget_tabs`](Self::forget_tabs).
///
/// ## Example
///
/// ```rust
/// use trellis_navigation::{Navigation, PopOptions, PushOptions};
/// use trellis_render_tree::{RenderTreeStore, kinds};
///
/// let tree = RenderTreeStore::new();
/// let nav: Navigation<&str> = Navigation::new(tree.clone());
///
/// tree.register("main", kinds::STACK, None, true).unwrap();
/// nav.push_screen("home", PushOptions::new().id("home")).unwrap();
/// nav.push_screen("home again", PushOptions::new().id("home")).unwrap();
/// assert_eq!(nav.state().screens("main").len(), 1);
///
/// nav.pop_screen(PopOptions::new()).unwrap();
/// assert!(nav.state().screens("main").is_empty());
/// ```
pub struct Navigation<E> {
    store: Store<NavigationState<E>>,
    render_tree: RenderTreeStore,
    debug: Rc<Cell<bool>>,
    unmount_watch: Rc<UnmountWatch>,
}

impl<E> Clone for Navigation<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            render_tree: self.render_tree.clone(),
            debug: Rc::clone(&self.debug),
            unmount_watch: Rc::clone(&self.unmount_watch),
        }
    }
}

/// Render tree listener releasing state of unmounted containers, removed with the last handle.
struct UnmountWatch {
    render_tree: RenderTreeStore,
    listener: ListenerId,
}

impl Drop for UnmountWatch {
    fn drop(&mut self) {
        self.render_tree.unsubscribe(self.listener);
    }
}

impl<E: fmt::Debug + 'static> fmt::Debug for Navigation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigation")
            .field("state", &self.store.state())
            .field("debug", &self.debug.get())
            .finish_non_exhaustive()
    }
}

impl<E: Clone + 'static> Navigation<E> {
    /// Empty navigation state resolved against `render_tree`.
    pub fn new(render_tree: RenderTreeStore) -> Self {
        Self::with_config(render_tree, NavigationState::new(), NavigationConfig::default())
    }

    /// Navigation seeded with `initial` state.
    pub fn with_config(
        render_tree: RenderTreeStore,
        initial: NavigationState<E>,
        config: NavigationConfig,
    ) -> Self {
        let store = Store::new(initial);
        let debug = Rc::new(Cell::new(config.debug));
        let listener = {
            let store = store.clone();
            let debug = Rc::clone(&debug);
            let mounted = RefCell::new(render_tree.state());
            render_tree.subscribe(move |tree| {
                let before = mounted.replace(Rc::clone(tree));
                let released = release_unmounted(&store, &before, tree);
                if released && debug.get() {
                    log::debug!("released navigation state of unmounted containers");
                }
            })
        };
        Self {
            store,
            render_tree: render_tree.clone(),
            debug,
            unmount_watch: Rc::new(UnmountWatch {
                render_tree,
                listener,
            }),
        }
    }

    /// The underlying state store.
    pub fn store(&self) -> &Store<NavigationState<E>> {
        &self.store
    }

    /// The render tree used for implicit targets.
    pub fn render_tree(&self) -> &RenderTreeStore {
        &self.render_tree
    }

    /// Current state.
    pub fn state(&self) -> Rc<NavigationState<E>> {
        self.store.state()
    }

    /// Toggle debug logging of transitions and unknown targets.
    pub fn set_debug(&self, enabled: bool) {
        self.debug.set(enabled);
    }

    /// Whether debug logging is on.
    pub fn is_debug(&self) -> bool {
        self.debug.get()
    }

    /// Push `element` onto a stack.
    ///
    /// The target is `options.stack` or the deepest active stack. If `options.id` is already
    /// on the target stack, nothing happens.
    pub fn push_screen(&self, element: E, options: PushOptions) -> Result<(), NavigationError> {
        let Some(stack) = self.resolve_stack(options.stack.as_deref(), "push")? else {
            return Ok(());
        };
        let changed = self.store.set_state(|prev| {
            let existing = prev.stacks.get(&*stack);
            if let (Some(id), Some(screens)) = (options.id.as_deref(), existing)
                && screens.iter().any(|s| s.id.as_deref() == Some(id))
            {
                return Rc::clone(prev);
            }
            let mut screens: Vec<ScreenEntry<E>> =
                existing.map(|s| (**s).clone()).unwrap_or_default();
            screens.push(ScreenEntry {
                element,
                id: options.id.clone(),
                options: options.clone(),
            });
            let mut next = (**prev).clone();
            next.stacks.insert(Rc::clone(&stack), Rc::new(screens));
            Rc::new(next)
        });
        self.trace("push", &stack, changed);
        Ok(())
    }

    /// Remove the top `options.count` screens.
    ///
    /// Screens come off the target stack first. Whatever it cannot cover is popped from the
    /// enclosing stacks in the render tree, nearest first, until the count is used up or no
    /// enclosing stack is left. Popping an empty stack does nothing.
    pub fn pop_screen(&self, options: PopOptions) -> Result<(), NavigationError> {
        let Some(stack) = self.resolve_stack(options.stack.as_deref(), "pop")? else {
            return Ok(());
        };
        let tree = self.render_tree.state();
        let changed = self.store.set_state(|prev| {
            let mut next: Option<NavigationState<E>> = None;
            let mut remaining = options.count;
            let mut target = Some(Rc::clone(&stack));
            while remaining > 0 {
                let Some(id) = target else {
                    break;
                };
                let screens = prev.screens(&id);
                let popped = screens.len().min(remaining);
                if popped > 0 {
                    let kept = screens[..screens.len() - popped].to_vec();
                    next.get_or_insert_with(|| (**prev).clone())
                        .stacks
                        .insert(Rc::clone(&id), Rc::new(kept));
                    remaining -= popped;
                }
                target = tree
                    .parent_of_type(&id, kinds::STACK)
                    .map(|parent| Rc::from(parent.id()));
            }
            next.map_or_else(|| Rc::clone(prev), Rc::new)
        });
        self.trace("pop", &stack, changed);
        Ok(())
    }

    /// Remove every pushed screen of a stack, leaving only what the stack renders itself.
    pub fn pop_to_root(&self, options: PopOptions) -> Result<(), NavigationError> {
        let Some(stack) = self.resolve_stack(options.stack.as_deref(), "pop_to_root")? else {
            return Ok(());
        };
        let changed = self.store.set_state(|prev| {
            if prev.screens(&stack).is_empty() {
                return Rc::clone(prev);
            }
            let mut next = (**prev).clone();
            next.stacks.insert(Rc::clone(&stack), Rc::new(Vec::new()));
            Rc::new(next)
        });
        self.trace("pop_to_root", &stack, changed);
        Ok(())
    }

    /// Remove the screen with `screen_id` from whichever stack holds it.
    ///
    /// Returns `false` if no stack holds such a screen.
    pub fn remove_screen(&self, screen_id: &str) -> bool {
        let mut owner = None;
        let changed = self.store.set_state(|prev| {
            let Some((stack, screens)) = prev
                .stacks
                .iter()
                .find(|(_, screens)| screens.iter().any(|s| s.id.as_deref() == Some(screen_id)))
            else {
                return Rc::clone(prev);
            };
            let remaining: Vec<ScreenEntry<E>> = screens
                .iter()
                .filter(|s| s.id.as_deref() != Some(screen_id))
                .cloned()
                .collect();
            owner = Some(Rc::clone(stack));
            let mut next = (**prev).clone();
            next.stacks.insert(Rc::clone(stack), Rc::new(remaining));
            Rc::new(next)
        });
        if let Some(stack) = owner {
            self.trace("remove_screen", &stack, changed);
        }
        changed
    }

    /// Select tab `index` in a tab group.
    ///
    /// The target is `options.tabs` or the deepest active tab group. The previously selected
    /// index is remembered for [`tab_back`](Self::tab_back). Selecting the tab that is already
    /// selected pops every stack shown in it back to its root.
    pub fn set_active_tab(&self, index: usize, options: TabOptions) -> Result<(), NavigationError> {
        let Some(tabs) = self.resolve_tabs(options, "tab")? else {
            return Ok(());
        };
        let tree = self.render_tree.state();
        let changed = self.store.set_state(|prev| {
            let current = prev.tab(&tabs);
            if current.map_or(0, |t| t.active_index) == index {
                return pop_hosted_stacks(prev, &tree, &tabs);
            }
            let mut tab = current.cloned().unwrap_or_default();
            let previous = tab.active_index;
            tab.history.retain(|&i| i != index && i != previous);
            tab.history.push(previous);
            tab.active_index = index;
            let mut next = (**prev).clone();
            next.tabs.insert(Rc::clone(&tabs), tab);
            Rc::new(next)
        });
        self.trace("tab", &tabs, changed);
        Ok(())
    }

    /// Return a tab group to the tab selected before the current one.
    ///
    /// Returns `Ok(false)` when the group has no history to go back to.
    pub fn tab_back(&self, options: TabOptions) -> Result<bool, NavigationError> {
        let Some(tabs) = self.resolve_tabs(options, "tab_back")? else {
            return Ok(false);
        };
        let changed = self.store.set_state(|prev| {
            let Some(mut tab) = prev.tab(&tabs).filter(|t| !t.history.is_empty()).cloned() else {
                return Rc::clone(prev);
            };
            if let Some(index) = tab.history.pop() {
                tab.active_index = index;
            }
            let mut next = (**prev).clone();
            next.tabs.insert(Rc::clone(&tabs), tab);
            Rc::new(next)
        });
        self.trace("tab_back", &tabs, changed);
        Ok(changed)
    }

    /// Drop the navigation state of `stack`.
    ///
    /// Containers leaving the render tree are released automatically; this covers state
    /// seeded for stacks that were never registered. Returns `false` if `stack` had no state.
    pub fn forget_stack(&self, stack: &str) -> bool {
        self.forget(stack, kinds::STACK)
    }

    /// Drop the navigation state of tab group `tabs`. See [`forget_stack`](Self::forget_stack).
    pub fn forget_tabs(&self, tabs: &str) -> bool {
        self.forget(tabs, kinds::TABS)
    }

    /// Go back to the state this navigation was created with.
    pub fn reset(&self) {
        let initial = self.store.initial_state();
        self.store.set_state(|_| initial);
    }

    /// Replace the whole state, for example when restoring a saved session.
    pub fn load_state(&self, state: NavigationState<E>) {
        self.store.replace(state);
    }

    /// Register a listener for every navigation change.
    pub fn subscribe(&self, listener: impl Fn(&Rc<NavigationState<E>>) + 'static) -> ListenerId {
        self.store.subscribe(listener)
    }

    /// Remove a listener.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Observe the screens of one stack.
    ///
    /// Fires only when that stack's list is replaced; changes to other stacks or to tabs are
    /// ignored.
    pub fn select_stack(
        &self,
        stack: &str,
        listener: impl Fn(&Option<Rc<Vec<ScreenEntry<E>>>>) + 'static,
    ) -> Selection<Option<Rc<Vec<ScreenEntry<E>>>>> {
        let stack: Rc<str> = stack.into();
        self.store.select_with(
            move |state| state.stack(&stack).cloned(),
            option_rc_ptr_eq,
            listener,
        )
    }

    /// Observe the selected index of one tab group (`0` until set).
    pub fn select_active_index(
        &self,
        tabs: &str,
        listener: impl Fn(&usize) + 'static,
    ) -> Selection<usize> {
        let tabs: Rc<str> = tabs.into();
        self.store
            .select(move |state| state.active_index(&tabs), listener)
    }

    fn resolve(
        &self,
        explicit: Option<&str>,
        kind: &'static str,
        operation: &'static str,
    ) -> Result<Rc<str>, NavigationError> {
        self.render_tree
            .resolve(explicit, kind)
            .ok_or(NavigationError::UnresolvedTarget { operation, kind })
    }

    fn resolve_tabs(
        &self,
        options: TabOptions,
        operation: &'static str,
    ) -> Result<Option<Rc<str>>, NavigationError> {
        let tabs = self.resolve(options.tabs.as_deref(), kinds::TABS, operation)?;
        if !self.store.state().tabs.contains_key(&*tabs)
            && !self.render_tree.state().contains(&tabs)
        {
            self.warn_unknown(operation, kinds::TABS, &tabs);
            return Ok(None);
        }
        Ok(Some(tabs))
    }

    fn forget(&self, id: &str, kind: &'static str) -> bool {
        let changed = self.store.set_state(|prev| {
            let held = if kind == kinds::TABS {
                prev.tabs.contains_key(id)
            } else {
                prev.stacks.contains_key(id)
            };
            if !held {
                return Rc::clone(prev);
            }
            let mut next = (**prev).clone();
            if kind == kinds::TABS {
                next.tabs.remove(id);
            } else {
                next.stacks.remove(id);
            }
            Rc::new(next)
        });
        self.trace("forget", id, changed);
        changed
    }

    /// Resolve a stack; `None` if an explicit id names neither known state nor a mounted node.
    fn resolve_stack(
        &self,
        explicit: Option<&str>,
        operation: &'static str,
    ) -> Result<Option<Rc<str>>, NavigationError> {
        let stack = self.resolve(explicit, kinds::STACK, operation)?;
        if !self.store.state().stacks.contains_key(&*stack)
            && !self.render_tree.state().contains(&stack)
        {
            self.warn_unknown(operation, kinds::STACK, &stack);
            return Ok(None);
        }
        Ok(Some(stack))
    }

    fn warn_unknown(&self, operation: &str, kind: &str, id: &str) {
        if self.debug.get() {
            log::warn!("{operation}: unknown {kind} `{id}`, state left unchanged");
        }
    }

    fn trace(&self, operation: &str, target: &str, changed: bool) {
        if self.debug.get() {
            log::debug!("{operation} on `{target}`: changed={changed}");
        }
    }
}

/// Drop state of every container registered in `before` but gone from `after`.
fn release_unmounted<E: Clone + 'static>(
    store: &Store<NavigationState<E>>,
    before: &RenderTree,
    after: &RenderTree,
) -> bool {
    let gone = |id: &Rc<str>| before.contains(id) && !after.contains(id);
    store.set_state(|prev| {
        if !prev.stacks.keys().chain(prev.tabs.keys()).any(|id| gone(id)) {
            return Rc::clone(prev);
        }
        let mut next = (**prev).clone();
        next.stacks.retain(|id, _| !gone(id));
        next.tabs.retain(|id, _| !gone(id));
        Rc::new(next)
    })
}

/// Clear every stack shown in the selected tab of `tabs`.
///
/// A stack is shown there when `tabs` is its nearest tab group and every node between the two
/// is active on its own.
fn pop_hosted_stacks<E: Clone>(
    prev: &Rc<NavigationState<E>>,
    tree: &RenderTree,
    tabs: &str,
) -> Rc<NavigationState<E>> {
    let shown = |stack: &RenderNode| {
        for node in tree.path(stack.id()) {
            if node.kind() == kinds::TABS {
                return node.id() == tabs;
            }
            if !node.active_self() {
                return false;
            }
        }
        false
    };
    let mut next: Option<NavigationState<E>> = None;
    for stack in tree.iter().filter(|n| n.kind() == kinds::STACK) {
        if prev.screens(stack.id()).is_empty() || !shown(stack) {
            continue;
        }
        next.get_or_insert_with(|| (**prev).clone())
            .stacks
            .insert(stack.id().into(), Rc::new(Vec::new()));
    }
    next.map_or_else(|| Rc::clone(prev), Rc::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn setup() -> (RenderTreeStore, Navigation<&'static str>) {
        let tree = RenderTreeStore::new();
        let nav = Navigation::new(tree.clone());
        (tree, nav)
    }

    fn elements(nav: &Navigation<&'static str>, stack: &str) -> Vec<&'static str> {
        nav.state().screens(stack).iter().map(|s| s.element).collect()
    }

    #[test]
    fn implicit_push_follows_the_deepest_active_stack() {
        let (tree, nav) = setup();
        tree.register("left", kinds::STACK, None, true).unwrap();
        tree.register("right", kinds::STACK, None, true).unwrap();
        tree.register("nested", kinds::STACK, Some("right"), true).unwrap();

        nav.push_screen("x", PushOptions::new()).unwrap();
        assert_eq!(elements(&nav, "nested"), ["x"]);

        tree.register("right", kinds::STACK, None, false).unwrap();
        nav.push_screen("y", PushOptions::new()).unwrap();
        assert_eq!(elements(&nav, "left"), ["y"]);
        assert_eq!(elements(&nav, "nested"), ["x"]);
    }

    #[test]
    fn ids_can_be_reused_after_pop() {
        let (tree, nav) = setup();
        tree.register("A", kinds::STACK, None, true).unwrap();
        let opts = || PushOptions::new().id("screen-1").stack("A");

        nav.push_screen("first", opts()).unwrap();
        nav.push_screen("dup", opts()).unwrap();
        assert_eq!(elements(&nav, "A"), ["first"]);

        nav.pop_screen(PopOptions::new().stack("A")).unwrap();
        assert!(elements(&nav, "A").is_empty());

        nav.push_screen("second", opts()).unwrap();
        assert_eq!(elements(&nav, "A"), ["second"]);
    }

    #[test]
    fn unresolved_target_is_an_error() {
        let (_tree, nav) = setup();
        let err = nav.push_screen("x", PushOptions::new()).unwrap_err();
        assert_eq!(
            err,
            NavigationError::UnresolvedTarget {
                operation: "push",
                kind: kinds::STACK
            }
        );
        let message = alloc::string::ToString::to_string(&err);
        assert!(message.starts_with("push: could not resolve stack"), "{message}");

        assert!(nav.pop_screen(PopOptions::new()).is_err());
        assert!(matches!(
            nav.set_active_tab(1, TabOptions::new()),
            Err(NavigationError::UnresolvedTarget { operation: "tab", kind: "tabs" })
        ));
    }

    #[test]
    fn unknown_explicit_stack_is_ignored() {
        let (_tree, nav) = setup();
        nav.set_debug(true);
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        nav.subscribe(move |_| seen.set(seen.get() + 1));

        nav.push_screen("x", PushOptions::new().stack("ghost")).unwrap();
        nav.pop_screen(PopOptions::new().stack("ghost")).unwrap();
        nav.set_active_tab(2, TabOptions::new().tabs("ghost")).unwrap();

        assert_eq!(calls.get(), 0);
        assert!(nav.state().stack("ghost").is_none());
    }

    #[test]
    fn seeded_stack_is_known_without_a_node() {
        let tree = RenderTreeStore::new();
        let state = NavigationState::new().with_stack("saved", vec![ScreenEntry::new("a")]);
        let nav = Navigation::with_config(tree, state, NavigationConfig::default());

        nav.push_screen("b", PushOptions::new().stack("saved")).unwrap();
        assert_eq!(elements(&nav, "saved"), ["a", "b"]);
    }

    #[test]
    fn pop_on_empty_stack_keeps_state() {
        let (tree, nav) = setup();
        tree.register("s", kinds::STACK, None, true).unwrap();
        let before = nav.state();
        nav.pop_screen(PopOptions::new()).unwrap();
        nav.pop_to_root(PopOptions::new()).unwrap();
        assert!(Rc::ptr_eq(&before, &nav.state()));
    }

    #[test]
    fn untouched_stacks_keep_identity_and_stay_quiet() {
        let (tree, nav) = setup();
        tree.register("a", kinds::STACK, None, true).unwrap();
        tree.register("b", kinds::STACK, None, true).unwrap();
        nav.push_screen("a1", PushOptions::new().stack("a")).unwrap();

        let a_calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&a_calls);
        let a = nav.select_stack("a", move |_| seen.set(seen.get() + 1));
        let before = Rc::clone(nav.state().stack("a").unwrap());

        tree.register("t", kinds::TABS, None, true).unwrap();
        nav.push_screen("b1", PushOptions::new().stack("b")).unwrap();
        nav.set_active_tab(1, TabOptions::new().tabs("t")).unwrap();
        assert_eq!(a_calls.get(), 0);
        assert!(Rc::ptr_eq(&before, nav.state().stack("a").unwrap()));

        nav.pop_screen(PopOptions::new().stack("a")).unwrap();
        assert_eq!(a_calls.get(), 1);
        assert!(a.get().is_some_and(|s| s.is_empty()));
    }

    #[test]
    fn tabs_switch_and_notify_only_on_change() {
        let (tree, nav) = setup();
        tree.register("outer", kinds::TABS, None, true).unwrap();
        tree.register("inner", kinds::TABS, Some("outer"), true).unwrap();

        let seen = Rc::new(core::cell::RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let inner = nav.select_active_index("inner", move |i| log.borrow_mut().push(*i));
        assert_eq!(inner.get(), 0);

        nav.set_active_tab(2, TabOptions::new()).unwrap();
        nav.set_active_tab(2, TabOptions::new()).unwrap();
        nav.set_active_tab(1, TabOptions::new().tabs("outer")).unwrap();

        assert_eq!(*seen.borrow(), [2]);
        assert_eq!(nav.state().active_index("outer"), 1);
    }

    #[test]
    fn pop_to_root_and_remove_screen() {
        let (tree, nav) = setup();
        tree.register("s", kinds::STACK, None, true).unwrap();
        tree.register("t", kinds::STACK, None, false).unwrap();
        for id in ["one", "two", "three"] {
            nav.push_screen(id, PushOptions::new().id(id)).unwrap();
        }
        nav.push_screen("other", PushOptions::new().id("other").stack("t")).unwrap();

        assert!(nav.remove_screen("two"));
        assert!(!nav.remove_screen("two"));
        assert_eq!(elements(&nav, "s"), ["one", "three"]);

        nav.pop_to_root(PopOptions::new()).unwrap();
        assert!(elements(&nav, "s").is_empty());
        assert_eq!(elements(&nav, "t"), ["other"]);
    }

    #[test]
    fn reset_and_load_state() {
        let (tree, nav) = setup();
        tree.register("s", kinds::STACK, None, true).unwrap();
        nav.push_screen("x", PushOptions::new()).unwrap();

        nav.reset();
        assert!(nav.state().stack("s").is_none());
        assert!(Rc::ptr_eq(&nav.state(), &nav.store().initial_state()));

        nav.load_state(NavigationState::new().with_tab("tabs", 3));
        assert_eq!(nav.state().active_index("tabs"), 3);
    }

    #[test]
    fn debug_output_shows_state() {
        let (tree, nav) = setup();
        tree.register("s", kinds::STACK, None, true).unwrap();
        nav.push_screen("profile", PushOptions::new()).unwrap();

        let text = alloc::format!("{nav:?}");
        assert!(text.starts_with("Navigation {"), "{text}");
        assert!(text.contains("profile"), "{text}");
    }

    #[test]
    fn pop_count_cascades_into_enclosing_stacks() {
        let (tree, nav) = setup();
        tree.register("outer", kinds::STACK, None, true).unwrap();
        tree.register("panel", kinds::PANEL, Some("outer"), true).unwrap();
        tree.register("inner", kinds::STACK, Some("panel"), true).unwrap();
        for element in ["o1", "o2", "o3"] {
            nav.push_screen(element, PushOptions::new().stack("outer")).unwrap();
        }
        nav.push_screen("i1", PushOptions::new()).unwrap();
        nav.push_screen("i2", PushOptions::new()).unwrap();

        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        nav.subscribe(move |_| seen.set(seen.get() + 1));

        nav.pop_screen(PopOptions::new().count(3)).unwrap();
        assert!(elements(&nav, "inner").is_empty());
        assert_eq!(elements(&nav, "outer"), ["o1", "o2"]);
        assert_eq!(calls.get(), 1, "one transition for the whole cascade");

        nav.pop_screen(PopOptions::new().count(10)).unwrap();
        assert!(elements(&nav, "outer").is_empty());

        let before = nav.state();
        nav.pop_screen(PopOptions::new().count(0)).unwrap();
        nav.pop_screen(PopOptions::new().count(4)).unwrap();
        assert!(Rc::ptr_eq(&before, &nav.state()));
    }

    #[test]
    fn tab_back_walks_selection_history() {
        let (tree, nav) = setup();
        tree.register("t", kinds::TABS, None, true).unwrap();
        assert!(!nav.tab_back(TabOptions::new()).unwrap());

        nav.set_active_tab(1, TabOptions::new()).unwrap();
        nav.set_active_tab(2, TabOptions::new()).unwrap();
        nav.set_active_tab(1, TabOptions::new()).unwrap();
        assert_eq!(nav.state().tab("t").unwrap().history, [0, 2]);

        assert!(nav.tab_back(TabOptions::new()).unwrap());
        assert_eq!(nav.state().active_index("t"), 2);
        assert!(nav.tab_back(TabOptions::new().tabs("t")).unwrap());
        assert_eq!(nav.state().active_index("t"), 0);
        assert_eq!(nav.state().tab("t").unwrap().previous_index(), None);
        assert!(!nav.tab_back(TabOptions::new()).unwrap());
        assert!(!nav.tab_back(TabOptions::new().tabs("ghost")).unwrap());
    }

    #[test]
    fn reselecting_the_active_tab_pops_its_stacks_to_root() {
        let (tree, nav) = setup();
        tree.register("t", kinds::TABS, None, true).unwrap();
        tree.register("home", kinds::STACK, Some("t"), true).unwrap();
        tree.register("search", kinds::STACK, Some("t"), false).unwrap();
        tree.register("nested", kinds::STACK, Some("home"), true).unwrap();
        tree.register("inner-tabs", kinds::TABS, Some("home"), true).unwrap();
        tree.register("inner-stack", kinds::STACK, Some("inner-tabs"), true).unwrap();
        for (stack, element) in [
            ("home", "h1"),
            ("home", "h2"),
            ("nested", "n1"),
            ("search", "s1"),
            ("inner-stack", "x1"),
        ] {
            nav.push_screen(element, PushOptions::new().stack(stack)).unwrap();
        }

        nav.set_active_tab(0, TabOptions::new().tabs("t")).unwrap();
        assert!(elements(&nav, "home").is_empty());
        assert!(elements(&nav, "nested").is_empty());
        assert_eq!(elements(&nav, "search"), ["s1"], "hidden tab keeps its screens");
        assert_eq!(elements(&nav, "inner-stack"), ["x1"], "nested tab group is separate");
        assert!(nav.state().tab("t").is_none(), "selection itself did not change");

        let before = nav.state();
        nav.set_active_tab(0, TabOptions::new().tabs("t")).unwrap();
        assert!(Rc::ptr_eq(&before, &nav.state()));
    }

    #[test]
    fn unmounted_containers_release_their_state() {
        let (tree, nav) = setup();
        for i in 0..100 {
            let id = alloc::format!("s{i}");
            tree.register(&id, kinds::STACK, None, true).unwrap();
            nav.push_screen("screen", PushOptions::new().stack(&id)).unwrap();
            tree.unregister(&id);
        }
        assert_eq!(nav.state().stack_ids().count(), 0);

        nav.push_screen("late", PushOptions::new().stack("s0")).unwrap();
        assert!(nav.state().stack("s0").is_none());

        tree.register("t", kinds::TABS, None, true).unwrap();
        tree.register("under-tabs", kinds::STACK, Some("t"), true).unwrap();
        nav.set_active_tab(2, TabOptions::new()).unwrap();
        nav.push_screen("x", PushOptions::new()).unwrap();
        tree.unregister("t");
        assert!(nav.state().tab("t").is_none());
        assert!(nav.state().stack("under-tabs").is_none());
    }

    #[test]
    fn seeded_state_is_kept_until_forgotten() {
        let tree = RenderTreeStore::new();
        let state = NavigationState::new()
            .with_stack("saved", vec![ScreenEntry::new("a")])
            .with_tab("saved-tabs", 1);
        let nav = Navigation::with_config(tree.clone(), state, NavigationConfig::default());

        tree.register("other", kinds::STACK, None, true).unwrap();
        tree.unregister("other");
        assert_eq!(elements(&nav, "saved"), ["a"]);

        assert!(nav.forget_stack("saved"));
        assert!(!nav.forget_stack("saved"));
        assert!(nav.forget_tabs("saved-tabs"));
        assert!(nav.state().tab("saved-tabs").is_none());

        nav.push_screen("b", PushOptions::new().stack("saved")).unwrap();
        assert!(nav.state().stack("saved").is_none());
    }

    #[test]
    fn last_handle_removes_the_unmount_listener() {
        let tree = RenderTreeStore::new();
        let baseline = tree.store().listener_count();
        let nav: Navigation<&str> = Navigation::new(tree.clone());
        let copy = nav.clone();
        assert_eq!(tree.store().listener_count(), baseline + 1);

        drop(nav);
        assert_eq!(tree.store().listener_count(), baseline + 1);
        drop(copy);
        assert_eq!(tree.store().listener_count(), baseline);
    }
}
