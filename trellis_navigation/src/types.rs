// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation state, options, and errors.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

/// One screen pushed onto a stack.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenEntry<E> {
    /// Opaque payload rendered by the stack.
    pub element: E,
    /// Optional caller-chosen id, unique within its stack.
    pub id: Option<Rc<str>>,
    /// Options the screen was pushed with.
    pub options: PushOptions,
}

/// Per tab group state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TabState {
    /// Index of the selected tab.
    pub active_index: usize,
    /// Previously selected indices, most recent last. Each index appears at most once.
    pub history: Vec<usize>,
}

impl TabState {
    /// State with `active_index` selected and no history.
    pub fn new(active_index: usize) -> Self {
        Self {
            active_index,
            history: Vec::new(),
        }
    }

    /// The index [`Navigation::tab_back`](crate::Navigation::tab_back) returns to.
    pub fn previous_index(&self) -> Option<usize> {
        self.history.last().copied()
    }
}

/// Screens per stack and selected tab per tab group.
///
/// Both maps hold shared values: an update replaces only the entries it touches, so
/// untouched stacks keep their `Rc` identity from one state to the next.
pub struct NavigationState<E> {
    pub(crate) stacks: HashMap<Rc<str>, Rc<Vec<ScreenEntry<E>>>>,
    pub(crate) tabs: HashMap<Rc<str>, TabState>,
}

impl<E> Clone for NavigationState<E> {
    fn clone(&self) -> Self {
        Self {
            stacks: self.stacks.clone(),
            tabs: self.tabs.clone(),
        }
    }
}

impl<E> Default for NavigationState<E> {
    fn default() -> Self {
        Self {
            stacks: HashMap::new(),
            tabs: HashMap::new(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for NavigationState<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationState")
            .field("stacks", &self.stacks)
            .field("tabs", &self.tabs)
            .finish()
    }
}

impl<E> NavigationState<E> {
    /// Empty state: no stacks, no tab groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed `stack` with `screens`.
    pub fn with_stack(
        mut self,
        stack: &str,
        screens: impl IntoIterator<Item = ScreenEntry<E>>,
    ) -> Self {
        self.stacks
            .insert(stack.into(), Rc::new(screens.into_iter().collect()));
        self
    }

    /// Builder: select `active_index` in tab group `tabs`.
    pub fn with_tab(mut self, tabs: &str, active_index: usize) -> Self {
        self.tabs.insert(tabs.into(), TabState::new(active_index));
        self
    }

    /// Shared screen list of `stack`, if the stack has state.
    pub fn stack(&self, stack: &str) -> Option<&Rc<Vec<ScreenEntry<E>>>> {
        self.stacks.get(stack)
    }

    /// Screens of `stack`, empty if the stack has no state.
    pub fn screens(&self, stack: &str) -> &[ScreenEntry<E>] {
        self.stacks.get(stack).map(|s| s.as_slice()).unwrap_or(&[])
    }

    /// State of tab group `tabs`, if any.
    pub fn tab(&self, tabs: &str) -> Option<&TabState> {
        self.tabs.get(tabs)
    }

    /// Selected index of `tabs`, `0` if the group has no state.
    pub fn active_index(&self, tabs: &str) -> usize {
        self.tab(tabs).map_or(0, |t| t.active_index)
    }

    /// Ids of all stacks with state, in no particular order.
    pub fn stack_ids(&self) -> impl Iterator<Item = &str> {
        self.stacks.keys().map(|k| &**k)
    }

    /// Ids of all tab groups with state, in no particular order.
    pub fn tab_ids(&self) -> impl Iterator<Item = &str> {
        self.tabs.keys().map(|k| &**k)
    }
}

impl<E> ScreenEntry<E> {
    /// Entry for `element` with no id.
    pub fn new(element: E) -> Self {
        Self {
            element,
            id: None,
            options: PushOptions::default(),
        }
    }

    /// Entry for `element` with an id.
    pub fn with_id(element: E, id: &str) -> Self {
        let options = PushOptions::new().id(id);
        Self {
            element,
            id: options.id.clone(),
            options,
        }
    }
}

/// Options for [`Navigation::push_screen`](crate::Navigation::push_screen).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PushOptions {
    /// Screen id. Pushing an id already present on the target stack is a no-op.
    pub id: Option<Rc<str>>,
    /// Target stack. Defaults to the deepest active stack.
    pub stack: Option<Rc<str>>,
}

impl PushOptions {
    /// No id, implicit stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the screen id.
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Target an explicit stack.
    pub fn stack(mut self, stack: &str) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Options for popping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopOptions {
    /// Target stack. Defaults to the deepest active stack.
    pub stack: Option<Rc<str>>,
    /// Screens to pop with [`Navigation::pop_screen`](crate::Navigation::pop_screen).
    ///
    /// What the target stack cannot cover is popped from its enclosing stacks, nearest first.
    pub count: usize,
}

impl Default for PopOptions {
    fn default() -> Self {
        Self {
            stack: None,
            count: 1,
        }
    }
}

impl PopOptions {
    /// Implicit stack, one screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop `count` screens.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Target an explicit stack.
    pub fn stack(mut self, stack: &str) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Options for [`Navigation::set_active_tab`](crate::Navigation::set_active_tab).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabOptions {
    /// Target tab group. Defaults to the deepest active tab group.
    pub tabs: Option<Rc<str>>,
}

impl TabOptions {
    /// Implicit tab group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target an explicit tab group.
    pub fn tabs(mut self, tabs: &str) -> Self {
        self.tabs = Some(tabs.into());
        self
    }
}

/// Runtime configuration for [`Navigation`](crate::Navigation).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationConfig {
    /// Log state transitions and warn about operations on unknown stacks or tab groups.
    pub debug: bool,
}

/// Errors reported by navigation operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// No target was given and no active container of the required kind is mounted.
    #[error(
        "{operation}: could not resolve {kind}. Pass an explicit `{kind}` id or ensure a {kind} container is mounted and active."
    )]
    UnresolvedTarget {
        /// Operation that failed, for example `push`.
        operation: &'static str,
        /// Container kind that was looked up, for example `stack`.
        kind: &'static str,
    },
}
