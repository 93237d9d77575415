// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_navigation --heading-base-level=0

//! Trellis Navigation: stacks of screens and tab selection.
//!
//! [`Navigation`] keeps one list of [`ScreenEntry`] per stack id and one [`TabState`] per tab
//! group id. Stacks and tab groups are containers registered in a
//! [`trellis_render_tree::RenderTreeStore`]; when an operation does not name its target, the
//! deepest active container of the right kind is used.
//!
//! - [`Navigation::push_screen`] appends a screen. Pushing an id already on the stack is a no-op,
//!   which absorbs double taps.
//! - [`Navigation::pop_screen`] drops the top screen, or [`PopOptions::count`] screens,
//!   continuing into enclosing stacks when the target runs out. Popping an empty stack is a
//!   no-op.
//! - [`Navigation::set_active_tab`] selects a tab and remembers the previous one for
//!   [`Navigation::tab_back`]. Selecting the tab already shown pops its stacks to their root.
//! - [`Navigation::pop_to_root`], [`Navigation::remove_screen`], [`Navigation::reset`], and
//!   [`Navigation::load_state`] cover the less common transitions.
//!
//! State of a stack or tab group is dropped when its node leaves the render tree.
//! [`Navigation::forget_stack`] and [`Navigation::forget_tabs`] drop it by hand.
//!
//! ## Failure modes
//!
//! - No explicit target and nothing to resolve: [`NavigationError::UnresolvedTarget`]. That is a
//!   programming error, such as pushing before any stack is mounted.
//! - An explicit target that neither has navigation state nor is registered in the render
//!   tree: the call does nothing. With [`NavigationConfig::debug`] on, a warning is logged
//!   through the `log` facade.
//!
//! ## Change notification
//!
//! State is copy-on-write. A transition replaces only the stack or tab group it touches, so
//! [`Navigation::select_stack`] and [`Navigation::select_active_index`] observers of other
//! containers are not notified.
//!
//! ## Example
//!
//! ```rust
//! use trellis_navigation::{Navigation, PushOptions, TabOptions};
//! use trellis_render_tree::{RenderTreeStore, kinds};
//!
//! let tree = RenderTreeStore::new();
//! let nav: Navigation<String> = Navigation::new(tree.clone());
//!
//! // A tab group whose second tab hosts a stack.
//! tree.register("tabs", kinds::TABS, None, true).unwrap();
//! tree.register("feed", kinds::STACK, Some("tabs"), false).unwrap();
//! tree.register("profile", kinds::STACK, Some("tabs"), true).unwrap();
//!
//! nav.set_active_tab(1, TabOptions::new()).unwrap();
//! nav.push_screen("settings".to_string(), PushOptions::new()).unwrap();
//!
//! let state = nav.state();
//! assert_eq!(state.active_index("tabs"), 1);
//! assert_eq!(state.screens("profile")[0].element, "settings");
//! assert!(state.screens("feed").is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod navigation;
mod types;

pub use navigation::Navigation;
pub use types::{
    NavigationConfig, NavigationError, NavigationState, PopOptions, PushOptions, ScreenEntry,
    TabOptions, TabState,
};
