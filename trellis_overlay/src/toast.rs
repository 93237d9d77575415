// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Toasts: short-lived notifications.

use alloc::rc::Rc;

use trellis_render_tree::{RenderTreeStore, kinds};

use crate::store::{OverlayOptions, OverlayStore};

/// Default time a toast stays up, in milliseconds.
pub const DEFAULT_TOAST_DURATION_MS: u32 = 2000;

/// Screen edge a toast slides in from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToastPosition {
    /// Top edge.
    #[default]
    Top,
    /// Bottom edge.
    Bottom,
}

/// Options for a toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastOptions {
    /// Caller-chosen id.
    pub id: Option<Rc<str>>,
    /// Edge to show the toast at.
    pub position: ToastPosition,
    /// How long the toast stays up before the host dismisses it.
    pub duration_ms: u32,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            id: None,
            position: ToastPosition::default(),
            duration_ms: DEFAULT_TOAST_DURATION_MS,
        }
    }
}

impl ToastOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the position.
    pub fn position(mut self, position: ToastPosition) -> Self {
        self.position = position;
        self
    }

    /// Set the duration.
    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

impl OverlayOptions for ToastOptions {
    const KIND: &'static str = kinds::TOAST;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Toast presentation state.
pub type Toasts<E> = OverlayStore<E, ToastOptions>;

impl<E: Clone + 'static> Toasts<E> {
    /// Toasts resolved against `render_tree`.
    pub fn toasts(render_tree: RenderTreeStore) -> Self {
        Self::new(render_tree)
    }

    /// Show a toast. Same as [`OverlayStore::present`].
    pub fn show(&self, element: E, options: ToastOptions) -> Rc<str> {
        self.present(element, options)
    }

    /// The host finished showing `key`. Same as [`OverlayStore::mark_did_open`].
    pub fn mark_did_show(&self, key: &str) -> bool {
        self.mark_did_open(key)
    }
}
