// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modals.

use alloc::rc::Rc;

use trellis_render_tree::{RenderTreeStore, kinds};

use crate::store::{OverlayOptions, OverlayStore};

/// Options for a modal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalOptions {
    /// Caller-chosen id.
    pub id: Option<Rc<str>>,
    /// Length of the appear and disappear transitions. `None` uses the host default.
    pub duration_ms: Option<u32>,
}

impl ModalOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the transition length.
    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

impl OverlayOptions for ModalOptions {
    const KIND: &'static str = kinds::MODAL;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Modal presentation state.
pub type Modals<E> = OverlayStore<E, ModalOptions>;

impl<E: Clone + 'static> Modals<E> {
    /// Modals resolved against `render_tree`.
    pub fn modals(render_tree: RenderTreeStore) -> Self {
        Self::new(render_tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_host_is_skipped() {
        let tree = RenderTreeStore::new();
        let modals: Modals<&str> = Modals::modals(tree.clone());
        let first = modals.present("first", ModalOptions::new().with_id("confirm"));
        let second = modals.present("second", ModalOptions::new().duration_ms(150));
        assert_eq!(&*second, "modal-2");

        // Only the first modal's host is visible; the second is on a hidden tab.
        tree.register("hidden", kinds::TABS, None, false).unwrap();
        tree.register(&first, kinds::MODAL, None, true).unwrap();
        tree.register(&second, kinds::MODAL, Some("hidden"), true).unwrap();

        assert!(modals.dismiss(None));
        let state = modals.state();
        assert_eq!(state.get("confirm").unwrap().status(), crate::OverlayStatus::Closing);
        assert_eq!(state.get(&second).unwrap().status(), crate::OverlayStatus::Opening);
    }
}
