// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom sheets.

use alloc::rc::Rc;
use alloc::vec::Vec;

use trellis_render_tree::{RenderTreeStore, kinds};

use crate::store::{OverlayOptions, OverlayStore};

/// Options for a sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetOptions {
    /// Caller-chosen id.
    pub id: Option<Rc<str>>,
    /// Heights the sheet snaps to, in logical pixels. Empty lets the host size the sheet.
    pub snap_points: Vec<f64>,
    /// Index into `snap_points` to open at.
    pub initial_index: usize,
    /// Whether the user may dismiss the sheet by gesture.
    pub can_dismiss: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            id: None,
            snap_points: Vec::new(),
            initial_index: 0,
            can_dismiss: true,
        }
    }
}

impl SheetOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the snap points.
    pub fn snap_points(mut self, points: impl IntoIterator<Item = f64>) -> Self {
        self.snap_points = points.into_iter().collect();
        self
    }

    /// Set the initial snap index.
    pub fn initial_index(mut self, index: usize) -> Self {
        self.initial_index = index;
        self
    }

    /// Allow or forbid gesture dismissal.
    pub fn can_dismiss(mut self, can_dismiss: bool) -> Self {
        self.can_dismiss = can_dismiss;
        self
    }

    /// The snap point the sheet opens at, if any.
    pub fn initial_snap_point(&self) -> Option<f64> {
        self.snap_points.get(self.initial_index).copied()
    }
}

impl OverlayOptions for SheetOptions {
    const KIND: &'static str = kinds::SHEET;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Sheet presentation state.
pub type Sheets<E> = OverlayStore<E, SheetOptions>;

impl<E: Clone + 'static> Sheets<E> {
    /// Sheets resolved against `render_tree`.
    pub fn sheets(render_tree: RenderTreeStore) -> Self {
        Self::new(render_tree)
    }
}
