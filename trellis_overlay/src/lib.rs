// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_overlay --heading-base-level=0

//! Trellis Overlay: presentation state for toasts, sheets, and modals.
//!
//! An [`OverlayStore`] holds an ordered list of [`OverlayEntry`] values. Each entry has a key
//! the store assigns (`toast-1`, `sheet-2`, ...), an element, flavour-specific options, and an
//! [`OverlayStatus`]. The view layer drives the lifecycle:
//!
//! - [`OverlayStore::present`] adds an entry in [`OverlayStatus::Opening`].
//! - [`OverlayStore::mark_did_open`] moves it to [`OverlayStatus::Open`] once it has appeared.
//! - [`OverlayStore::dismiss`] moves it to [`OverlayStatus::Closing`].
//! - [`OverlayStore::mark_did_dismiss`] removes it once it has disappeared.
//!
//! Views hosting an overlay register themselves in a
//! [`trellis_render_tree::RenderTreeStore`] under the entry key. A dismissal that names no
//! target then closes the overlay whose host is the deepest active one, so a back gesture
//! closes the innermost visible sheet even when sheets were presented in a different order.
//!
//! The flavours differ only in their options and render tree kind: [`Toasts`] with
//! [`ToastOptions`], [`Sheets`] with [`SheetOptions`], and [`Modals`] with [`ModalOptions`].
//!
//! ## Example
//!
//! ```rust
//! use trellis_overlay::{OverlayStatus, SheetOptions, Sheets};
//! use trellis_render_tree::{RenderTreeStore, kinds};
//!
//! let tree = RenderTreeStore::new();
//! let sheets: Sheets<&str> = Sheets::sheets(tree.clone());
//!
//! let key = sheets.present("filters", SheetOptions::new().snap_points([240.0, 480.0]));
//! tree.register(&key, kinds::SHEET, None, true).unwrap();
//! sheets.mark_did_open(&key);
//!
//! // Back gesture: nothing named, the visible sheet closes.
//! sheets.dismiss(None);
//! assert_eq!(sheets.state().get(&key).unwrap().status(), OverlayStatus::Closing);
//!
//! sheets.mark_did_dismiss(&key);
//! assert!(sheets.state().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod modal;
mod sheet;
mod store;
mod toast;

pub use modal::{ModalOptions, Modals};
pub use sheet::{SheetOptions, Sheets};
pub use store::{BaseOptions, OverlayEntry, OverlayOptions, OverlayState, OverlayStatus, OverlayStore};
pub use toast::{DEFAULT_TOAST_DURATION_MS, ToastOptions, ToastPosition, Toasts};
