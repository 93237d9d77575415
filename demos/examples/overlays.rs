// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Toasts, sheets, and modals.
//!
//! Walk entries through opening, open, and closing, with the view layer's acknowledgements
//! played by hand.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example overlays`

use trellis_overlay::{
    ModalOptions, Modals, SheetOptions, Sheets, ToastOptions, ToastPosition, Toasts,
};
use trellis_render_tree::{RenderTreeStore, kinds};

fn main() {
    env_logger::init();

    let tree = RenderTreeStore::new();
    let toasts: Toasts<String> = Toasts::toasts(tree.clone());
    let sheets: Sheets<&'static str> = Sheets::sheets(tree.clone());
    let modals: Modals<&'static str> = Modals::modals(tree.clone());

    toasts.subscribe(|state| {
        let lines: Vec<_> = state
            .entries()
            .iter()
            .map(|e| format!("{}={:?}", e.key(), e.status()))
            .collect();
        println!("toasts: [{}]", lines.join(", "));
    });

    // Showing the same id twice restarts one toast instead of stacking two.
    let saved = toasts.show("Saved".into(), ToastOptions::new().with_id("save"));
    toasts.mark_did_show(&saved);
    toasts.show(
        "Saved again".into(),
        ToastOptions::new()
            .with_id("save")
            .position(ToastPosition::Bottom),
    );
    toasts.dismiss(Some("save"));
    toasts.mark_did_dismiss(&saved);

    // Two sheets, the second hosted inside the first. A back gesture closes the inner one.
    let filters = sheets.present("filters", SheetOptions::new().snap_points([240.0, 480.0]));
    tree.register(&filters, kinds::SHEET, None, true).unwrap();
    let picker = sheets.present("date picker", SheetOptions::new());
    tree.register(&picker, kinds::SHEET, Some(&*filters), true).unwrap();

    sheets.dismiss(None);
    for entry in sheets.state().entries() {
        println!("sheet {} ({}): {:?}", entry.key(), entry.element(), entry.status());
    }
    sheets.mark_did_dismiss(&picker);
    tree.unregister(&picker);

    let confirm = modals.present("discard changes?", ModalOptions::new().duration_ms(150));
    modals.mark_did_open(&confirm);
    modals.dismiss_all();
    modals.mark_did_dismiss(&confirm);
    println!("modals left: {}", modals.state().len());
}
