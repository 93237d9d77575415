// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render tree basics.
//!
//! Mount nested containers, read type-scoped depth and inherited activity, and print the tree.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example render_tree_basics`

use trellis_render_tree::{RenderTreeStore, kinds};

fn main() {
    env_logger::init();

    let tree = RenderTreeStore::new();

    // A stack nested in another stack, with a screen inside.
    tree.register("outer", kinds::STACK, None, true).unwrap();
    tree.register("inner", kinds::STACK, Some("outer"), true).unwrap();
    tree.register("leaf", kinds::SCREEN, Some("inner"), true).unwrap();

    // A hidden tab group: everything below it is inactive.
    tree.register("tabs", kinds::TABS, None, false).unwrap();
    tree.register("tab-stack", kinds::STACK, Some("tabs"), true).unwrap();
    tree.register("tab-screen", kinds::SCREEN, Some("tab-stack"), true).unwrap();

    let state = tree.state();
    for id in ["outer", "inner", "leaf", "tab-screen"] {
        println!(
            "{id}: depth {:?}, active {}",
            state.depth(id),
            state.is_active(id)
        );
    }
    assert_eq!(state.depth("inner"), Some(2));
    assert_eq!(state.depth("leaf"), Some(1));
    assert!(!state.is_active("tab-screen"));

    // Watch the hidden screen, then show its tab group.
    let watch = tree.select_active("tab-screen", |active| {
        println!("tab-screen is now {}", if *active { "visible" } else { "hidden" });
    });
    tree.register("tabs", kinds::TABS, None, true).unwrap();

    let deepest = tree.resolve(None, kinds::STACK);
    println!("implicit stack target: {deepest:?}");

    println!("{}", tree.state().debug_tree());
    tree.log_debug_tree("after showing tabs");

    watch.unsubscribe(tree.store());
    tree.unregister("outer");
    println!("{} nodes after unmounting `outer`", tree.state().len());
}
