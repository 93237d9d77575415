// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation with tabs and nested stacks.
//!
//! Untargeted pushes land in the deepest visible stack. Switching tabs moves that target.
//!
//! Run:
//! - `RUST_LOG=warn cargo run -p trellis_demos --example navigation_tabs`

use trellis_navigation::{
    Navigation, NavigationConfig, NavigationError, NavigationState, PopOptions, PushOptions,
    TabOptions,
};
use trellis_render_tree::{RenderTreeStore, kinds};

fn main() -> Result<(), NavigationError> {
    env_logger::init();

    let tree = RenderTreeStore::new();
    let nav: Navigation<&'static str> = Navigation::with_config(
        tree.clone(),
        NavigationState::new(),
        NavigationConfig { debug: true },
    );

    // Nothing is mounted yet, so an untargeted push cannot be resolved.
    if let Err(err) = nav.push_screen("too early", PushOptions::new()) {
        println!("error: {err}");
    }

    tree.register("tabs", kinds::TABS, None, true).unwrap();
    tree.register("home", kinds::STACK, Some("tabs"), true).unwrap();
    tree.register("search", kinds::STACK, Some("tabs"), false).unwrap();

    let home = nav.select_stack("home", |screens| {
        let count = screens.as_ref().map_or(0, |s| s.len());
        println!("home now has {count} screens");
    });

    nav.push_screen("feed", PushOptions::new().id("feed"))?;
    // A double tap pushes the same id again: ignored.
    nav.push_screen("feed", PushOptions::new().id("feed"))?;

    // Switch to the search tab. The view layer mirrors that into the render tree.
    nav.set_active_tab(1, TabOptions::new())?;
    tree.register("home", kinds::STACK, Some("tabs"), false).unwrap();
    tree.register("search", kinds::STACK, Some("tabs"), true).unwrap();

    // Lands in "search", so the home observer stays quiet.
    nav.push_screen("results", PushOptions::new())?;
    nav.pop_screen(PopOptions::new())?;

    // Back to the tab shown before "search".
    if nav.tab_back(TabOptions::new())? {
        tree.register("search", kinds::STACK, Some("tabs"), false).unwrap();
        tree.register("home", kinds::STACK, Some("tabs"), true).unwrap();
    }
    // Tapping the selected tab again pops "home" back to its root.
    nav.set_active_tab(0, TabOptions::new())?;

    // Unknown explicit target: warned about in debug mode, otherwise ignored.
    nav.push_screen("lost", PushOptions::new().stack("nowhere"))?;

    let state = nav.state();
    println!("active tab: {}", state.active_index("tabs"));
    for stack in ["home", "search"] {
        let screens: Vec<_> = state.screens(stack).iter().map(|s| s.element).collect();
        println!("{stack}: {screens:?}");
    }

    home.unsubscribe(nav.store());
    Ok(())
}
