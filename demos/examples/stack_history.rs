// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Async stack driven by a location history.
//!
//! Each visit snapshots the stack; going back replays the earlier snapshot. Push and pop
//! completions resolve when the "view" acknowledges its animations.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example stack_history`

use futures::executor::block_on;
use trellis_stack::{AsyncStack, LocationHistory, StackEvent, sync_with_history};

fn main() {
    env_logger::init();

    let history = LocationHistory::new();
    let stack: AsyncStack<&'static str> = AsyncStack::new();
    let sync = sync_with_history(&history, &stack);

    for event in [
        StackEvent::PushStart,
        StackEvent::PushEnd,
        StackEvent::PopStart,
        StackEvent::PopEnd,
    ] {
        stack.listen(event, move |entry| {
            println!("{event:?}: {} ({})", entry.data(), entry.id());
        });
    }

    let inbox = stack.push("inbox");
    history.navigate("/inbox");
    stack.push_end(inbox.id);
    block_on(inbox.pushed).unwrap();

    let thread = stack.push("thread");
    history.navigate("/inbox/thread");
    // Popped before its enter animation finished: settled first.
    stack.pop();
    stack.pop_end(thread.id);
    block_on(thread.popped).unwrap();

    let print = |label: &str| {
        let items: Vec<_> = stack.state().items().iter().map(|e| *e.data()).collect();
        println!("{label} {} -> {items:?}", history.state().url());
    };
    print("now at");

    history.go_back(1);
    print("back to");
    history.go_back(1);
    print("back to");

    sync.detach(&history);
}
