// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use trellis_navigation::{Navigation, PopOptions, PushOptions};
use trellis_overlay::{SheetOptions, Sheets};
use trellis_render_tree::{RenderTreeStore, kinds};

fn mounted(stacks: usize) -> (RenderTreeStore, Navigation<u32>) {
    let tree = RenderTreeStore::new();
    let mut parent: Option<String> = None;
    for i in 0..stacks {
        let id = format!("stack-{i}");
        tree.register(&id, kinds::STACK, parent.as_deref(), true).unwrap();
        parent = Some(id);
    }
    let nav = Navigation::new(tree.clone());
    (tree, nav)
}

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    for &stacks in &[1usize, 8, 32] {
        group.bench_function(format!("implicit_push_pop_s{stacks}"), |b| {
            b.iter_batched(
                || mounted(stacks),
                |(_tree, nav)| {
                    for i in 0..64 {
                        nav.push_screen(i, PushOptions::new()).unwrap();
                    }
                    for _ in 0..64 {
                        nav.pop_screen(PopOptions::new()).unwrap();
                    }
                    black_box(nav.state());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.bench_function("explicit_push_with_observers", |b| {
        b.iter_batched(
            || {
                let (tree, nav) = mounted(8);
                // Observers of untouched stacks are skipped by identity.
                let selections: Vec<_> = (0..7)
                    .map(|i| nav.select_stack(&format!("stack-{i}"), |_| {}))
                    .collect();
                (tree, nav, selections)
            },
            |(_tree, nav, selections)| {
                for i in 0..64 {
                    nav.push_screen(i, PushOptions::new().stack("stack-7")).unwrap();
                }
                black_box(selections.len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");
    group.bench_function("present_dismiss_nested_sheets", |b| {
        b.iter_batched(
            || {
                let tree = RenderTreeStore::new();
                let sheets: Sheets<u32> = Sheets::sheets(tree.clone());
                (tree, sheets)
            },
            |(tree, sheets)| {
                let mut parent: Option<std::rc::Rc<str>> = None;
                for i in 0..16 {
                    let key = sheets.present(i, SheetOptions::new());
                    tree.register(&key, kinds::SHEET, parent.as_deref(), true).unwrap();
                    parent = Some(key);
                }
                for _ in 0..16 {
                    sheets.dismiss(None);
                }
                black_box(sheets.state().len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_overlay);
criterion_main!(benches);
