// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use trellis_render_tree::{RenderTree, kinds};

/// `width` tab groups, each holding a chain of `depth` stacks with a screen at every level.
fn build_tree(width: usize, depth: usize) -> RenderTree {
    let mut tree = RenderTree::new();
    for w in 0..width {
        let tabs = format!("tabs-{w}");
        tree.register(&tabs, kinds::TABS, None, w == 0).unwrap();
        let mut parent = tabs;
        for d in 0..depth {
            let stack = format!("stack-{w}-{d}");
            tree.register(&stack, kinds::STACK, Some(&*parent), true).unwrap();
            let screen = format!("screen-{w}-{d}");
            tree.register(&screen, kinds::SCREEN, Some(&*stack), true).unwrap();
            parent = stack;
        }
    }
    tree
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register");
    for &(width, depth) in &[(4usize, 8usize), (16, 16), (32, 32)] {
        group.throughput(Throughput::Elements((width * depth * 2) as u64));
        group.bench_function(format!("build_w{width}_d{depth}"), |b| {
            b.iter(|| black_box(build_tree(width, depth)));
        });
    }
    group.finish();
}

fn bench_activity(c: &mut Criterion) {
    let mut group = c.benchmark_group("activity");
    for &(width, depth) in &[(4usize, 8usize), (16, 16), (32, 32)] {
        let tree = build_tree(width, depth);
        // Flipping a tab group recomputes its whole subtree.
        group.bench_function(format!("toggle_tab_w{width}_d{depth}"), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    tree.register("tabs-0", kinds::TABS, None, false).unwrap();
                    tree.register("tabs-1", kinds::TABS, None, true).unwrap();
                    black_box(tree);
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("reparent_w{width}_d{depth}"), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    tree.register("stack-0-1", kinds::STACK, Some("tabs-1"), true).unwrap();
                    black_box(tree);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    for &(width, depth) in &[(4usize, 8usize), (16, 16), (32, 32)] {
        let tree = build_tree(width, depth);
        group.bench_function(format!("deepest_active_stack_w{width}_d{depth}"), |b| {
            b.iter(|| black_box(tree.deepest_active_of_type(kinds::STACK).map(|n| n.depth())));
        });
        let leaf = format!("screen-0-{}", depth - 1);
        group.bench_function(format!("closest_stack_w{width}_d{depth}"), |b| {
            b.iter(|| black_box(tree.closest_of_type(&leaf, kinds::STACK).is_some()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_register, bench_activity, bench_queries);
criterion_main!(benches);
