// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested snapshot of a render tree for inspection and logging.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::tree::RenderTree;
use crate::types::RenderNode;

/// Owned, nested view of one node and its descendants.
///
/// Produced by [`RenderTree::debug_tree`]. The `Display` impl renders one node per line,
/// indented by nesting level:
///
/// ```text
/// render-tree-root [root] depth=1 active
///   main [stack] depth=1 active
///     home [screen] depth=1 inactive (self)
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugNode {
    /// Node id.
    pub id: Rc<str>,
    /// Kind tag.
    pub kind: Rc<str>,
    /// Type-scoped depth.
    pub depth: u32,
    /// Inherited activity.
    pub active: bool,
    /// The node's own activity flag.
    pub active_self: bool,
    /// Children in render order.
    pub children: Vec<DebugNode>,
}

impl DebugNode {
    fn build(tree: &RenderTree, node: &RenderNode) -> Self {
        Self {
            id: Rc::clone(&node.id),
            kind: Rc::clone(&node.kind),
            depth: node.depth,
            active: node.active,
            active_self: node.active_self,
            children: node
                .children
                .iter()
                .filter_map(|c| tree.node(c))
                .map(|c| Self::build(tree, c))
                .collect(),
        }
    }

    /// Total number of nodes in this snapshot, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        write!(
            f,
            "{:indent$}{} [{}] depth={} {}",
            "",
            self.id,
            self.kind,
            self.depth,
            if self.active { "active" } else { "inactive" },
            indent = level * 2
        )?;
        if !self.active_self {
            f.write_str(" (self)")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write(f, level + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DebugNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0)
    }
}

impl RenderTree {
    /// Nested snapshot of the whole tree, starting at the root.
    pub fn debug_tree(&self) -> DebugNode {
        DebugNode::build(self, self.root())
    }

    /// Nested snapshot of the subtree rooted at `id`.
    pub fn debug_subtree(&self, id: &str) -> Option<DebugNode> {
        self.node(id).map(|n| DebugNode::build(self, n))
    }
}
