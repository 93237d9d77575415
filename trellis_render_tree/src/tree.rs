// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, updates, queries.

use alloc::rc::Rc;
use alloc::{vec, vec::Vec};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::{NodeChanges, ROOT_ID, RenderNode, RenderTreeError};

/// Per-kind counts of the nodes on a root path.
type KindCounts = SmallVec<[(Rc<str>, u32); 4]>;

/// Registry of nested UI containers.
///
/// The tree always holds the sentinel root ([`ROOT_ID`](crate::ROOT_ID)). Every other node
/// names a registered parent, and each node caches its type-scoped depth and inherited
/// activity. Both caches are recomputed for the whole affected subtree by the same call that
/// changed the structure.
///
/// Nodes are stored behind `Rc` and replaced, never mutated, once a clone of the tree exists.
/// Cloning a tree is therefore cheap, and a clone taken before a change still sees the old
/// nodes. Nodes whose fields did not change keep their identity.
///
/// ## Example
///
/// ```rust
/// use trellis_render_tree::{RenderTree, kinds};
///
/// let mut tree = RenderTree::new();
/// tree.register("outer", kinds::STACK, None, true).unwrap();
/// tree.register("panel", kinds::PANEL, Some("outer"), true).unwrap();
/// tree.register("inner", kinds::STACK, Some("panel"), true).unwrap();
///
/// // Depth only counts nodes of the same kind.
/// assert_eq!(tree.depth("outer"), Some(1));
/// assert_eq!(tree.depth("inner"), Some(2));
/// assert_eq!(tree.depth("panel"), Some(1));
///
/// // Untargeted actions go to the deepest active stack.
/// assert_eq!(tree.deepest_active_of_type(kinds::STACK).unwrap().id(), "inner");
///
/// // Deactivating an ancestor hides the whole subtree.
/// tree.register("panel", kinds::PANEL, Some("outer"), false).unwrap();
/// assert!(!tree.is_active("inner"));
/// assert_eq!(tree.deepest_active_of_type(kinds::STACK).unwrap().id(), "outer");
/// ```
#[derive(Clone, Debug)]
pub struct RenderTree {
    nodes: HashMap<Rc<str>, Rc<RenderNode>>,
    next_seq: u64,
}

impl Default for RenderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTree {
    /// Create a tree holding only the sentinel root.
    pub fn new() -> Self {
        let root = RenderNode::root();
        let mut nodes = HashMap::new();
        nodes.insert(Rc::clone(&root.id), Rc::new(root));
        Self { nodes, next_seq: 1 }
    }

    /// Register a node, or update it if `id` is already registered.
    ///
    /// `parent = None` attaches the node to the root. Re-registering with identical
    /// arguments changes nothing and returns an empty [`NodeChanges`]. A parent change
    /// detaches the node from its old parent and appends it to the new parent's children.
    /// Any change recomputes depth and activity for the node and all of its descendants.
    ///
    /// On error the tree is left untouched.
    pub fn register(
        &mut self,
        id: &str,
        kind: &str,
        parent: Option<&str>,
        active: bool,
    ) -> Result<NodeChanges, RenderTreeError> {
        let Plan {
            changes,
            parent_key,
            existing,
        } = self.plan(id, kind, parent, active)?;
        let Some(existing) = existing else {
            let key: Rc<str> = id.into();
            let seq = self.next_seq;
            self.next_seq += 1;
            let node = RenderNode {
                id: Rc::clone(&key),
                kind: kind.into(),
                parent: Some(Rc::clone(&parent_key)),
                active_self: active,
                children: SmallVec::new(),
                seq,
                depth: 0,
                active: false,
            };
            self.nodes.insert(Rc::clone(&key), Rc::new(node));
            self.link_child(&parent_key, Rc::clone(&key));
            self.refresh_subtree(&key);
            log::debug!("render tree: registered `{id}` ({kind}) under `{parent_key}`");
            return Ok(changes);
        };
        if changes.is_empty() {
            return Ok(changes);
        }

        let key = Rc::clone(&existing.id);
        let mut next = (*existing).clone();
        if changes.contains(NodeChanges::KIND) {
            next.kind = kind.into();
        }
        next.active_self = active;
        if changes.contains(NodeChanges::PARENT) {
            if let Some(old) = existing.parent.as_deref() {
                self.unlink_child(old, id);
            }
            next.parent = Some(Rc::clone(&parent_key));
        }
        self.nodes.insert(Rc::clone(&key), Rc::new(next));
        if changes.contains(NodeChanges::PARENT) {
            self.link_child(&parent_key, Rc::clone(&key));
        }
        self.refresh_subtree(&key);
        log::debug!("render tree: updated `{id}` ({changes:?})");
        Ok(changes)
    }

    /// What [`register`](Self::register) would change, without changing anything.
    ///
    /// Fails exactly when `register` would.
    pub fn registration_changes(
        &self,
        id: &str,
        kind: &str,
        parent: Option<&str>,
        active: bool,
    ) -> Result<NodeChanges, RenderTreeError> {
        self.plan(id, kind, parent, active).map(|plan| plan.changes)
    }

    fn plan(
        &self,
        id: &str,
        kind: &str,
        parent: Option<&str>,
        active: bool,
    ) -> Result<Plan, RenderTreeError> {
        if id == ROOT_ID {
            return Err(RenderTreeError::ReservedId(id.into()));
        }
        let parent_id = parent.unwrap_or(ROOT_ID);
        let Some(parent_key) = self.nodes.get_key_value(parent_id).map(|(k, _)| Rc::clone(k))
        else {
            return Err(RenderTreeError::UnknownParent {
                id: id.into(),
                parent: parent_id.into(),
            });
        };
        let Some(existing) = self.nodes.get(id).cloned() else {
            return Ok(Plan {
                changes: NodeChanges::CREATED,
                parent_key,
                existing: None,
            });
        };

        let mut changes = NodeChanges::empty();
        if *existing.kind != *kind {
            changes |= NodeChanges::KIND;
        }
        if existing.active_self != active {
            changes |= NodeChanges::ACTIVE;
        }
        if existing.parent.as_deref() != Some(parent_id) {
            if self.path(parent_id).any(|n| n.id() == id) {
                return Err(RenderTreeError::Cycle {
                    id: id.into(),
                    parent: parent_id.into(),
                });
            }
            changes |= NodeChanges::PARENT;
        }
        Ok(Plan {
            changes,
            parent_key,
            existing: Some(existing),
        })
    }

    /// Remove a node together with its whole subtree.
    ///
    /// Returns `false` if `id` was not registered. The root is never removed.
    pub fn unregister(&mut self, id: &str) -> bool {
        if id == ROOT_ID {
            return false;
        }
        let Some(node) = self.nodes.get(id).cloned() else {
            return false;
        };
        if let Some(parent) = node.parent.as_deref() {
            self.unlink_child(parent, id);
        }
        let mut stack = vec![Rc::clone(&node.id)];
        let mut removed = 0_usize;
        while let Some(id) = stack.pop() {
            if let Some(gone) = self.nodes.remove(&*id) {
                stack.extend(gone.children.iter().cloned());
                removed += 1;
            }
        }
        log::debug!("render tree: unregistered `{id}` ({removed} nodes)");
        true
    }

    /// The sentinel root.
    pub fn root(&self) -> &RenderNode {
        self.nodes
            .get(ROOT_ID)
            .expect("render tree root is always registered")
    }

    /// Look up a node.
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.get(id).map(|n| &**n)
    }

    /// Look up a node's shared snapshot, for identity comparisons.
    pub fn node_rc(&self, id: &str) -> Option<&Rc<RenderNode>> {
        self.nodes.get(id)
    }

    /// Parent of `id`, or `None` for the root and unknown ids.
    pub fn parent(&self, id: &str) -> Option<&RenderNode> {
        self.node(id)?.parent().and_then(|p| self.node(p))
    }

    /// Child ids of `id` in registration order, or an empty slice for unknown ids.
    pub fn children(&self, id: &str) -> &[Rc<str>] {
        self.node(id).map(RenderNode::children).unwrap_or(&[])
    }

    /// Type-scoped depth of `id`: same-kind nodes on the path to the root, inclusive.
    pub fn depth(&self, id: &str) -> Option<u32> {
        self.node(id).map(RenderNode::depth)
    }

    /// Number of `kind` nodes on the path from `id` to the root, inclusive.
    ///
    /// Returns `None` for unknown ids.
    pub fn depth_of_type(&self, id: &str, kind: &str) -> Option<u32> {
        if !self.contains(id) {
            return None;
        }
        let count = self.path(id).filter(|n| n.kind() == kind).count();
        Some(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Whether `id` and all of its ancestors are active. Unknown ids are inactive.
    pub fn is_active(&self, id: &str) -> bool {
        self.node(id).is_some_and(RenderNode::is_active)
    }

    /// Nearest strict ancestor of `id` with the given kind.
    pub fn parent_of_type(&self, id: &str, kind: &str) -> Option<&RenderNode> {
        self.ancestors(id).find(|n| n.kind() == kind)
    }

    /// `id` itself if it has the given kind, otherwise [`RenderTree::parent_of_type`].
    pub fn closest_of_type(&self, id: &str, kind: &str) -> Option<&RenderNode> {
        self.path(id).find(|n| n.kind() == kind)
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: &str) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).and_then(RenderNode::parent),
        }
    }

    /// `id` followed by its ancestors, ending at the root.
    pub fn path(&self, id: &str) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).map(RenderNode::id),
        }
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of registered nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// All nodes in depth-first pre-order, starting at the root, children in render order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: vec![ROOT_ID],
        }
    }

    /// The active node of `kind` with the greatest depth.
    ///
    /// Ties go to the most recently registered node. Updating a node in place keeps its
    /// registration order.
    pub fn deepest_active_of_type(&self, kind: &str) -> Option<&RenderNode> {
        self.nodes
            .values()
            .filter(|n| n.active && *n.kind == *kind)
            .max_by_key(|n| (n.depth, n.seq))
            .map(|n| &**n)
    }

    /// Check every structural invariant and cached value.
    ///
    /// This walks the whole tree and is meant for tests and debug assertions.
    pub fn validate(&self) -> Result<(), RenderTreeError> {
        let fail = |id: &str, reason| {
            Err(RenderTreeError::Inconsistent {
                id: id.into(),
                reason,
            })
        };
        let Some(root) = self.node(ROOT_ID) else {
            return fail(ROOT_ID, "root is missing");
        };
        if !root.is_root() || !root.active_self {
            return fail(ROOT_ID, "root must be parentless and active");
        }
        for (key, node) in &self.nodes {
            if *key != node.id {
                return fail(&**key, "map key differs from node id");
            }
            if let Some(parent) = node.parent() {
                let Some(p) = self.node(parent) else {
                    return fail(&**key, "parent is not registered");
                };
                if p.children.iter().filter(|c| **c == *key).count() != 1 {
                    return fail(&**key, "parent does not list node exactly once");
                }
            } else if **key != *ROOT_ID {
                return fail(&**key, "only the root may be parentless");
            }
            for child in &node.children {
                if self.node(child).and_then(RenderNode::parent) != Some(&**key) {
                    return fail(&**key, "child does not point back to node");
                }
            }

            // Bounded walk so a cycle cannot hang validation.
            let mut depth = 0_u32;
            let mut active = true;
            let mut steps = 0;
            let mut cursor = Some(&**node);
            while let Some(n) = cursor {
                steps += 1;
                if steps > self.nodes.len() {
                    return fail(&**key, "parent links form a cycle");
                }
                if n.kind == node.kind {
                    depth += 1;
                }
                active &= n.active_self;
                cursor = n.parent().and_then(|p| self.node(p));
            }
            if depth != node.depth {
                return fail(&**key, "cached depth is stale");
            }
            if active != node.active {
                return fail(&**key, "cached activity is stale");
            }
        }
        Ok(())
    }

    fn link_child(&mut self, parent: &str, child: Rc<str>) {
        if let Some(p) = self.nodes.get_mut(parent) {
            Rc::make_mut(p).children.push(child);
        }
    }

    fn unlink_child(&mut self, parent: &str, child: &str) {
        if let Some(p) = self.nodes.get_mut(parent) {
            Rc::make_mut(p).children.retain(|c| **c != *child);
        }
    }

    fn kind_counts(&self, id: &str) -> KindCounts {
        let mut counts = KindCounts::new();
        for node in self.path(id) {
            bump(&mut counts, &node.kind);
        }
        counts
    }

    /// Recompute cached depth and activity for `id` and its descendants.
    ///
    /// Walks top-down with an explicit stack, carrying the ancestors' per-kind counts and
    /// activity. Only nodes whose cached values change are replaced.
    fn refresh_subtree(&mut self, id: &Rc<str>) {
        let Some(node) = self.nodes.get(&**id) else {
            return;
        };
        let (counts, parent_active) = match node.parent.as_deref() {
            Some(p) => (self.kind_counts(p), self.is_active(p)),
            None => (KindCounts::new(), true),
        };

        let mut stack = vec![(Rc::clone(id), counts, parent_active)];
        while let Some((id, mut counts, parent_active)) = stack.pop() {
            let Some(entry) = self.nodes.get_mut(&*id) else {
                continue;
            };
            let depth = bump(&mut counts, &entry.kind);
            let active = parent_active && entry.active_self;
            if entry.depth != depth || entry.active != active {
                let node = Rc::make_mut(entry);
                node.depth = depth;
                node.active = active;
            }
            // Reverse so children are visited in render order.
            for child in entry.children.iter().rev() {
                stack.push((Rc::clone(child), counts.clone(), active));
            }
        }
    }
}

fn bump(counts: &mut KindCounts, kind: &Rc<str>) -> u32 {
    if let Some((_, n)) = counts.iter_mut().find(|(k, _)| **k == **kind) {
        *n += 1;
        *n
    } else {
        counts.push((Rc::clone(kind), 1));
        1
    }
}

impl<'a> IntoIterator for &'a RenderTree {
    type Item = &'a RenderNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first pre-order iterator over a [`RenderTree`]. See [`RenderTree::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    tree: &'a RenderTree,
    stack: Vec<&'a str>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a RenderNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            let Some(node) = self.tree.node(id) else {
                continue;
            };
            self.stack.extend(node.children.iter().rev().map(|c| &**c));
            return Some(node);
        }
    }
}

/// Outcome of validating a registration against the current tree.
struct Plan {
    changes: NodeChanges,
    parent_key: Rc<str>,
    existing: Option<Rc<RenderNode>>,
}

/// Walk towards the root. See [`RenderTree::ancestors`] and [`RenderTree::path`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    tree: &'a RenderTree,
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a RenderNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.node(self.next?)?;
        self.next = node.parent();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{PANEL, SCREEN, STACK, TABS};
    use alloc::string::{String, ToString};

    fn ids<'a>(nodes: impl Iterator<Item = &'a RenderNode>) -> Vec<String> {
        nodes.map(|n| n.id().to_string()).collect()
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = RenderTree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.root().id(), ROOT_ID);
        assert!(tree.root().is_active());
        assert_eq!(tree.root().depth(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn nested_stacks_count_only_same_kind() {
        // outer stack -> inner stack -> leaf screen
        let mut tree = RenderTree::new();
        tree.register("outer", STACK, None, true).unwrap();
        tree.register("inner", STACK, Some("outer"), true).unwrap();
        tree.register("leaf", SCREEN, Some("inner"), true).unwrap();

        assert_eq!(tree.depth("outer"), Some(1));
        assert_eq!(tree.depth("inner"), Some(2));
        assert_eq!(tree.depth("leaf"), Some(1));
        assert_eq!(tree.depth_of_type("leaf", STACK), Some(2));
        assert_eq!(tree.depth_of_type("missing", STACK), None);
        tree.validate().unwrap();
    }

    #[test]
    fn inactive_ancestor_hides_descendants() {
        let mut tree = RenderTree::new();
        tree.register("tabs", TABS, None, false).unwrap();
        tree.register("stack", STACK, Some("tabs"), true).unwrap();
        tree.register("screen", SCREEN, Some("stack"), true).unwrap();

        assert!(!tree.is_active("stack"));
        assert!(!tree.is_active("screen"));
        assert!(tree.node("screen").unwrap().active_self());

        tree.register("tabs", TABS, None, true).unwrap();
        assert!(tree.is_active("screen"));
        tree.validate().unwrap();
    }

    #[test]
    fn deepest_active_follows_activity() {
        // Sibling stacks; right holds a nested stack.
        let mut tree = RenderTree::new();
        tree.register("left", STACK, None, true).unwrap();
        tree.register("right", STACK, None, true).unwrap();
        tree.register("nested", STACK, Some("right"), true).unwrap();

        assert_eq!(tree.deepest_active_of_type(STACK).unwrap().id(), "nested");

        tree.register("right", STACK, None, false).unwrap();
        assert_eq!(tree.deepest_active_of_type(STACK).unwrap().id(), "left");
        assert!(tree.deepest_active_of_type(TABS).is_none());
    }

    #[test]
    fn equal_depth_ties_go_to_latest_registration() {
        let mut tree = RenderTree::new();
        tree.register("a", STACK, None, true).unwrap();
        tree.register("b", STACK, None, true).unwrap();
        assert_eq!(tree.deepest_active_of_type(STACK).unwrap().id(), "b");

        // In-place updates keep the original order.
        tree.register("a", STACK, None, false).unwrap();
        tree.register("a", STACK, None, true).unwrap();
        assert_eq!(tree.deepest_active_of_type(STACK).unwrap().id(), "b");
    }

    #[test]
    fn identical_registration_is_a_no_op() {
        let mut tree = RenderTree::new();
        assert_eq!(
            tree.register("s", STACK, None, true).unwrap(),
            NodeChanges::CREATED
        );
        let before = Rc::clone(tree.node_rc("s").unwrap());
        let changes = tree.register("s", STACK, Some(ROOT_ID), true).unwrap();
        assert!(changes.is_empty());
        assert!(Rc::ptr_eq(&before, tree.node_rc("s").unwrap()));
    }

    #[test]
    fn register_reports_changes() {
        let mut tree = RenderTree::new();
        tree.register("p", PANEL, None, true).unwrap();
        tree.register("s", STACK, None, true).unwrap();
        let changes = tree.register("s", SCREEN, Some("p"), false).unwrap();
        assert_eq!(
            changes,
            NodeChanges::KIND | NodeChanges::PARENT | NodeChanges::ACTIVE
        );
    }

    #[test]
    fn reparent_moves_children_and_recomputes_subtree() {
        let mut tree = RenderTree::new();
        tree.register("a", STACK, None, true).unwrap();
        tree.register("b", STACK, None, true).unwrap();
        tree.register("c", PANEL, Some("a"), true).unwrap();
        tree.register("d", STACK, Some("c"), true).unwrap();
        tree.register("e", STACK, Some("d"), true).unwrap();
        assert_eq!(tree.depth("e"), Some(3));

        // Move c (and its subtree) under d's sibling b, then under a stack nested in b.
        tree.register("b2", STACK, Some("b"), true).unwrap();
        tree.register("c", PANEL, Some("b2"), true).unwrap();

        assert!(tree.children("a").is_empty());
        assert_eq!(&*tree.children("b2")[0], "c");
        assert_eq!(tree.depth("d"), Some(3));
        assert_eq!(tree.depth("e"), Some(4));
        tree.validate().unwrap();
    }

    #[test]
    fn reparent_keeps_unrelated_nodes_identical() {
        let mut tree = RenderTree::new();
        tree.register("left", STACK, None, true).unwrap();
        tree.register("left-screen", SCREEN, Some("left"), true).unwrap();
        tree.register("right", STACK, None, true).unwrap();
        tree.register("x", PANEL, Some("right"), true).unwrap();
        tree.register("x-child", STACK, Some("x"), true).unwrap();

        let snapshot = tree.clone();
        tree.register("x", PANEL, None, true).unwrap();

        let same = |id: &str| Rc::ptr_eq(snapshot.node_rc(id).unwrap(), tree.node_rc(id).unwrap());
        assert!(same("left"));
        assert!(same("left-screen"));
        assert!(!same("right"), "old parent lost a child");
        assert!(!same("x"));
        assert!(!same("x-child"), "depth changed from 2 to 1");
        assert_eq!(tree.depth("x-child"), Some(1));
        assert_eq!(snapshot.depth("x-child"), Some(2), "old snapshot is untouched");
    }

    #[test]
    fn errors_leave_tree_unchanged() {
        let mut tree = RenderTree::new();
        tree.register("a", STACK, None, true).unwrap();
        tree.register("b", STACK, Some("a"), true).unwrap();

        assert_eq!(
            tree.register(ROOT_ID, STACK, None, true),
            Err(RenderTreeError::ReservedId(ROOT_ID.into()))
        );
        assert!(matches!(
            tree.register("c", STACK, Some("nope"), true),
            Err(RenderTreeError::UnknownParent { .. })
        ));
        assert!(matches!(
            tree.register("a", STACK, Some("b"), true),
            Err(RenderTreeError::Cycle { .. })
        ));
        assert!(matches!(
            tree.register("a", STACK, Some("a"), true),
            Err(RenderTreeError::Cycle { .. })
        ));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.parent("a").unwrap().id(), ROOT_ID);
        tree.validate().unwrap();
    }

    #[test]
    fn unregister_removes_subtree() {
        let mut tree = RenderTree::new();
        tree.register("a", STACK, None, true).unwrap();
        tree.register("b", SCREEN, Some("a"), true).unwrap();
        tree.register("c", STACK, Some("b"), true).unwrap();
        tree.register("d", STACK, None, true).unwrap();

        assert!(tree.unregister("a"));
        assert!(!tree.contains("b"));
        assert!(!tree.contains("c"));
        assert_eq!(ids(tree.iter()), ["render-tree-root", "d"]);
        assert!(!tree.unregister("a"), "second unregister is a no-op");
        assert!(!tree.unregister(ROOT_ID));
        tree.validate().unwrap();
    }

    #[test]
    fn iteration_is_preorder_in_render_order() {
        let mut tree = RenderTree::new();
        tree.register("a", STACK, None, true).unwrap();
        tree.register("a1", SCREEN, Some("a"), true).unwrap();
        tree.register("a2", SCREEN, Some("a"), true).unwrap();
        tree.register("b", STACK, None, true).unwrap();
        tree.register("a1x", PANEL, Some("a1"), true).unwrap();

        assert_eq!(
            ids(tree.iter()),
            ["render-tree-root", "a", "a1", "a1x", "a2", "b"]
        );
    }

    #[test]
    fn type_lookups() {
        let mut tree = RenderTree::new();
        tree.register("s", STACK, None, true).unwrap();
        tree.register("p", PANEL, Some("s"), true).unwrap();
        tree.register("screen", SCREEN, Some("p"), true).unwrap();

        assert_eq!(tree.parent_of_type("screen", STACK).unwrap().id(), "s");
        assert!(tree.parent_of_type("s", STACK).is_none(), "strict ancestors only");
        assert_eq!(tree.closest_of_type("s", STACK).unwrap().id(), "s");
        assert_eq!(ids(tree.ancestors("screen")), ["p", "s", ROOT_ID]);
        assert_eq!(ids(tree.path("screen")), ["screen", "p", "s", ROOT_ID]);
    }

    #[test]
    fn path_outlives_the_queried_id() {
        let mut tree = RenderTree::new();
        tree.register("s", STACK, None, true).unwrap();
        tree.register("screen-7", SCREEN, Some("s"), true).unwrap();

        let path = {
            let id = alloc::format!("screen-{}", 7);
            tree.path(&id)
        };
        assert_eq!(ids(path), ["screen-7", "s", ROOT_ID]);
        assert_eq!(tree.path("missing").count(), 0);
    }

    #[test]
    fn registration_changes_previews_without_mutating() {
        let mut tree = RenderTree::new();
        assert_eq!(
            tree.registration_changes("s", STACK, None, true),
            Ok(NodeChanges::CREATED)
        );
        assert!(!tree.contains("s"));

        tree.register("s", STACK, None, true).unwrap();
        tree.register("p", PANEL, None, true).unwrap();
        assert!(tree.registration_changes("s", STACK, None, true).unwrap().is_empty());
        assert_eq!(
            tree.registration_changes("s", TABS, Some("p"), false),
            Ok(NodeChanges::KIND | NodeChanges::PARENT | NodeChanges::ACTIVE)
        );
        assert_eq!(tree.parent("s").unwrap().id(), ROOT_ID);
        assert!(matches!(
            tree.registration_changes("p", PANEL, Some("ghost"), true),
            Err(RenderTreeError::UnknownParent { .. })
        ));
    }
}
