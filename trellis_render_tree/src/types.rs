// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the render tree: nodes, kind tags, change flags, and errors.

use alloc::rc::Rc;
use smallvec::SmallVec;

/// Id of the sentinel root node.
pub const ROOT_ID: &str = "render-tree-root";

/// Kind of the sentinel root node.
pub const ROOT_KIND: &str = "root";

/// Well-known container kinds.
///
/// Kinds are open strings; these are the tags the Trellis crates agree on.
pub mod kinds {
    /// Navigational stack of screens.
    pub const STACK: &str = "stack";
    /// Tab group.
    pub const TABS: &str = "tabs";
    /// Single screen inside a stack.
    pub const SCREEN: &str = "screen";
    /// Single tab inside a tab group.
    pub const TAB: &str = "tab";
    /// Bottom sheet overlay.
    pub const SHEET: &str = "sheet";
    /// Toast overlay.
    pub const TOAST: &str = "toast";
    /// Modal overlay.
    pub const MODAL: &str = "modal";
    /// Generic panel.
    pub const PANEL: &str = "panel";
}

bitflags::bitflags! {
    /// What a [`register`](crate::RenderTree::register) call changed.
    ///
    /// An empty set means the call was a no-op.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeChanges: u8 {
        /// The node did not exist before.
        const CREATED = 0b0000_0001;
        /// The kind tag changed.
        const KIND    = 0b0000_0010;
        /// The node's own activity flag changed.
        const ACTIVE  = 0b0000_0100;
        /// The node moved to another parent.
        const PARENT  = 0b0000_1000;
    }
}

/// A registered container.
///
/// Nodes are immutable snapshots. Every change produces a new `Rc<RenderNode>`, and nodes
/// untouched by a change keep their identity across tree versions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderNode {
    pub(crate) id: Rc<str>,
    pub(crate) kind: Rc<str>,
    pub(crate) parent: Option<Rc<str>>,
    pub(crate) active_self: bool,
    pub(crate) children: SmallVec<[Rc<str>; 4]>,
    pub(crate) seq: u64,
    pub(crate) depth: u32,
    pub(crate) active: bool,
}

impl RenderNode {
    pub(crate) fn root() -> Self {
        Self {
            id: ROOT_ID.into(),
            kind: ROOT_KIND.into(),
            parent: None,
            active_self: true,
            children: SmallVec::new(),
            seq: 0,
            depth: 1,
            active: true,
        }
    }

    /// Unique id of this node.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind tag, for example [`kinds::STACK`].
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Parent id, `None` only for the root.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The node's own activity flag, ignoring ancestors.
    pub fn active_self(&self) -> bool {
        self.active_self
    }

    /// Child ids in registration order.
    pub fn children(&self) -> &[Rc<str>] {
        &self.children
    }

    /// Number of nodes of this node's kind on the path to the root, inclusive.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether this node and every ancestor are active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Registration sequence number; larger means registered later.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Whether this is the sentinel root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Errors reported by render tree registration and validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderTreeError {
    /// The id belongs to the sentinel root.
    #[error("`{0}` is reserved for the render tree root")]
    ReservedId(Rc<str>),
    /// The requested parent is not registered.
    #[error("cannot register `{id}`: parent `{parent}` is not registered")]
    UnknownParent {
        /// Node being registered.
        id: Rc<str>,
        /// Missing parent.
        parent: Rc<str>,
    },
    /// The requested parent is the node itself or one of its descendants.
    #[error("cannot register `{id}` under `{parent}`: that would create a cycle")]
    Cycle {
        /// Node being registered.
        id: Rc<str>,
        /// Offending parent.
        parent: Rc<str>,
    },
    /// A structural invariant does not hold. Reported by [`RenderTree::validate`](crate::RenderTree::validate).
    #[error("render tree is inconsistent at `{id}`: {reason}")]
    Inconsistent {
        /// Node where the problem was found.
        id: Rc<str>,
        /// What is wrong.
        reason: &'static str,
    },
}
