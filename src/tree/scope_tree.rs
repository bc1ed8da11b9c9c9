//! Arena-backed scope tree.
//!
//! Nodes are stored in a `Vec` and addressed by [`NodeId`]. A node's parent is
//! a plain index, so the back-reference never owns anything. Node 0 is the
//! root; it has no payload and exists for the whole life of the tree.

use crate::model::LogEntry;
use crate::tree::TreeLog;
use serde::Serialize;

/// Index of a node inside one [`ScopeTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Position in arrival order (the root is 0).
    pub fn index(self) -> usize {
        self.0
    }
}

/// How a node was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The payload-less root.
    Root,
    /// Created by `enter`; may have children.
    Scope,
    /// Created by `log`.
    Log,
    /// Created by `metadata`.
    Metadata,
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    payload: Option<LogEntry>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// How the node was created.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The entry stored at this node. `None` only for the root.
    pub fn payload(&self) -> Option<&LogEntry> {
        self.payload.as_ref()
    }

    /// Parent node. `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in arrival order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Accumulating scope tree with a single cursor.
///
/// The tree only grows. `closed` is set once the owning session is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTree {
    nodes: Vec<Node>,
    cursor: NodeId,
    closed: bool,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// A tree holding only the root, with the cursor on it.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                payload: None,
                parent: None,
                children: Vec::new(),
            }],
            cursor: NodeId::ROOT,
            closed: false,
        }
    }

    /// The root id.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// The currently open scope.
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Children of `id` in arrival order; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Number of edges between `id` and the root.
    pub fn depth_of(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Depth of the cursor. Zero at the root.
    pub fn depth(&self) -> usize {
        self.depth_of(self.cursor)
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// True once the owning session has finished writing.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// True if `id` can be reached from the root by following child links.
    pub fn is_reachable(&self, id: NodeId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if !self.children(parent).contains(&current) {
                return false;
            }
            current = parent;
        }
        current == NodeId::ROOT
    }

    /// All node ids in arrival order, the root first.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// All node ids in depth-first pre-order, paired with their depth.
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0, NodeId::ROOT)];
        while let Some((depth, id)) = stack.pop() {
            out.push((depth, id));
            for child in self.children(id).iter().rev() {
                stack.push((depth + 1, *child));
            }
        }
        out
    }

    fn append(&mut self, kind: NodeKind, entry: LogEntry) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            payload: Some(entry),
            parent: Some(self.cursor),
            children: Vec::new(),
        });
        self.nodes[self.cursor.0].children.push(id);
        id
    }
}

impl TreeLog for ScopeTree {
    fn log(&mut self, entry: LogEntry) {
        self.append(NodeKind::Log, entry);
    }

    fn metadata(&mut self, entry: LogEntry) {
        self.append(NodeKind::Metadata, entry);
    }

    fn enter(&mut self, entry: LogEntry) {
        self.cursor = self.append(NodeKind::Scope, entry);
    }

    fn leave(&mut self) {
        if let Some(parent) = self.parent(self.cursor) {
            self.cursor = parent;
        }
    }

    fn reset(&mut self) {
        self.cursor = NodeId::ROOT;
    }
}
