//! Text and JSON rendering of scope trees.

use crate::model::LogEntry;
use crate::tree::{NodeId, NodeKind, ScopeTree};
use serde::Serialize;

const BRANCH: &str = "├─ ";
const LAST_BRANCH: &str = "└─ ";
const PIPE: &str = "│  ";
const GAP: &str = "   ";

const SCOPE_MARK: &str = "▸ ";
const METADATA_MARK: &str = "• ";
const CURSOR_MARK: &str = " ◂";

/// Nesting levels drawn with connectors; deeper nodes share this indent.
pub const MAX_DRAWN_DEPTH: usize = 32;

const DEEP_MARK: &str = "┆";

/// Draw the tree as indented text, one node per line.
///
/// The root itself is not drawn. Scopes are prefixed `▸`, metadata `•`, and
/// the node under the cursor is suffixed `◂` (nothing is marked when the
/// cursor is on the root). Nodes nested deeper than [`MAX_DRAWN_DEPTH`] keep
/// the indent of that level and are tagged `┆<depth>`.
pub fn render_text(tree: &ScopeTree) -> String {
    if tree.is_empty() {
        return "(empty)".to_string();
    }
    let mut lines = Vec::with_capacity(tree.len());

    // One indent segment per ancestor below the root.
    let mut segments: Vec<&str> = Vec::new();
    let mut stack = Vec::new();
    push_children(tree, NodeId::ROOT, 1, &mut stack);

    while let Some((id, depth, last)) = stack.pop() {
        segments.truncate(depth - 1);
        let drawn = segments.len().min(MAX_DRAWN_DEPTH);
        let mut line = segments[..drawn].concat();
        if depth > MAX_DRAWN_DEPTH + 1 {
            line.push_str(&format!("{DEEP_MARK}{depth} "));
        }
        line.push_str(if last { LAST_BRANCH } else { BRANCH });
        line.push_str(&node_label(tree, id));
        lines.push(line);

        segments.push(if last { GAP } else { PIPE });
        push_children(tree, id, depth + 1, &mut stack);
    }
    lines.join("\n")
}

/// Queue `id`'s children so the first one pops first.
fn push_children(
    tree: &ScopeTree,
    id: NodeId,
    depth: usize,
    stack: &mut Vec<(NodeId, usize, bool)>,
) {
    let children = tree.children(id);
    for (i, child) in children.iter().enumerate().rev() {
        stack.push((*child, depth, i + 1 == children.len()));
    }
}

fn node_label(tree: &ScopeTree, id: NodeId) -> String {
    let Some(node) = tree.node(id) else {
        return String::new();
    };
    let mark = match node.kind() {
        NodeKind::Scope => SCOPE_MARK,
        NodeKind::Metadata => METADATA_MARK,
        NodeKind::Root | NodeKind::Log => "",
    };
    let body = node.payload().map(entry_line).unwrap_or_default();
    let cursor = if tree.cursor() == id { CURSOR_MARK } else { "" };
    format!("{mark}{body}{cursor}")
}

fn entry_line(entry: &LogEntry) -> String {
    let time = entry
        .datetime()
        .map(|dt| dt.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| entry.timestamp().to_string());
    format!("[{time}] {entry}").trim_end().to_string()
}

/// Serializable copy of a whole tree.
///
/// Nodes are listed flat in arrival order and linked by index, so
/// serializing a deep tree never nests.
#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    /// Index of the cursor node.
    pub cursor: usize,
    /// True once the session that wrote the tree has finished.
    pub closed: bool,
    /// Every node, the root first.
    pub nodes: Vec<NodeSnapshot>,
}

/// Serializable copy of one node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    /// Index of the node in arrival order.
    pub id: usize,
    /// Index of the parent; absent for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    /// How the node was created.
    pub kind: NodeKind,
    /// The node's entry; absent for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<LogEntry>,
    /// Child indices in arrival order.
    pub children: Vec<usize>,
}

impl TreeSnapshot {
    /// Copy `tree` into a serializable form.
    pub fn of(tree: &ScopeTree) -> Self {
        let nodes = tree
            .ids()
            .filter_map(|id| {
                let node = tree.node(id)?;
                Some(NodeSnapshot {
                    id: id.index(),
                    parent: node.parent().map(NodeId::index),
                    kind: node.kind(),
                    entry: node.payload().cloned(),
                    children: node.children().iter().map(|c| c.index()).collect(),
                })
            })
            .collect();
        Self {
            cursor: tree.cursor().index(),
            closed: tree.is_closed(),
            nodes,
        }
    }

    /// The root node.
    pub fn root(&self) -> Option<&NodeSnapshot> {
        self.nodes.first()
    }

    /// The node at `id`.
    pub fn node(&self, id: usize) -> Option<&NodeSnapshot> {
        self.nodes.get(id)
    }
}

/// Serialize the tree as pretty-printed JSON.
///
/// # Errors
///
/// Returns the `serde_json` error if serialization fails.
pub fn render_json(tree: &ScopeTree) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&TreeSnapshot::of(tree))
}
