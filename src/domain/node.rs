//! Recursive outline node and its interchange encoding
//!
//! Chapters, sections, subsections and subsubsections share one node shape;
//! the tier of a node is nothing but its depth in the tree.

use std::fmt;

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Named nesting tiers, indexed by depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Chapter,
    Section,
    Subsection,
    Subsubsection,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Chapter,
        Level::Section,
        Level::Subsection,
        Level::Subsubsection,
    ];

    /// Returns the level for a 0-based depth, `None` beyond the named tiers.
    pub fn from_depth(depth: usize) -> Option<Self> {
        Self::ALL.get(depth).copied()
    }

    pub fn depth(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Chapter => write!(f, "chapter"),
            Level::Section => write!(f, "section"),
            Level::Subsection => write!(f, "subsection"),
            Level::Subsubsection => write!(f, "subsubsection"),
        }
    }
}

/// Key holding the children of a node at `depth` in the interchange shape.
pub(crate) fn children_key(depth: usize) -> &'static str {
    match depth {
        0 => "sections",
        1 => "subsections",
        2 => "subsubsections",
        _ => "children",
    }
}

/// One entry of the outline.
///
/// Deserialization accepts any of the depth-specific child keys, so a node
/// read from `{"id", "title", "sections": [...]}` and one read from
/// `{"id", "title", "subsections": [...]}` end up with the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TocNode {
    pub id: String,
    pub title: String,
    #[serde(
        default,
        alias = "sections",
        alias = "subsections",
        alias = "subsubsections"
    )]
    pub children: Vec<TocNode>,
}

impl TocNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TocNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of tiers in the subtree rooted here (a leaf has height 1).
    pub fn height(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TocNode::height)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in the subtree rooted here, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TocNode::count).sum::<usize>()
    }
}

/// Serializes a node with the child key its depth calls for.
pub(crate) struct EncodedNode<'a> {
    node: &'a TocNode,
    depth: usize,
}

impl Serialize for EncodedNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Chapters and sections always carry their child list; deeper tiers
        // only when non-empty (subsections are plain {id, title}).
        let emit_children = self.depth < 2 || !self.node.children.is_empty();
        let len = if emit_children { 3 } else { 2 };

        let mut state = serializer.serialize_struct("TocNode", len)?;
        state.serialize_field("id", &self.node.id)?;
        state.serialize_field("title", &self.node.title)?;
        if emit_children {
            state.serialize_field(
                children_key(self.depth),
                &EncodedNodes::new(&self.node.children, self.depth + 1),
            )?;
        }
        state.end()
    }
}

/// Serializes a sibling list at a given depth.
pub(crate) struct EncodedNodes<'a> {
    nodes: &'a [TocNode],
    depth: usize,
}

impl<'a> EncodedNodes<'a> {
    pub(crate) fn new(nodes: &'a [TocNode], depth: usize) -> Self {
        Self { nodes, depth }
    }
}

impl Serialize for EncodedNodes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.nodes.iter().map(|node| EncodedNode {
            node,
            depth: self.depth,
        }))
    }
}

/// Positional address of a node: 0-based sibling indices from the chapter down.
///
/// The display number is derived from it and never stored on the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The empty path, addressing the document itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// 0-based depth of the addressed node (chapters are 0).
    ///
    /// The root path has no depth and reports 0 as well; check `is_root` first.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn level(&self) -> Option<Level> {
        if self.is_root() {
            None
        } else {
            Level::from_depth(self.depth())
        }
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// 1-based display number, e.g. `2.1.3`.
    pub fn number(&self) -> String {
        self.0
            .iter()
            .map(|i| (i + 1).to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<document>")
        } else {
            write!(f, "{}", self.number())
        }
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}
