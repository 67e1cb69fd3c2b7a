//! Outline document: ordered chapters plus copy-on-write editing

use std::collections::HashMap;

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{EncodedNodes, NodePath, TocNode};

/// Root of a table of contents.
///
/// An empty document (`chapters: []`) is valid and means "no TOC yet".
/// Edits never mutate a document in place: every editing method returns a
/// new document and leaves `self` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TocDocument {
    #[serde(default)]
    pub chapters: Vec<TocNode>,
}

impl Serialize for TocDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TocDocument", 1)?;
        state.serialize_field("chapters", &EncodedNodes::new(&self.chapters, 0))?;
        state.end()
    }
}

impl TocDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chapters(chapters: Vec<TocNode>) -> Self {
        Self { chapters }
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn get(&self, path: &NodePath) -> Option<&TocNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.chapters.get(*first)?;
        for &index in rest {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    fn get_mut(&mut self, path: &NodePath) -> Option<&mut TocNode> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.chapters.get_mut(*first)?;
        for &index in rest {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Depth-first, pre-order traversal in document order.
    pub fn iter(&self) -> OutlineIter<'_> {
        OutlineIter::new(self)
    }

    /// Number of tiers present; 0 for an empty document.
    pub fn depth(&self) -> usize {
        self.chapters.iter().map(TocNode::height).max().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.chapters.iter().map(TocNode::count).sum()
    }

    /// Returns a copy with the title of the node at `path` replaced.
    #[instrument(level = "debug", skip(self, title))]
    pub fn with_title(&self, path: &NodePath, title: impl Into<String>) -> DomainResult<Self> {
        let mut next = self.clone();
        let node = next
            .get_mut(path)
            .ok_or_else(|| DomainError::InvalidPath(path.to_string()))?;
        node.title = title.into();
        Ok(next)
    }

    /// Returns a copy with `node` appended as the last child of `parent`.
    ///
    /// The root path appends a chapter.
    #[instrument(level = "debug", skip(self, node), fields(id = %node.id))]
    pub fn with_child(&self, parent: &NodePath, node: TocNode) -> DomainResult<Self> {
        let mut next = self.clone();
        if parent.is_root() {
            next.chapters.push(node);
        } else {
            next.get_mut(parent)
                .ok_or_else(|| DomainError::InvalidPath(parent.to_string()))?
                .children
                .push(node);
        }
        Ok(next)
    }

    /// Returns a copy without the node at `path` (and its subtree).
    ///
    /// Later siblings move up, so their derived numbers change.
    #[instrument(level = "debug", skip(self))]
    pub fn without(&self, path: &NodePath) -> DomainResult<Self> {
        let invalid = || DomainError::InvalidPath(path.to_string());
        let (index, parent) = match path.indices().split_last() {
            Some((index, rest)) => (*index, NodePath::new(rest.to_vec())),
            None => return Err(invalid()),
        };

        let mut next = self.clone();
        let siblings = if parent.is_root() {
            &mut next.chapters
        } else {
            &mut next.get_mut(&parent).ok_or_else(invalid)?.children
        };
        if index >= siblings.len() {
            return Err(invalid());
        }
        let removed = siblings.remove(index);
        debug!("removed {} ({} nodes)", removed.id, removed.count());
        Ok(next)
    }

    /// Checks that every id occurs once in this document.
    pub fn validate(&self) -> DomainResult<()> {
        let mut seen: HashMap<&str, NodePath> = HashMap::new();
        for (path, node) in self.iter() {
            if let Some(first) = seen.get(node.id.as_str()) {
                return Err(DomainError::DuplicateId {
                    id: node.id.clone(),
                    first: first.to_string(),
                    second: path.to_string(),
                });
            }
            seen.insert(&node.id, path);
        }
        Ok(())
    }
}

/// Pre-order iterator yielding each node with its positional path.
pub struct OutlineIter<'a> {
    stack: Vec<(NodePath, &'a TocNode)>,
}

impl<'a> OutlineIter<'a> {
    fn new(document: &'a TocDocument) -> Self {
        let root = NodePath::root();
        let stack = document
            .chapters
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (root.child(i), node))
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for OutlineIter<'a> {
    type Item = (NodePath, &'a TocNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for (i, child) in node.children.iter().enumerate().rev() {
            self.stack.push((path.child(i), child));
        }
        Some((path, node))
    }
}
