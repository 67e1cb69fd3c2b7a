//! Outline rendering for `tocsmith tree`

use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodePath, TocDocument, TocNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// A node and its position, labelled `<number> <title>`.
struct Positioned<'a> {
    path: NodePath,
    node: &'a TocNode,
}

impl TreeNodeConvert for Positioned<'_> {
    fn to_tree_string(&self) -> Tree<String> {
        let label = format!("{} {}", self.path.number(), self.node.title);

        // Recursively construct the children
        let leaves: Vec<_> = self
            .node
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                Positioned {
                    path: self.path.child(i),
                    node: child,
                }
                .to_tree_string()
            })
            .collect();

        Tree::new(label).with_leaves(leaves)
    }
}

impl TreeNodeConvert for TocDocument {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty outline".to_string());
        }
        let chapters: Vec<_> = self
            .chapters
            .iter()
            .enumerate()
            .map(|(i, node)| {
                Positioned {
                    path: NodePath::root().child(i),
                    node,
                }
                .to_tree_string()
            })
            .collect();
        Tree::new(format!("Outline ({} nodes)", self.node_count())).with_leaves(chapters)
    }
}
