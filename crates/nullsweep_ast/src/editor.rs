//! Batched node replacement over an immutable tree.

use std::collections::{HashMap, HashSet};

use rowan::{GreenNode, NodeOrToken};
use thiserror::Error;
use tracing::trace;

use crate::factory;
use crate::tree::{Mark, Marks, green_key};
use crate::{Annotations, NodeId, SyntaxKind, SyntaxNode, SyntaxTree, TreeId};

/// Errors raised while recording edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// The node id belongs to another tree version.
    #[error("Stale node id: node belongs to tree {found:?}, editor is at tree {expected:?}")]
    StaleNode {
        /// Tree the editor currently holds.
        expected: TreeId,
        /// Tree the node id came from.
        found: TreeId,
    },

    /// The node already has a pending replacement.
    #[error("{0} node already has a pending replacement")]
    AlreadyReplaced(SyntaxKind),

    /// A node lacks a child its kind requires.
    #[error("{kind} node has no {child}")]
    MissingChild {
        /// Kind of the incomplete node.
        kind: SyntaxKind,
        /// Description of the missing child.
        child: &'static str,
    },
}

impl EditError {
    /// Creates a missing child error.
    pub fn missing_child(kind: SyntaxKind, child: &'static str) -> Self {
        Self::MissingChild { kind, child }
    }
}

type Replacement = Box<dyn FnOnce(GreenNode) -> GreenNode + Send>;

struct Pending {
    rewrite: Replacement,
    annotations: Annotations,
}

/// An editing session over one document tree.
///
/// Replacements are recorded against the editor's current tree and applied
/// together on commit, which produces a new tree version. Reading the tree
/// through [`SyntaxEditor::tree`] commits first, so queries always see every
/// edit recorded so far.
///
/// Replacements compose bottom-up: when both a node and one of its
/// descendants are replaced, the outer replacement receives the node with
/// the inner replacement already applied. Annotated replacements are
/// listed in the committed tree's marks.
pub struct SyntaxEditor {
    tree: SyntaxTree,
    pending: HashMap<NodeId, Pending>,
    commits: usize,
}

impl SyntaxEditor {
    /// Starts a session over `tree`.
    pub fn new(tree: SyntaxTree) -> Self {
        Self {
            tree,
            pending: HashMap::new(),
            commits: 0,
        }
    }

    /// Replaces `target` with `replacement`, discarding any edits recorded
    /// inside `target`.
    pub fn replace_node(&mut self, target: NodeId, replacement: GreenNode) -> Result<(), EditError> {
        self.replace_node_with(target, move |_| replacement)
    }

    /// Replaces `target` with the result of `rewrite`, which receives the
    /// node after edits inside it have been applied.
    pub fn replace_node_with<F>(&mut self, target: NodeId, rewrite: F) -> Result<(), EditError>
    where
        F: FnOnce(GreenNode) -> GreenNode + Send + 'static,
    {
        self.replace_node_annotated(target, Annotations::NONE, rewrite)
    }

    /// Like [`SyntaxEditor::replace_node_with`], and marks the resulting
    /// node with `annotations`.
    pub fn replace_node_annotated<F>(
        &mut self,
        target: NodeId,
        annotations: Annotations,
        rewrite: F,
    ) -> Result<(), EditError>
    where
        F: FnOnce(GreenNode) -> GreenNode + Send + 'static,
    {
        if target.tree() != self.tree.id() || !self.tree.contains(target) {
            return Err(EditError::StaleNode {
                expected: self.tree.id(),
                found: target.tree(),
            });
        }
        if self.pending.contains_key(&target) {
            return Err(EditError::AlreadyReplaced(target.kind()));
        }
        self.pending.insert(
            target,
            Pending {
                rewrite: Box::new(rewrite),
                annotations,
            },
        );
        Ok(())
    }

    /// Number of recorded, uncommitted replacements.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of commits that produced a new tree version.
    #[inline]
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Commits pending edits and returns the current tree.
    pub fn tree(&mut self) -> &SyntaxTree {
        self.commit();
        &self.tree
    }

    /// Applies all pending edits, producing a new tree version.
    pub fn commit(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let edits = self.pending.len();
        let mut targets: HashMap<SyntaxNode, Pending> = self
            .pending
            .drain()
            .filter_map(|(id, pending)| Some((self.tree.node(id)?, pending)))
            .collect();
        // Only the spine above the targets is rebuilt
        let spine: HashSet<SyntaxNode> = targets
            .keys()
            .flat_map(|target| target.ancestors().skip(1))
            .collect();

        let mut marks = self.tree.marks().clone();
        let root = rebuild(&self.tree.root(), &spine, &mut targets, &mut marks);
        self.tree = SyntaxTree::with_marks(root, marks);
        self.commits += 1;
        trace!(edits, tree = ?self.tree.id(), "Committed syntax edits");
    }

    /// Commits pending edits and ends the session.
    pub fn into_tree(mut self) -> SyntaxTree {
        self.commit();
        self.tree
    }
}

fn rebuild(
    node: &SyntaxNode,
    spine: &HashSet<SyntaxNode>,
    targets: &mut HashMap<SyntaxNode, Pending>,
    marks: &mut Marks,
) -> GreenNode {
    let mut green = if spine.contains(node) {
        let children: Vec<_> = node
            .children_with_tokens()
            .map(|child| match child {
                NodeOrToken::Node(child) => NodeOrToken::Node(rebuild(&child, spine, targets, marks)),
                NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
            })
            .collect();
        let rebuilt = factory::node(node.kind(), children);
        // Marks follow a node whose descendants changed
        if let Some(mark) = marks.remove(&green_key(&node.green())) {
            marks.insert(
                green_key(&rebuilt),
                Mark {
                    _green: rebuilt.clone(),
                    annotations: mark.annotations,
                },
            );
        }
        rebuilt
    } else {
        node.green().into_owned()
    };

    if let Some(pending) = targets.remove(node) {
        green = (pending.rewrite)(green);
        if !pending.annotations.is_empty() {
            // A fresh allocation gives the mark a key no other node shares
            green = factory::node(factory::kind(&green), factory::children(&green));
            marks.insert(
                green_key(&green),
                Mark {
                    _green: green.clone(),
                    annotations: pending.annotations,
                },
            );
        }
    }
    green
}
