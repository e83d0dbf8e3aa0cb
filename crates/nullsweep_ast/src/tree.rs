//! Versioned trees over a rowan green root.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rowan::{GreenNode, GreenNodeData, NodeOrToken, TextRange, TextSize, TokenAtOffset};

use crate::{Annotations, SyntaxKind, SyntaxNode, SyntaxToken};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one tree version.
///
/// Every [`SyntaxTree`] gets a fresh id, so node ids from an older version
/// can be told apart from ids of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(u64);

impl TreeId {
    fn fresh() -> Self {
        Self(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of a node inside one tree version.
///
/// Like a rowan `SyntaxNodePtr`, the node is found again by kind and range,
/// but only in the tree version the id was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: TreeId,
    kind: SyntaxKind,
    range: TextRange,
}

impl NodeId {
    /// The tree version this id belongs to.
    #[inline]
    pub fn tree(&self) -> TreeId {
        self.tree
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        self.range
    }
}

/// Annotations of one rewritten green node. Holding the node keeps its
/// allocation, and with it the lookup key, alive.
#[derive(Clone)]
pub(crate) struct Mark {
    pub(crate) _green: GreenNode,
    pub(crate) annotations: Annotations,
}

/// Marked green nodes keyed by allocation address.
pub(crate) type Marks = HashMap<usize, Mark>;

#[inline]
pub(crate) fn green_key(green: &GreenNodeData) -> usize {
    std::ptr::from_ref(green) as usize
}

/// An immutable syntax tree.
///
/// A tree is a rowan green root plus a version id and the list of nodes
/// marked with [`Annotations`] by the edit that produced it. Red nodes are
/// created on demand through [`SyntaxTree::root`].
#[derive(Clone)]
pub struct SyntaxTree {
    id: TreeId,
    green: GreenNode,
    marks: Arc<Marks>,
}

impl SyntaxTree {
    /// Builds a tree over a green root.
    pub fn new(green: GreenNode) -> Self {
        Self::with_marks(green, Marks::new())
    }

    pub(crate) fn with_marks(green: GreenNode, marks: Marks) -> Self {
        Self {
            id: TreeId::fresh(),
            green,
            marks: Arc::new(marks),
        }
    }

    /// Identity of this tree version.
    #[inline]
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// The green root shared by this tree.
    #[inline]
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// A red root over the green tree.
    #[inline]
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Identity of `node`, which must belong to this tree.
    pub fn node_id(&self, node: &SyntaxNode) -> NodeId {
        NodeId {
            tree: self.id,
            kind: node.kind(),
            range: node.text_range(),
        }
    }

    /// Resolves a node id. Returns `None` for ids of another tree version.
    pub fn node(&self, id: NodeId) -> Option<SyntaxNode> {
        if id.tree != self.id {
            return None;
        }
        let root = self.root();
        if !root.text_range().contains_range(id.range) {
            return None;
        }
        let covering = match root.covering_element(id.range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent()?,
        };
        covering
            .ancestors()
            .find(|node| node.kind() == id.kind && node.text_range() == id.range)
    }

    /// Returns true if `id` belongs to this tree version.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Full text of the tree.
    pub fn text(&self) -> String {
        self.green.to_string()
    }

    /// Length of the full text in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.green.text_len().into()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All nodes in preorder, the root included.
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode> {
        self.root().descendants()
    }

    /// All tokens in source order, trivia included.
    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        self.root()
            .descendants_with_tokens()
            .filter_map(NodeOrToken::into_token)
    }

    /// Finds the token containing `offset`.
    ///
    /// An offset on the boundary between two tokens resolves to the token
    /// starting there; the end of the text resolves to the last token.
    pub fn find_token(&self, offset: u32) -> Option<SyntaxToken> {
        if offset > self.len() {
            return None;
        }
        match self.root().token_at_offset(TextSize::from(offset)) {
            TokenAtOffset::None => None,
            TokenAtOffset::Single(token) => Some(token),
            TokenAtOffset::Between(_, right) => Some(right),
        }
    }

    /// Annotations of `node`, empty for nodes no edit marked.
    pub fn annotations(&self, node: &SyntaxNode) -> Annotations {
        self.marks
            .get(&green_key(&node.green()))
            .map_or(Annotations::NONE, |mark| mark.annotations)
    }

    /// Every marked node with its annotations, in preorder.
    pub fn marked(&self) -> Vec<(SyntaxNode, Annotations)> {
        if self.marks.is_empty() {
            return Vec::new();
        }
        self.descendants()
            .filter_map(|node| {
                let annotations = self.annotations(&node);
                (!annotations.is_empty()).then_some((node, annotations))
            })
            .collect()
    }

    pub(crate) fn marks(&self) -> &Marks {
        &self.marks
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("id", &self.id)
            .field("len", &self.len())
            .field("marks", &self.marks.len())
            .finish()
    }
}
