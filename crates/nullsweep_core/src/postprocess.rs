//! Passes run over a fixed tree.
//!
//! Rewrites annotate the nodes they create. Post-processors only ever touch
//! annotated nodes, so code the fix did not produce keeps its exact text.

use nullsweep_ast::{
    Annotations, EditError, GreenNode, NodeId, NodeOrToken, SyntaxEditor, SyntaxKind, SyntaxNode,
    SyntaxTree, factory,
};
use tracing::trace;

/// A pass over annotated nodes.
pub trait PostProcessor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Runs the pass, returning the processed tree.
    fn process(&self, tree: SyntaxTree) -> Result<SyntaxTree, EditError>;
}

type Rewrite = fn(GreenNode) -> GreenNode;

/// Records `rewrite` for every marked node selected by `select`. Rewritten
/// nodes keep their annotations for later passes.
fn rewrite_nodes<F>(tree: SyntaxTree, select: F) -> Result<SyntaxTree, EditError>
where
    F: Fn(&SyntaxNode, Annotations) -> Option<Rewrite>,
{
    let edits: Vec<(NodeId, Annotations, Rewrite)> = tree
        .marked()
        .into_iter()
        .filter_map(|(node, annotations)| {
            select(&node, annotations).map(|rewrite| (tree.node_id(&node), annotations, rewrite))
        })
        .collect();
    if edits.is_empty() {
        return Ok(tree);
    }

    let mut editor = SyntaxEditor::new(tree);
    for (id, annotations, rewrite) in edits {
        editor.replace_node_annotated(id, annotations, rewrite)?;
    }
    Ok(editor.into_tree())
}

/// Collapses nullable-of-nullable types: `T??` becomes `T?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simplifier;

impl PostProcessor for Simplifier {
    fn name(&self) -> &'static str {
        "simplifier"
    }

    fn process(&self, tree: SyntaxTree) -> Result<SyntaxTree, EditError> {
        rewrite_nodes(tree, |node, annotations| {
            let collapsible = node.kind() == SyntaxKind::NullableType
                && annotations.contains(Annotations::SIMPLIFY)
                && node
                    .first_child()
                    .is_some_and(|element| element.kind() == SyntaxKind::NullableType);
            collapsible.then_some(collapse_nullable as Rewrite)
        })
    }
}

fn collapse_nullable(outer: GreenNode) -> GreenNode {
    let inner = outer
        .children()
        .find_map(NodeOrToken::into_node)
        .filter(|inner| factory::kind(inner) == SyntaxKind::NullableType)
        .map(|inner| inner.to_owned());
    inner.unwrap_or(outer)
}

/// Normalizes whitespace around annotated nodes.
///
/// - `T ?` becomes `T?`.
/// - Horizontal whitespace left at the end of an expression is removed
///   before `;`, `)`, `]`, `,` and `.`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter;

const TIGHT_TOKENS: &[SyntaxKind] = &[
    SyntaxKind::Semicolon,
    SyntaxKind::CloseParen,
    SyntaxKind::CloseBracket,
    SyntaxKind::Comma,
    SyntaxKind::Dot,
];

impl PostProcessor for Formatter {
    fn name(&self) -> &'static str {
        "formatter"
    }

    fn process(&self, tree: SyntaxTree) -> Result<SyntaxTree, EditError> {
        rewrite_nodes(tree, |node, annotations| {
            if !annotations.contains(Annotations::FORMAT) {
                return None;
            }
            if node.kind() == SyntaxKind::NullableType {
                return is_loose_nullable(node).then_some(tighten_nullable as Rewrite);
            }
            if node.kind().is_expression() && has_loose_end(node) {
                return Some(trim_trailing_whitespace as Rewrite);
            }
            None
        })
    }
}

fn is_horizontal_space(kind: SyntaxKind, text: &str) -> bool {
    kind == SyntaxKind::Whitespace && !text.contains(['\n', '\r'])
}

fn is_loose_nullable(node: &SyntaxNode) -> bool {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .any(|token| token.kind() == SyntaxKind::Whitespace)
}

fn has_loose_end(node: &SyntaxNode) -> bool {
    let Some(last) = node.last_child_or_token().and_then(NodeOrToken::into_token) else {
        return false;
    };
    is_horizontal_space(last.kind(), last.text())
        && last
            .next_token()
            .is_some_and(|next| TIGHT_TOKENS.contains(&next.kind()))
}

fn trim_trailing_whitespace(green: GreenNode) -> GreenNode {
    let mut children = factory::children(&green);
    while children.last().is_some_and(|child| {
        child
            .as_token()
            .is_some_and(|token| is_horizontal_space(token.kind().into(), token.text()))
    }) {
        children.pop();
    }
    factory::node(factory::kind(&green), children)
}

fn tighten_nullable(green: GreenNode) -> GreenNode {
    let children = factory::children(&green).into_iter().filter(|child| {
        child
            .as_token()
            .is_none_or(|token| SyntaxKind::from(token.kind()) != SyntaxKind::Whitespace)
    });
    factory::node(SyntaxKind::NullableType, children)
}

/// An ordered list of post-processors.
pub struct Pipeline {
    processors: Vec<Box<dyn PostProcessor>>,
}

impl Pipeline {
    /// A pipeline that leaves trees unchanged.
    pub fn empty() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Appends a pass.
    pub fn with(mut self, processor: impl PostProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Runs every pass in order.
    pub fn run(&self, mut tree: SyntaxTree) -> Result<SyntaxTree, EditError> {
        for processor in &self.processors {
            tree = processor.process(tree)?;
            trace!(pass = processor.name(), "Post-processed tree");
        }
        Ok(tree)
    }
}

impl Default for Pipeline {
    /// Simplification followed by formatting.
    fn default() -> Self {
        Self::empty().with(Simplifier).with(Formatter)
    }
}
