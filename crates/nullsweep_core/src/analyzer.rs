//! Analyzer trait and per-node context.

use nullsweep_ast::{SyntaxKind, SyntaxNode};

use crate::{Diagnostic, DiagnosticDescriptor};

/// A rule that inspects nodes of registered kinds.
///
/// Analyzers are shared between threads and invoked concurrently on
/// different documents, so they must not keep per-document state.
pub trait Analyzer: Send + Sync {
    /// Descriptors of every diagnostic this analyzer can report.
    fn supported_diagnostics(&self) -> &[DiagnosticDescriptor];

    /// Node kinds the analyzer is called for.
    fn node_kinds(&self) -> &[SyntaxKind];

    /// Inspects one node and reports through `ctx`.
    fn analyze_node(&self, ctx: &mut NodeContext);
}

/// The node being analyzed and the diagnostics reported for it.
pub struct NodeContext {
    node: SyntaxNode,
    reported: Vec<Diagnostic>,
}

impl NodeContext {
    pub fn new(node: SyntaxNode) -> Self {
        Self {
            node,
            reported: Vec::new(),
        }
    }

    #[inline]
    pub fn node(&self) -> &SyntaxNode {
        &self.node
    }

    /// Reports a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.reported.push(diagnostic);
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.reported
    }
}
