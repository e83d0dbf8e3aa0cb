//! Detection of the null-forgiving operator (`value!`).

use nullsweep_ast::nodes::PostfixUnaryExpression;
use nullsweep_ast::{AstNode, Span, SyntaxKind, SyntaxNode};

use crate::analyzer::{Analyzer, NodeContext};
use crate::{Diagnostic, DiagnosticDescriptor, Severity};

pub const NULL_FORGIVING: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "TZ001",
    title: "Null-Forgiving Operator Usage",
    message_format: "Avoid using the null-forgiving operator (!) as it can lead to null reference exceptions.",
    description: "The null-forgiving operator suppresses nullability warnings, which can lead to runtime exceptions.",
    category: "Safety",
    default_severity: Severity::Error,
    enabled_by_default: true,
};

/// Reports every postfix `!`.
///
/// Prefix `!flag` and `a != b` are different node and token kinds and are
/// never reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullForgivingAnalyzer;

impl NullForgivingAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Returns a diagnostic anchored at `node` if it is a null-forgiving
    /// expression.
    pub fn analyze(&self, node: &SyntaxNode) -> Option<Diagnostic> {
        let expression = PostfixUnaryExpression::cast(node.clone())?;
        if !expression.is_null_forgiving() {
            return None;
        }
        let span = Span::from(node.text_range());
        Some(
            Diagnostic::from_descriptor(&NULL_FORGIVING, span)
                .with_argument(node.text().to_string()),
        )
    }
}

impl Analyzer for NullForgivingAnalyzer {
    fn supported_diagnostics(&self) -> &[DiagnosticDescriptor] {
        std::slice::from_ref(&NULL_FORGIVING)
    }

    fn node_kinds(&self) -> &[SyntaxKind] {
        &[SyntaxKind::PostfixUnaryExpression]
    }

    fn analyze_node(&self, ctx: &mut NodeContext) {
        if let Some(diagnostic) = self.analyze(ctx.node()) {
            ctx.report(diagnostic);
        }
    }
}
