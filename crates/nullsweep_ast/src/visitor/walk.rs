//! Walk functions for tree traversal.
//!
//! These functions provide the traversal logic for the Visitor pattern.
//! They are used by the default implementations in `Visitor` trait.

use std::ops::ControlFlow;

use crate::{SyntaxElement, SyntaxKind, SyntaxNode};

use super::visit::{VisitResult, Visitor};

/// Walks a node by dispatching to the appropriate kind-specific visitor method.
///
/// This function:
/// 1. Calls `enter_node` on the visitor
/// 2. Dispatches to the appropriate `visit_*` method based on node kind
/// 3. Calls `exit_node` on the visitor
pub fn walk_node<V>(visitor: &mut V, node: &SyntaxNode) -> VisitResult
where
    V: Visitor,
{
    visitor.enter_node(node)?;

    let result = match node.kind() {
        SyntaxKind::CompilationUnit => visitor.visit_compilation_unit(node),
        kind if kind.is_type_declaration() => visitor.visit_type_declaration(node),
        SyntaxKind::FieldDeclaration => visitor.visit_field_declaration(node),
        SyntaxKind::MethodDeclaration | SyntaxKind::ConstructorDeclaration => {
            visitor.visit_method_declaration(node)
        }
        SyntaxKind::VariableDeclaration => visitor.visit_variable_declaration(node),
        SyntaxKind::VariableDeclarator => visitor.visit_variable_declarator(node),

        SyntaxKind::Block => visitor.visit_block(node),
        SyntaxKind::LocalDeclarationStatement => visitor.visit_local_declaration_statement(node),
        SyntaxKind::ReturnStatement => visitor.visit_return_statement(node),

        SyntaxKind::PostfixUnaryExpression => visitor.visit_postfix_unary_expression(node),
        SyntaxKind::PrefixUnaryExpression => visitor.visit_prefix_unary_expression(node),
        SyntaxKind::InvocationExpression => visitor.visit_invocation_expression(node),

        SyntaxKind::NullableType => visitor.visit_nullable_type(node),

        _ => visitor.visit_other(node),
    };

    result?;

    visitor.exit_node(node)
}

/// Walks all children of a node in source order.
///
/// Child nodes go through [`Visitor::visit_node`], tokens through
/// [`Visitor::visit_token`]. Supports early termination via
/// `ControlFlow::Break`.
#[inline]
pub fn walk_children<V>(visitor: &mut V, node: &SyntaxNode) -> VisitResult
where
    V: Visitor,
{
    for child in node.children_with_tokens() {
        match child {
            SyntaxElement::Node(child) => visitor.visit_node(&child)?,
            SyntaxElement::Token(token) => visitor.visit_token(&token)?,
        }
    }
    ControlFlow::Continue(())
}
