//! Visitor trait for traversing syntax trees.
//!
//! Each `visit_*` method has a default implementation that walks children,
//! so a visitor only overrides the kinds it cares about.

use std::ops::ControlFlow;

use crate::{SyntaxNode, SyntaxToken};

use super::walk::{walk_children, walk_node};

/// Result type for visitor methods to control traversal.
///
/// - `ControlFlow::Continue(())` - continue visiting children
/// - `ControlFlow::Break(())` - stop traversal early
pub type VisitResult = ControlFlow<()>;

/// Visitor trait for traversing a [`SyntaxTree`](crate::SyntaxTree) without
/// modification.
///
/// # Control Flow
///
/// Return `ControlFlow::Continue(())` to continue traversal, or
/// `ControlFlow::Break(())` to stop early. Use the `?` operator
/// for convenient propagation.
pub trait Visitor: Sized {
    /// Called before visiting any node.
    #[inline]
    fn enter_node(&mut self, _node: &SyntaxNode) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after visiting a node and all its children.
    #[inline]
    fn exit_node(&mut self, _node: &SyntaxNode) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Visits any node by dispatching to the kind-specific method.
    #[inline]
    fn visit_node(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_node(self, node)
    }

    /// Visits a token. Tokens have no children.
    #[inline]
    fn visit_token(&mut self, _token: &SyntaxToken) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Visits any node without a dedicated method.
    fn visit_other(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    // === Declarations ===

    fn visit_compilation_unit(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    /// Visit a class, struct, interface, record or enum declaration.
    fn visit_type_declaration(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_field_declaration(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    /// Visit a method or constructor declaration.
    fn visit_method_declaration(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_variable_declaration(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_variable_declarator(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    // === Statements ===

    fn visit_block(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_local_declaration_statement(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_return_statement(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    // === Expressions ===

    /// Visit `operand!`, `operand++` or `operand--`.
    fn visit_postfix_unary_expression(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_prefix_unary_expression(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_invocation_expression(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }

    // === Types ===

    fn visit_nullable_type(&mut self, node: &SyntaxNode) -> VisitResult {
        walk_children(self, node)
    }
}
