//! Visitor pattern for syntax tree traversal.
//!
//! # Overview
//!
//! - [`Visitor`] - Read-only traversal trait
//! - [`walk_node`] - Dispatch function for kind-specific visitors
//! - [`walk_children`] - Traverse all children of a node
//!
//! # Examples
//!
//! ## Counting Suppressions
//!
//! ```rust
//! use nullsweep_ast::factory::{node, token};
//! use nullsweep_ast::{SyntaxKind, SyntaxNode, SyntaxTree};
//! use nullsweep_ast::visitor::{Visitor, VisitResult, walk_children, walk_node};
//!
//! struct SuppressionCounter {
//!     count: usize,
//! }
//!
//! impl Visitor for SuppressionCounter {
//!     fn visit_postfix_unary_expression(&mut self, node: &SyntaxNode) -> VisitResult {
//!         self.count += 1;
//!         walk_children(self, node)
//!     }
//! }
//!
//! let literal = node(
//!     SyntaxKind::LiteralExpression,
//!     [token(SyntaxKind::Keyword, "null").into()],
//! );
//! let suppression = node(
//!     SyntaxKind::PostfixUnaryExpression,
//!     [literal.into(), token(SyntaxKind::Exclamation, "!").into()],
//! );
//! let tree = SyntaxTree::new(suppression);
//!
//! let mut counter = SuppressionCounter { count: 0 };
//! assert!(walk_node(&mut counter, &tree.root()).is_continue());
//! assert_eq!(counter.count, 1);
//! ```
//!
//! ## Early Termination
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use nullsweep_ast::SyntaxNode;
//! use nullsweep_ast::visitor::{Visitor, VisitResult};
//!
//! struct FirstMethodFinder {
//!     found: Option<SyntaxNode>,
//! }
//!
//! impl Visitor for FirstMethodFinder {
//!     fn visit_method_declaration(&mut self, node: &SyntaxNode) -> VisitResult {
//!         self.found = Some(node.clone());
//!         ControlFlow::Break(()) // Stop traversal
//!     }
//! }
//! ```

mod visit;
mod walk;

pub use visit::{VisitResult, Visitor};
pub use walk::{walk_children, walk_node};
