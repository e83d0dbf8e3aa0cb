//! # nullsweep_ast
//!
//! Concrete syntax tree for nullsweep, built on rowan.
//!
//! The tree is lossless: every byte of the source, whitespace and comments
//! included, is owned by some token, so printing a tree reproduces its
//! source exactly.
//!
//! ## Architecture
//!
//! - **Green layer** ([`GreenNode`], [`GreenToken`]): rowan's immutable,
//!   shared storage nodes. They know their kind, children and width, but
//!   not their position or parent.
//! - **Red layer** ([`SyntaxNode`], [`SyntaxToken`]): rowan cursors created
//!   on demand over a green root, with parent links and absolute offsets.
//! - **Versions** ([`SyntaxTree`]): a green root with a fresh [`TreeId`], so
//!   a [`NodeId`] taken from an older version is detected as stale, plus the
//!   list of nodes marked with [`Annotations`] by the edit that produced it.
//! - **Editing** ([`SyntaxEditor`]): replacements are collected against one
//!   tree version and committed into a new tree. Untouched green subtrees
//!   are shared between the old and the new tree.
//!
//! ## Example
//!
//! ```rust
//! use nullsweep_ast::factory::{node, token};
//! use nullsweep_ast::{SyntaxKind, SyntaxTree};
//!
//! let literal = node(
//!     SyntaxKind::LiteralExpression,
//!     [token(SyntaxKind::Keyword, "null").into()],
//! );
//! let tree = SyntaxTree::new(literal);
//!
//! assert_eq!(tree.text(), "null");
//! assert_eq!(tree.root().kind(), SyntaxKind::LiteralExpression);
//! ```

mod annotation;
mod editor;
pub mod factory;
mod kind;
mod language;
pub mod nodes;
mod span;
mod tree;
pub mod visitor;

pub use annotation::Annotations;
pub use editor::{EditError, SyntaxEditor};
pub use kind::SyntaxKind;
pub use language::{CSharpLanguage, SyntaxElement, SyntaxNode, SyntaxNodeChildren, SyntaxToken};
pub use span::{LineIndex, Location, Position, Span};
pub use tree::{NodeId, SyntaxTree, TreeId};

pub use rowan::ast::AstNode;
pub use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize};

/// A green child: a node or a token.
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitResult, Visitor};
