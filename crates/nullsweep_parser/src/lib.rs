//! # nullsweep_parser
//!
//! Parser abstraction layer for nullsweep.
//!
//! This crate provides:
//! - A `Parser` trait for implementing source parsers
//! - A built-in C# parser backed by tree-sitter's C# grammar, lowered into
//!   the rowan trees of `nullsweep_ast`
//!
//! ## Architecture
//!
//! Parsers convert source text into a lossless [`SyntaxTree`]: printing the
//! tree reproduces the source byte for byte, so rewrites only change the
//! text they touch.
//!
//! ## Example
//!
//! ```rust
//! use nullsweep_parser::{CSharpParser, Parser};
//!
//! let parser = CSharpParser::new();
//! let source = "string text = null!;\n";
//!
//! let tree = parser.parse(source).unwrap();
//! assert_eq!(tree.text(), source);
//! ```
//!
//! [`SyntaxTree`]: nullsweep_ast::SyntaxTree

mod csharp;
mod error;
mod traits;

pub use csharp::CSharpParser;
pub use error::ParseError;
pub use traits::Parser;
