//! Parser trait definition.

use nullsweep_ast::SyntaxTree;

use crate::ParseError;

/// Trait for parsing source text into a [`SyntaxTree`].
///
/// Implementations must be lossless: the text of the returned tree is the
/// source, byte for byte.
///
/// # Example
///
/// ```rust,ignore
/// use nullsweep_parser::{ParseError, Parser};
/// use nullsweep_ast::SyntaxTree;
///
/// struct MyParser;
///
/// impl Parser for MyParser {
///     fn name(&self) -> &str {
///         "my-parser"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["myext"]
///     }
///
///     fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
///         // Parse implementation
///         todo!()
///     }
/// }
/// ```
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["cs", "csx"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into a syntax tree.
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
