//! Documents under analysis.

use std::path::{Path, PathBuf};

use nullsweep_ast::{LineIndex, SyntaxTree};
use nullsweep_parser::{ParseError, Parser};

/// A parsed source file.
///
/// Documents are immutable; a code fix returns a new document that shares
/// the path of the one it was derived from.
#[derive(Debug, Clone)]
pub struct Document {
    path: Option<PathBuf>,
    tree: SyntaxTree,
}

impl Document {
    /// Creates a document over an already parsed tree.
    pub fn new(tree: SyntaxTree) -> Self {
        Self { path: None, tree }
    }

    /// Parses `source` with `parser`.
    pub fn parse(parser: &dyn Parser, source: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parser.parse(source)?))
    }

    /// Sets the file path of the document.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns a document with the same path over `tree`.
    pub fn with_tree(&self, tree: SyntaxTree) -> Self {
        Self {
            path: self.path.clone(),
            tree,
        }
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Full source text.
    pub fn text(&self) -> String {
        self.tree.text()
    }

    /// Builds a line index over the current text.
    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text())
    }

    /// Content hash of the source text.
    pub fn hash(&self) -> blake3::Hash {
        blake3::hash(self.text().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nullsweep_parser::CSharpParser;

    #[test]
    fn test_parse_and_text() {
        let doc = Document::parse(&CSharpParser::new(), "int x = 1;\n").unwrap();
        assert_eq!(doc.text(), "int x = 1;\n");
        assert!(doc.path().is_none());
    }

    #[test]
    fn test_with_tree_keeps_path() {
        let parser = CSharpParser::new();
        let doc = Document::parse(&parser, "int x = 1;")
            .unwrap()
            .with_path("src/Program.cs");
        let other = parser.parse("int y = 2;").unwrap();

        let derived = doc.with_tree(other);
        assert_eq!(derived.path(), Some(Path::new("src/Program.cs")));
        assert_eq!(derived.text(), "int y = 2;");
        assert_ne!(derived.hash(), doc.hash());
    }
}
