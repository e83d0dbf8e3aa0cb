//! Constructors for green nodes created by rewrites.
//!
//! Factory output carries no formatting decisions beyond what is needed to
//! keep the text valid; nodes are meant to be annotated and handed to a
//! formatting pass.

use rowan::{GreenNode, GreenNodeData, GreenToken, NodeOrToken};

use crate::{GreenElement, SyntaxKind};

/// Creates a token.
pub fn token(kind: SyntaxKind, text: &str) -> GreenToken {
    GreenToken::new(kind.into(), text)
}

/// Creates a node over `children`.
pub fn node(kind: SyntaxKind, children: impl IntoIterator<Item = GreenElement>) -> GreenNode {
    let children: Vec<GreenElement> = children.into_iter().collect();
    GreenNode::new(kind.into(), children)
}

/// Owned copies of the children of `green`.
pub fn children(green: &GreenNodeData) -> Vec<GreenElement> {
    green
        .children()
        .map(|child| match child {
            NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
            NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
        })
        .collect()
}

/// Kind of a green node.
#[inline]
pub fn kind(green: &GreenNodeData) -> SyntaxKind {
    green.kind().into()
}

/// Wraps `element` in a nullable type: `T` becomes `T?`.
pub fn nullable_type(element: GreenNode) -> GreenNode {
    node(
        SyntaxKind::NullableType,
        [element.into(), token(SyntaxKind::Question, "?").into()],
    )
}

/// Creates an identifier name node.
pub fn identifier_name(name: &str) -> GreenNode {
    node(
        SyntaxKind::IdentifierName,
        [token(SyntaxKind::Identifier, name).into()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_type() {
        let element = node(
            SyntaxKind::PredefinedType,
            [token(SyntaxKind::Keyword, "string").into()],
        );
        let nullable = nullable_type(element);

        assert_eq!(kind(&nullable), SyntaxKind::NullableType);
        assert_eq!(nullable.to_string(), "string?");
    }

    #[test]
    fn test_identifier_name() {
        let name = identifier_name("value");
        assert_eq!(kind(&name), SyntaxKind::IdentifierName);
        assert_eq!(name.to_string(), "value");
    }

    #[test]
    fn test_children_are_shared() {
        let name = identifier_name("value");
        let argument = node(SyntaxKind::Argument, [name.clone().into()]);
        let copied = node(SyntaxKind::Argument, children(&argument));

        let first = copied.children().next().and_then(NodeOrToken::into_node).unwrap();
        assert!(std::ptr::eq(first, &*name));
    }
}
