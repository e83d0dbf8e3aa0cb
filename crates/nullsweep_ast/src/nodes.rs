//! Typed views over untyped syntax nodes.
//!
//! A view is a [`SyntaxNode`] whose kind has been checked, with accessors for
//! the children that kind is known to have. Views are created with
//! [`AstNode::cast`] and are as cheap to clone as the node itself.

use rowan::ast::AstNode;

use crate::{CSharpLanguage, SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            type Language = CSharpLanguage;

            #[inline]
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            #[inline]
            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then_some(Self(node))
            }

            #[inline]
            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(
    /// `operand!`, `operand++` or `operand--`.
    PostfixUnaryExpression => PostfixUnaryExpression
);
ast_node!(
    /// `!operand`, `-operand`, ...
    PrefixUnaryExpression => PrefixUnaryExpression
);
ast_node!(
    /// A type followed by one or more declarators.
    VariableDeclaration => VariableDeclaration
);
ast_node!(
    /// A declared name with an optional initializer.
    VariableDeclarator => VariableDeclarator
);
ast_node!(EqualsValueClause => EqualsValueClause);
ast_node!(
    /// `T?`
    NullableType => NullableType
);
ast_node!(LocalDeclarationStatement => LocalDeclarationStatement);
ast_node!(FieldDeclaration => FieldDeclaration);
ast_node!(ReturnStatement => ReturnStatement);
ast_node!(IdentifierName => IdentifierName);

fn first_node(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.first_child()
}

fn child_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|child| child.into_token())
        .find(|token| token.kind() == kind)
}

fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + use<> {
    node.children_with_tokens()
        .filter_map(|child| child.into_token())
        .filter(|token| !token.kind().is_trivia())
}

impl PostfixUnaryExpression {
    /// The expression the operator applies to.
    pub fn operand(&self) -> Option<SyntaxNode> {
        first_node(&self.0)
    }

    pub fn operator_token(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.0).last()
    }

    /// Returns true if the operator is the null-forgiving `!`.
    pub fn is_null_forgiving(&self) -> bool {
        self.operator_token()
            .is_some_and(|token| token.kind() == SyntaxKind::Exclamation)
    }
}

impl PrefixUnaryExpression {
    pub fn operator_token(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.0).next()
    }

    pub fn operand(&self) -> Option<SyntaxNode> {
        first_node(&self.0)
    }
}

impl VariableDeclaration {
    /// The declared type.
    pub fn ty(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|node| node.kind() != SyntaxKind::VariableDeclarator)
            .filter(|node| node.kind().is_type())
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + use<> {
        self.0.children().filter_map(VariableDeclarator::cast)
    }

    /// Returns true for `var` declarations, whose type is inferred.
    pub fn is_implicitly_typed(&self) -> bool {
        self.ty().is_some_and(|ty| match ty.kind() {
            SyntaxKind::ImplicitType => true,
            SyntaxKind::IdentifierName => {
                IdentifierName::cast(ty).and_then(|name| name.name()).as_deref() == Some("var")
            }
            _ => false,
        })
    }
}

impl VariableDeclarator {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Identifier).or_else(|| {
            self.0
                .children()
                .find_map(IdentifierName::cast)
                .and_then(|name| name.identifier_token())
        })
    }

    pub fn initializer(&self) -> Option<EqualsValueClause> {
        self.0.children().find_map(EqualsValueClause::cast)
    }

    /// The initial value, with or without a wrapping `= value` clause.
    pub fn value(&self) -> Option<SyntaxNode> {
        if let Some(clause) = self.initializer() {
            return clause.value();
        }
        let equals = child_token(&self.0, SyntaxKind::Equals)?;
        equals
            .siblings_with_tokens(rowan::Direction::Next)
            .find_map(|sibling| sibling.into_node())
    }
}

impl EqualsValueClause {
    pub fn value(&self) -> Option<SyntaxNode> {
        first_node(&self.0)
    }
}

impl NullableType {
    /// The type being made nullable.
    pub fn element_type(&self) -> Option<SyntaxNode> {
        first_node(&self.0)
    }

    pub fn question_token(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Question)
    }
}

impl LocalDeclarationStatement {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        self.0.children().find_map(VariableDeclaration::cast)
    }

    pub fn is_const(&self) -> bool {
        self.0
            .children()
            .any(|child| child.kind() == SyntaxKind::Modifier && child.text() == "const")
    }
}

impl FieldDeclaration {
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        self.0.children().find_map(VariableDeclaration::cast)
    }
}

impl ReturnStatement {
    pub fn expression(&self) -> Option<SyntaxNode> {
        first_node(&self.0)
    }
}

impl IdentifierName {
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::Identifier)
    }

    pub fn name(&self) -> Option<String> {
        self.identifier_token().map(|token| token.text().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{node, token};
    use crate::{GreenElement, SyntaxTree};
    use pretty_assertions::assert_eq;

    fn tok(kind: SyntaxKind, text: &str) -> GreenElement {
        token(kind, text).into()
    }

    fn ws() -> GreenElement {
        tok(SyntaxKind::Whitespace, " ")
    }

    fn name(text: &str) -> GreenElement {
        node(SyntaxKind::IdentifierName, [tok(SyntaxKind::Identifier, text)]).into()
    }

    /// `T a = x !, b;`
    fn declaration(ty: GreenElement) -> SyntaxTree {
        let suppression = node(
            SyntaxKind::PostfixUnaryExpression,
            [name("x"), ws(), tok(SyntaxKind::Exclamation, "!")],
        );
        let first = node(
            SyntaxKind::VariableDeclarator,
            [
                name("a"),
                ws(),
                tok(SyntaxKind::Equals, "="),
                ws(),
                suppression.into(),
            ],
        );
        let second = node(SyntaxKind::VariableDeclarator, [name("b")]);
        let declaration = node(
            SyntaxKind::VariableDeclaration,
            [
                ty,
                ws(),
                first.into(),
                tok(SyntaxKind::Comma, ","),
                ws(),
                second.into(),
            ],
        );
        SyntaxTree::new(node(
            SyntaxKind::LocalDeclarationStatement,
            [declaration.into(), tok(SyntaxKind::Semicolon, ";")],
        ))
    }

    fn string_type() -> GreenElement {
        node(SyntaxKind::PredefinedType, [tok(SyntaxKind::Keyword, "string")]).into()
    }

    #[test]
    fn test_cast_checks_kind() {
        let tree = declaration(string_type());
        assert!(LocalDeclarationStatement::cast(tree.root()).is_some());
        assert!(VariableDeclaration::cast(tree.root()).is_none());
    }

    #[test]
    fn test_variable_declaration_accessors() {
        let tree = declaration(string_type());
        let statement = LocalDeclarationStatement::cast(tree.root()).unwrap();
        let decl = statement.declaration().unwrap();

        assert_eq!(decl.ty().unwrap().text().to_string(), "string");
        assert!(!decl.is_implicitly_typed());
        assert!(!statement.is_const());

        let names: Vec<_> = decl
            .declarators()
            .filter_map(|d| d.identifier())
            .map(|t| t.text().to_owned())
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let value = decl.declarators().next().unwrap().value().unwrap();
        assert_eq!(value.text().to_string(), "x !");
        assert!(decl.declarators().nth(1).unwrap().value().is_none());
    }

    #[test]
    fn test_postfix_unary_skips_trivia() {
        let tree = declaration(string_type());
        let suppression = tree
            .descendants()
            .find_map(PostfixUnaryExpression::cast)
            .unwrap();

        assert!(suppression.is_null_forgiving());
        assert_eq!(suppression.operand().unwrap().text().to_string(), "x");
        assert_eq!(suppression.operator_token().unwrap().text(), "!");
    }

    #[test]
    fn test_var_is_implicitly_typed() {
        let implicit = node(SyntaxKind::ImplicitType, [tok(SyntaxKind::Keyword, "var")]);
        let tree = declaration(implicit.into());
        let decl = tree.descendants().find_map(VariableDeclaration::cast).unwrap();
        assert!(decl.is_implicitly_typed());

        let tree = declaration(name("var"));
        let decl = tree.descendants().find_map(VariableDeclaration::cast).unwrap();
        assert!(decl.is_implicitly_typed());
    }

    #[test]
    fn test_equals_value_clause() {
        let clause = node(
            SyntaxKind::EqualsValueClause,
            [tok(SyntaxKind::Equals, "="), ws(), name("y")],
        );
        let declarator = node(SyntaxKind::VariableDeclarator, [name("a"), ws(), clause.into()]);
        let tree = SyntaxTree::new(declarator);
        let declarator = VariableDeclarator::cast(tree.root()).unwrap();

        assert!(declarator.initializer().is_some());
        assert_eq!(declarator.value().unwrap().text().to_string(), "y");
    }
}
