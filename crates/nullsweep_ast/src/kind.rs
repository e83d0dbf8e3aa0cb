//! Node and token kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! syntax_kinds {
    ($($(#[$meta:meta])* $kind:ident,)*) => {
        /// Kinds of syntax nodes and tokens.
        ///
        /// Nodes and tokens share one kind space, stored in the tree as the
        /// raw `u16` discriminant. The set is closed: every element produced
        /// by a parser or by the syntax factory has one of these kinds, and
        /// analyzers register interest in nodes by kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "PascalCase")]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($(#[$meta])* $kind,)*
        }

        impl SyntaxKind {
            const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$kind,)*];
        }
    };
}

syntax_kinds! {
    // Trivia
    Whitespace,
    /// `// ...` or `/* ... */`
    Comment,
    /// `#nullable enable`, `#region`, ...
    PreprocessorDirective,

    // Tokens
    Identifier,
    /// Reserved or contextual keyword.
    Keyword,
    NumericLiteral,
    /// A piece of a string or character literal.
    StringLiteral,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,
    /// `??`
    QuestionQuestion,
    Equals,
    EqualsEquals,
    /// `!`, both logical not and the null-forgiving operator.
    Exclamation,
    ExclamationEquals,
    Less,
    Greater,
    PlusPlus,
    MinusMinus,
    /// `=>`
    Arrow,
    /// Any other operator.
    Operator,
    /// Source text no other token kind covers.
    Text,

    // Declarations
    /// Root of a parsed file.
    CompilationUnit,
    /// `using System.Text;`
    UsingDirective,
    /// Block or file-scoped namespace.
    NamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    InterfaceDeclaration,
    RecordDeclaration,
    EnumDeclaration,
    /// Member list of a type or namespace.
    DeclarationList,
    /// Field declaration containing a [`SyntaxKind::VariableDeclaration`].
    FieldDeclaration,
    PropertyDeclaration,
    /// `{ get; set; }`
    AccessorList,
    /// `get;`, `private set;`, `init { ... }`
    Accessor,
    MethodDeclaration,
    ConstructorDeclaration,
    LocalFunctionStatement,
    /// `(int a, string b)`
    ParameterList,
    Parameter,
    /// `[Obsolete]`
    AttributeList,
    /// `public`, `static`, `readonly`, ...
    Modifier,
    /// `<T, U>` after a type name.
    TypeParameterList,
    /// `: Base, IFoo`
    BaseList,

    // Statements
    /// A statement at the top level of a file.
    GlobalStatement,
    Block,
    /// `string s = "";`
    LocalDeclarationStatement,
    /// Type plus one or more declarators.
    VariableDeclaration,
    /// `s = ""` inside a variable declaration.
    VariableDeclarator,
    /// `= value` initializer.
    EqualsValueClause,
    ExpressionStatement,
    ReturnStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ForStatement,
    ForeachStatement,
    TryStatement,
    CatchClause,
    FinallyClause,
    UsingStatement,
    ThrowStatement,
    SwitchStatement,
    EmptyStatement,

    // Types
    /// `string`, `int`, `void`, ...
    PredefinedType,
    /// `var`
    ImplicitType,
    /// `Foo`, as a type or as an expression.
    IdentifierName,
    /// `List<T>`
    GenericName,
    /// `A.B`
    QualifiedName,
    /// `global::A`
    AliasQualifiedName,
    /// `<T>` after a generic name.
    TypeArgumentList,
    /// `T?`
    NullableType,
    /// `T[]`
    ArrayType,
    /// `T*`
    PointerType,
    /// `(int, string)`
    TupleType,
    /// `ref T`
    RefType,

    // Expressions
    /// `1`, `"s"`, `'c'`, `null`, `true`
    LiteralExpression,
    /// `$"..."`
    InterpolatedStringExpression,
    /// `{value}` hole inside an interpolated string.
    Interpolation,
    /// `this` or `base`
    InstanceExpression,
    ParenthesizedExpression,
    /// `!x`, `-x`, `++x`
    PrefixUnaryExpression,
    /// `x!`, `x++`, `x--`
    PostfixUnaryExpression,
    /// `a + b`, `a ?? b`
    BinaryExpression,
    /// `a = b`, `a += b`
    AssignmentExpression,
    /// `c ? a : b`
    ConditionalExpression,
    /// `a.b`
    MemberAccessExpression,
    /// `a?.b`
    ConditionalAccessExpression,
    /// `.b` inside a conditional access.
    MemberBindingExpression,
    InvocationExpression,
    ElementAccessExpression,
    /// `(x, y)`
    ArgumentList,
    /// `[x, y]`
    BracketedArgumentList,
    Argument,
    /// `new T(args)` or `new(args)`
    ObjectCreationExpression,
    /// `{ A = 1 }`
    InitializerExpression,
    /// `(T)x`
    CastExpression,
    /// `x as T`
    AsExpression,
    /// `x is T`, `x is { } y`
    IsExpression,
    LambdaExpression,
    AwaitExpression,
    DefaultExpression,
    TypeOfExpression,
    SwitchExpression,
    ThrowExpression,
    /// `out var x`
    DeclarationExpression,

    /// Source the parser could not make sense of.
    Error,
    /// A node kind without a dedicated variant.
    Unknown,
}

impl SyntaxKind {
    /// Looks up a kind by its raw discriminant.
    #[inline]
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Returns true for whitespace, comments and preprocessor lines.
    #[inline]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace | SyntaxKind::Comment | SyntaxKind::PreprocessorDirective
        )
    }

    /// Returns true if this kind is a type syntax.
    #[inline]
    pub const fn is_type(&self) -> bool {
        matches!(
            self,
            SyntaxKind::PredefinedType
                | SyntaxKind::ImplicitType
                | SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
                | SyntaxKind::QualifiedName
                | SyntaxKind::AliasQualifiedName
                | SyntaxKind::NullableType
                | SyntaxKind::ArrayType
                | SyntaxKind::PointerType
                | SyntaxKind::TupleType
                | SyntaxKind::RefType
        )
    }

    /// Returns true for class, struct, interface, record and enum
    /// declarations.
    #[inline]
    pub const fn is_type_declaration(&self) -> bool {
        matches!(
            self,
            SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::RecordDeclaration
                | SyntaxKind::EnumDeclaration
        )
    }

    /// Returns true if this kind is a statement.
    #[inline]
    pub const fn is_statement(&self) -> bool {
        matches!(
            self,
            SyntaxKind::Block
                | SyntaxKind::LocalDeclarationStatement
                | SyntaxKind::LocalFunctionStatement
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::DoStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::ForeachStatement
                | SyntaxKind::TryStatement
                | SyntaxKind::UsingStatement
                | SyntaxKind::ThrowStatement
                | SyntaxKind::SwitchStatement
                | SyntaxKind::EmptyStatement
        )
    }

    /// Returns true if this kind is an expression.
    ///
    /// Simple and generic names are both types and expressions.
    #[inline]
    pub const fn is_expression(&self) -> bool {
        matches!(
            self,
            SyntaxKind::LiteralExpression
                | SyntaxKind::InterpolatedStringExpression
                | SyntaxKind::InstanceExpression
                | SyntaxKind::ParenthesizedExpression
                | SyntaxKind::PrefixUnaryExpression
                | SyntaxKind::PostfixUnaryExpression
                | SyntaxKind::BinaryExpression
                | SyntaxKind::AssignmentExpression
                | SyntaxKind::ConditionalExpression
                | SyntaxKind::MemberAccessExpression
                | SyntaxKind::ConditionalAccessExpression
                | SyntaxKind::MemberBindingExpression
                | SyntaxKind::InvocationExpression
                | SyntaxKind::ElementAccessExpression
                | SyntaxKind::ObjectCreationExpression
                | SyntaxKind::CastExpression
                | SyntaxKind::AsExpression
                | SyntaxKind::IsExpression
                | SyntaxKind::LambdaExpression
                | SyntaxKind::AwaitExpression
                | SyntaxKind::DefaultExpression
                | SyntaxKind::TypeOfExpression
                | SyntaxKind::SwitchExpression
                | SyntaxKind::ThrowExpression
                | SyntaxKind::IdentifierName
                | SyntaxKind::GenericName
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    #[inline]
    fn from(raw: rowan::SyntaxKind) -> Self {
        Self::from_raw(raw.0).unwrap_or(SyntaxKind::Unknown)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Variant names double as display names
        fmt::Debug::fmt(self, f)
    }
}
