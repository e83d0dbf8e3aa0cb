//! C# parser.
//!
//! Source is parsed with tree-sitter's C# grammar and lowered into a rowan
//! tree. tree-sitter keeps no text for whitespace and only marks comments and
//! preprocessor lines as extras, so lowering re-reads every gap between two
//! tree-sitter tokens from the source and emits it as trivia tokens. Trivia is
//! always emitted at the level of the enclosing node, so a node's range starts
//! at its first significant token and ends at its last.
//!
//! Parsing is tolerant by default: tree-sitter recovers from syntax errors
//! and the recovered regions become [`SyntaxKind::Error`] nodes, which keeps
//! the rest of the document analyzable. A strict parser reports the first
//! error instead.

use std::collections::VecDeque;

use nullsweep_ast::{GreenNode, SyntaxKind, SyntaxTree};
use rowan::GreenNodeBuilder;
use tracing::debug;

use crate::{ParseError, Parser};

/// Parser for C# source files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpParser {
    strict: bool,
}

impl CSharpParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject sources with syntax errors instead of recovering.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn create_parser() -> Result<tree_sitter::Parser, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| ParseError::internal(e.to_string()))?;
        Ok(parser)
    }
}

impl Parser for CSharpParser {
    fn name(&self) -> &str {
        "csharp"
    }

    fn extensions(&self) -> &[&str] {
        &["cs", "csx"]
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = Self::create_parser()?;
        let parsed = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::internal("tree-sitter returned no tree"))?;
        let root = parsed.root_node();

        if root.has_error() {
            let offset = first_error(root);
            if self.strict {
                return Err(ParseError::invalid_source_at("syntax error", offset));
            }
            debug!(offset, "Recovered from C# syntax error");
        }

        let mut lowering = Lowering::new(source);
        lowering.lower(root);
        let (green, nodes) = lowering.finish();
        if green.text_len() != rowan::TextSize::of(source) {
            return Err(ParseError::internal(format!(
                "tree covers {:?} of {} bytes",
                green.text_len(),
                source.len()
            )));
        }

        debug!(nodes, bytes = source.len(), "Parsed C# source");
        Ok(SyntaxTree::new(green))
    }
}

/// Offset of the first error or missing node, in preorder.
fn first_error(root: tree_sitter::Node<'_>) -> usize {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return node.start_byte();
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return root.start_byte();
            }
        }
    }
}

/// Named tree-sitter nodes lowered to a node holding one token.
fn atomic_token(name: &str) -> Option<SyntaxKind> {
    let kind = match name {
        "identifier" => SyntaxKind::Identifier,
        "integer_literal" | "real_literal" => SyntaxKind::NumericLiteral,
        "string_literal" | "verbatim_string_literal" | "raw_string_literal"
        | "character_literal" | "utf8_string_literal" => SyntaxKind::StringLiteral,
        "null_literal" | "boolean_literal" | "predefined_type" | "implicit_type" => {
            SyntaxKind::Keyword
        }
        _ => return None,
    };
    Some(kind)
}

fn node_kind(name: &str) -> SyntaxKind {
    use SyntaxKind::*;

    match name {
        "compilation_unit" => CompilationUnit,
        "using_directive" => UsingDirective,
        "namespace_declaration" | "file_scoped_namespace_declaration" => NamespaceDeclaration,
        "class_declaration" => ClassDeclaration,
        "struct_declaration" => StructDeclaration,
        "interface_declaration" => InterfaceDeclaration,
        "record_declaration" | "record_struct_declaration" => RecordDeclaration,
        "enum_declaration" => EnumDeclaration,
        "declaration_list" => DeclarationList,
        "field_declaration" => FieldDeclaration,
        "property_declaration" => PropertyDeclaration,
        "accessor_list" => AccessorList,
        "accessor_declaration" => Accessor,
        "method_declaration" => MethodDeclaration,
        "constructor_declaration" => ConstructorDeclaration,
        "local_function_statement" => LocalFunctionStatement,
        "parameter_list" => ParameterList,
        "parameter" => Parameter,
        "attribute_list" => AttributeList,
        "modifier" => Modifier,
        "type_parameter_list" => TypeParameterList,
        "base_list" => BaseList,

        "global_statement" => GlobalStatement,
        "block" => Block,
        "local_declaration_statement" => LocalDeclarationStatement,
        "variable_declaration" => VariableDeclaration,
        "variable_declarator" => VariableDeclarator,
        "equals_value_clause" => EqualsValueClause,
        "expression_statement" => ExpressionStatement,
        "return_statement" => ReturnStatement,
        "if_statement" => IfStatement,
        "while_statement" => WhileStatement,
        "do_statement" => DoStatement,
        "for_statement" => ForStatement,
        "foreach_statement" => ForeachStatement,
        "try_statement" => TryStatement,
        "catch_clause" => CatchClause,
        "finally_clause" => FinallyClause,
        "using_statement" => UsingStatement,
        "throw_statement" => ThrowStatement,
        "switch_statement" => SwitchStatement,
        "empty_statement" => EmptyStatement,

        "predefined_type" => PredefinedType,
        "implicit_type" => ImplicitType,
        "identifier" => IdentifierName,
        "generic_name" => GenericName,
        "qualified_name" => QualifiedName,
        "alias_qualified_name" => AliasQualifiedName,
        "type_argument_list" => TypeArgumentList,
        "nullable_type" => NullableType,
        "array_type" => ArrayType,
        "pointer_type" => PointerType,
        "tuple_type" => TupleType,
        "ref_type" => RefType,

        "null_literal" | "boolean_literal" | "integer_literal" | "real_literal"
        | "character_literal" | "string_literal" | "verbatim_string_literal"
        | "raw_string_literal" | "utf8_string_literal" | "literal" => LiteralExpression,
        "interpolated_string_expression" => InterpolatedStringExpression,
        "interpolation" => Interpolation,
        "this_expression" | "this" | "base_expression" | "base" => InstanceExpression,
        "parenthesized_expression" => ParenthesizedExpression,
        "prefix_unary_expression" => PrefixUnaryExpression,
        "postfix_unary_expression" => PostfixUnaryExpression,
        "binary_expression" => BinaryExpression,
        "assignment_expression" => AssignmentExpression,
        "conditional_expression" => ConditionalExpression,
        "member_access_expression" => MemberAccessExpression,
        "conditional_access_expression" => ConditionalAccessExpression,
        "member_binding_expression" => MemberBindingExpression,
        "invocation_expression" => InvocationExpression,
        "element_access_expression" => ElementAccessExpression,
        "argument_list" => ArgumentList,
        "bracketed_argument_list" => BracketedArgumentList,
        "argument" => Argument,
        "object_creation_expression" | "implicit_object_creation_expression" => {
            ObjectCreationExpression
        }
        "initializer_expression" => InitializerExpression,
        "cast_expression" => CastExpression,
        "as_expression" => AsExpression,
        "is_pattern_expression" | "is_expression" => IsExpression,
        "lambda_expression" => LambdaExpression,
        "await_expression" => AwaitExpression,
        "default_expression" => DefaultExpression,
        "typeof_expression" => TypeOfExpression,
        "switch_expression" => SwitchExpression,
        "throw_expression" => ThrowExpression,
        "declaration_expression" => DeclarationExpression,

        "ERROR" => Error,
        _ => Unknown,
    }
}

/// Kind of a token without a node of its own.
fn token_kind(name: &str, text: &str) -> SyntaxKind {
    use SyntaxKind::*;

    if name.contains("string") || name.contains("escape") || name.contains("character") {
        return StringLiteral;
    }
    match text {
        "!" => Exclamation,
        "?" => Question,
        "??" => QuestionQuestion,
        ";" => Semicolon,
        "," => Comma,
        "." => Dot,
        ":" => Colon,
        "(" => OpenParen,
        ")" => CloseParen,
        "[" => OpenBracket,
        "]" => CloseBracket,
        "{" => OpenBrace,
        "}" => CloseBrace,
        "=" => Equals,
        "==" => EqualsEquals,
        "!=" => ExclamationEquals,
        "=>" => Arrow,
        "++" => PlusPlus,
        "--" => MinusMinus,
        "<" => Less,
        ">" => Greater,
        _ if name == "identifier" => Identifier,
        _ if text.chars().all(|c| c.is_alphanumeric() || c == '_') => {
            if text.starts_with(|c: char| c.is_ascii_digit()) {
                NumericLiteral
            } else {
                Keyword
            }
        }
        _ if text.chars().all(|c| c.is_ascii_punctuation()) => Operator,
        _ => Text,
    }
}

fn extra_kind(node: tree_sitter::Node<'_>) -> SyntaxKind {
    if node.kind() == "comment" {
        SyntaxKind::Comment
    } else {
        SyntaxKind::PreprocessorDirective
    }
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// A parent whose only child spans it and lowers to the same kind adds
/// nothing to the tree.
fn collapses(node: tree_sitter::Node<'_>) -> bool {
    if node.child_count() != 1 || node.named_child_count() != 1 {
        return false;
    }
    let mut cursor = node.walk();
    let only = node.children(&mut cursor).next();
    only.is_some_and(|child| {
        child.start_byte() == node.start_byte()
            && child.end_byte() == node.end_byte()
            && node_kind(child.kind()) == node_kind(node.kind())
    })
}

/// What entering a tree-sitter node produced.
enum Entered {
    /// Nothing to descend into.
    Done,
    /// Descend; `true` if a rowan node was opened for it.
    Descend(bool),
}

struct Lowering<'s> {
    source: &'s str,
    builder: GreenNodeBuilder<'static>,
    /// Bytes of source already emitted.
    pos: usize,
    /// Extras skipped by the walk, waiting for the next gap flush.
    extras: VecDeque<(usize, usize, SyntaxKind)>,
    nodes: usize,
}

impl<'s> Lowering<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            builder: GreenNodeBuilder::new(),
            pos: 0,
            extras: VecDeque::new(),
            nodes: 0,
        }
    }

    fn lower(&mut self, root: tree_sitter::Node<'_>) {
        self.builder.start_node(SyntaxKind::CompilationUnit.into());
        self.nodes += 1;

        let mut cursor = root.walk();
        let mut opened: Vec<bool> = Vec::new();
        if !cursor.goto_first_child() {
            return;
        }
        'walk: loop {
            if let Entered::Descend(open) = self.enter(cursor.node()) {
                if cursor.goto_first_child() {
                    opened.push(open);
                    continue;
                }
                if open {
                    self.builder.finish_node();
                }
            }
            loop {
                if cursor.goto_next_sibling() {
                    continue 'walk;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
                match opened.pop() {
                    Some(true) => self.builder.finish_node(),
                    Some(false) => {}
                    None => break 'walk,
                }
            }
        }
    }

    fn enter(&mut self, node: tree_sitter::Node<'_>) -> Entered {
        let (start, end) = (node.start_byte(), node.end_byte());
        if node.is_extra() {
            self.extras.push_back((start, end, extra_kind(node)));
            return Entered::Done;
        }
        if start == end || end <= self.pos {
            return Entered::Done;
        }

        let name = node.kind();
        if !node.is_named() {
            if node.child_count() > 0 {
                return Entered::Descend(false);
            }
            self.flush(start);
            self.token(token_kind(name, &self.source[start..end]), end);
            return Entered::Done;
        }

        if let Some(token) = atomic_token(name) {
            self.flush(start);
            self.builder.start_node(node_kind(name).into());
            self.nodes += 1;
            self.token(token, end);
            self.builder.finish_node();
            return Entered::Done;
        }

        if node.child_count() == 0 {
            self.flush(start);
            let kind = node_kind(name);
            if kind == SyntaxKind::Unknown {
                self.token(token_kind(name, &self.source[start..end]), end);
            } else {
                self.builder.start_node(kind.into());
                self.nodes += 1;
                self.token(token_kind(name, &self.source[start..end]), end);
                self.builder.finish_node();
            }
            return Entered::Done;
        }

        if collapses(node) {
            return Entered::Descend(false);
        }
        self.flush(start);
        self.builder.start_node(node_kind(name).into());
        self.nodes += 1;
        Entered::Descend(true)
    }

    fn token(&mut self, kind: SyntaxKind, end: usize) {
        self.builder.token(kind.into(), &self.source[self.pos..end]);
        self.pos = end;
    }

    /// Emits the source between the last emitted byte and `until` as trivia.
    fn flush(&mut self, until: usize) {
        while self.pos < until {
            if let Some(&(start, end, kind)) = self.extras.front() {
                if end <= self.pos {
                    self.extras.pop_front();
                    continue;
                }
                if start <= self.pos {
                    self.extras.pop_front();
                    self.token(kind, end.min(until));
                    continue;
                }
            }
            let limit = self
                .extras
                .front()
                .map_or(until, |&(start, _, _)| start.min(until));
            self.gap(limit);
        }
    }

    /// Splits plain gap text into whitespace and anything else.
    fn gap(&mut self, until: usize) {
        while self.pos < until {
            let rest = &self.source[self.pos..until];
            let blank = rest.starts_with(is_blank);
            let len = rest
                .find(|c: char| is_blank(c) != blank)
                .unwrap_or(rest.len());
            let kind = if blank {
                SyntaxKind::Whitespace
            } else {
                SyntaxKind::Text
            };
            self.token(kind, self.pos + len);
        }
    }

    fn finish(mut self) -> (GreenNode, usize) {
        self.flush(self.source.len());
        self.builder.finish_node();
        (self.builder.finish(), self.nodes)
    }
}
