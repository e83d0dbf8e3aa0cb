//! The "Make variable nullable" fix.
//!
//! Applying the fix widens the declared type of the variable whose
//! declaration contains the diagnostic, then removes the `!` from every
//! null-forgiving expression in the document.

use nullsweep_ast::nodes::{PostfixUnaryExpression, VariableDeclaration};
use nullsweep_ast::{
    Annotations, AstNode, EditError, GreenNode, NodeId, NodeOrToken, SyntaxEditor, SyntaxKind,
    SyntaxTree, factory,
};
use tracing::debug;

use crate::code_fix::{CodeAction, CodeFixProvider, FixAllProvider};
use crate::postprocess::Pipeline;
use crate::rules::NULL_FORGIVING;
use crate::{CancellationToken, Diagnostic, Document, FixError};

const TITLE: &str = "Make variable nullable";
const EQUIVALENCE_KEY: &str = TITLE;
const FIXABLE_IDS: &[&str] = &[NULL_FORGIVING.id];

const REWRITTEN: Annotations = Annotations::SIMPLIFY.union(Annotations::FORMAT);

/// Finds the innermost variable declaration containing `offset`.
///
/// The token containing `offset` is located first, then its ancestors are
/// searched innermost-first.
pub fn find_declaration(tree: &SyntaxTree, offset: u32) -> Option<NodeId> {
    tree.find_token(offset)?
        .parent_ancestors()
        .find(|node| node.kind() == SyntaxKind::VariableDeclaration)
        .map(|node| tree.node_id(&node))
}

/// Rewrites `document`: widens the type of `declaration` to its nullable
/// form, then removes the `!` from every null-forgiving expression.
///
/// `declaration` must come from `document`'s tree. Without a declaration
/// only the markers are removed. `var` declarations keep their type. The
/// rewritten nodes are annotated for simplification and formatting.
pub fn make_nullable(
    document: &Document,
    declaration: Option<NodeId>,
    cancellation: &CancellationToken,
) -> Result<Document, FixError> {
    rewrite(document, declaration, cancellation, || {})
}

/// [`make_nullable`], running `after_widening` between the two edits.
fn rewrite(
    document: &Document,
    declaration: Option<NodeId>,
    cancellation: &CancellationToken,
    after_widening: impl FnOnce(),
) -> Result<Document, FixError> {
    cancellation.check()?;

    let mut editor = SyntaxEditor::new(document.tree().clone());
    let widened = match declaration {
        Some(id) => widen_declared_type(&mut editor, document.tree(), id)?,
        None => false,
    };

    after_widening();
    cancellation.check()?;

    // Query the session's tree, which already contains the widened type
    let tree = editor.tree();
    let suppressions: Vec<NodeId> = tree
        .descendants()
        .filter_map(PostfixUnaryExpression::cast)
        .filter(|expression| expression.is_null_forgiving())
        .map(|expression| tree.node_id(expression.syntax()))
        .collect();
    for id in &suppressions {
        editor.replace_node_annotated(*id, REWRITTEN, remove_marker)?;
    }
    let tree = editor.into_tree();

    cancellation.check()?;

    debug!(
        widened,
        removed = suppressions.len(),
        "Made variable nullable"
    );
    Ok(document.with_tree(tree))
}

/// Records the `T` to `T?` edit. Returns false when the type is inferred.
fn widen_declared_type(
    editor: &mut SyntaxEditor,
    tree: &SyntaxTree,
    id: NodeId,
) -> Result<bool, EditError> {
    let node = tree.node(id).ok_or(EditError::StaleNode {
        expected: tree.id(),
        found: id.tree(),
    })?;
    let kind = node.kind();
    let declaration = VariableDeclaration::cast(node)
        .ok_or_else(|| EditError::missing_child(kind, "variable declaration"))?;
    if declaration.is_implicitly_typed() {
        return Ok(false);
    }
    let ty = declaration
        .ty()
        .ok_or_else(|| EditError::missing_child(SyntaxKind::VariableDeclaration, "declared type"))?;

    editor.replace_node_annotated(tree.node_id(&ty), REWRITTEN, factory::nullable_type)?;
    Ok(true)
}

/// Replaces `operand!` with `operand`.
///
/// Trivia between the operand and the removed `!` is kept at the end of the
/// operand so comments and line breaks survive.
fn remove_marker(suppression: GreenNode) -> GreenNode {
    let mut children = factory::children(&suppression).into_iter();
    let Some(NodeOrToken::Node(operand)) = children.next() else {
        return suppression;
    };
    let trivia: Vec<_> = children
        .filter(|child| {
            child
                .as_token()
                .is_some_and(|token| SyntaxKind::from(token.kind()).is_trivia())
        })
        .collect();
    if trivia.is_empty() {
        return operand;
    }
    let mut rebuilt = factory::children(&operand);
    rebuilt.extend(trivia);
    factory::node(factory::kind(&operand), rebuilt)
}

/// Offers [`make_nullable`] for every null-forgiving diagnostic.
pub struct MakeNullableCodeFix {
    pipeline: Pipeline,
}

impl MakeNullableCodeFix {
    /// Creates the fix with the default post-processing pipeline.
    pub fn new() -> Self {
        Self::with_pipeline(Pipeline::default())
    }

    /// Creates the fix with a custom post-processing pipeline.
    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }
}

impl Default for MakeNullableCodeFix {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeFixProvider for MakeNullableCodeFix {
    fn fixable_diagnostic_ids(&self) -> &[&'static str] {
        FIXABLE_IDS
    }

    fn register_code_fixes(&self, _document: &Document, diagnostic: &Diagnostic) -> Vec<CodeAction> {
        if !self.can_fix(diagnostic) {
            return Vec::new();
        }
        vec![CodeAction::new(TITLE, EQUIVALENCE_KEY, diagnostic.clone())]
    }

    fn apply(
        &self,
        document: &Document,
        action: &CodeAction,
        cancellation: &CancellationToken,
    ) -> Result<Document, FixError> {
        if action.equivalence_key != EQUIVALENCE_KEY {
            return Err(FixError::unsupported_action(&action.equivalence_key));
        }

        let declaration = find_declaration(document.tree(), action.diagnostic.span.start);
        let rewritten = make_nullable(document, declaration, cancellation)?;
        let tree = self.pipeline.run(rewritten.tree().clone())?;

        cancellation.check()?;
        Ok(rewritten.with_tree(tree))
    }

    fn fix_all_provider(&self) -> FixAllProvider {
        FixAllProvider::Batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::NullForgivingAnalyzer;
    use nullsweep_parser::CSharpParser;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(source: &str) -> Document {
        Document::parse(&CSharpParser::new(), source).unwrap()
    }

    fn diagnostics(document: &Document) -> Vec<Diagnostic> {
        let analyzer = NullForgivingAnalyzer::new();
        document
            .tree()
            .descendants()
            .filter_map(|node| analyzer.analyze(&node))
            .collect()
    }

    fn fix_first(source: &str) -> String {
        let document = parse(source);
        let diagnostic = diagnostics(&document).remove(0);
        let fix = MakeNullableCodeFix::new();
        let action = fix.register_code_fixes(&document, &diagnostic).remove(0);
        fix.apply(&document, &action, &CancellationToken::new())
            .unwrap()
            .text()
    }

    #[rstest]
    #[case::local("string text = null!;", "string? text = null;")]
    #[case::already_nullable("string? s = x!;", "string? s = x;")]
    #[case::implicitly_typed("var s = x!;", "var s = x;")]
    #[case::no_declaration("return value!;", "return value;")]
    #[case::generic("List<string> items = Load()!;", "List<string>? items = Load();")]
    #[case::qualified("System.String s = x!;", "System.String? s = x;")]
    #[case::nested("string s = (x!)!;", "string? s = (x);")]
    #[case::member_chain("int n = user!.Name!.Length;", "int? n = user.Name.Length;")]
    #[case::spaced_marker("Use(value !);", "Use(value);")]
    #[case::comment_after_marker("string s = x! /* checked */;", "string? s = x /* checked */;")]
    #[case::comment_before_marker("string s = x /* checked */ !;", "string? s = x /* checked */;")]
    #[case::cast("string s = (string)o!;", "string? s = (string)o;")]
    #[case::generic_invocation("string s = M<int>()!;", "string? s = M<int>();")]
    #[case::interpolation("string s = $\"{x!}\";", "string? s = $\"{x}\";")]
    #[case::lambda_in_declaration("Func<string> f = () => x!;", "Func<string>? f = () => x;")]
    fn test_fix(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(fix_first(source), expected);
    }

    #[test]
    fn test_find_declaration() {
        let document = parse("string s = x!;\nreturn y!;\n");
        let found: Vec<_> = diagnostics(&document)
            .iter()
            .map(|d| find_declaration(document.tree(), d.span.start))
            .collect();

        let declaration = found[0].and_then(|id| document.tree().node(id)).unwrap();
        assert_eq!(declaration.kind(), SyntaxKind::VariableDeclaration);
        assert_eq!(declaration.text(), "string s = x!");
        assert_eq!(found[1], None);
    }

    #[test]
    fn test_field_declaration_is_found() {
        let document = parse("class C\n{\n    string _name = Find()!, _alias = \"a\";\n}\n");
        let diagnostic = diagnostics(&document).remove(0);
        let id = find_declaration(document.tree(), diagnostic.span.start).unwrap();
        let declaration = document.tree().node(id).unwrap();
        assert_eq!(declaration.text(), "string _name = Find()!, _alias = \"a\"");
    }

    #[test]
    fn test_rewrite_without_post_processing() {
        let document = parse("string text = null!;");
        let id = find_declaration(document.tree(), 14);
        let fixed = make_nullable(&document, id, &CancellationToken::new()).unwrap();
        assert_eq!(fixed.text(), "string? text = null;");

        let widened = fixed
            .tree()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::NullableType)
            .unwrap();
        assert!(fixed.tree().annotations(&widened).contains(REWRITTEN));

        let marked: Vec<_> = fixed
            .tree()
            .marked()
            .into_iter()
            .map(|(node, _)| node.text().to_string())
            .collect();
        assert_eq!(marked, vec!["string?", "null"]);
    }

    #[test]
    fn test_custom_pipeline() {
        let fix = MakeNullableCodeFix::with_pipeline(Pipeline::empty());
        let document = parse("string text = null!;");
        let diagnostic = diagnostics(&document).remove(0);
        let action = fix.register_code_fixes(&document, &diagnostic).remove(0);
        let fixed = fix.apply(&document, &action, &CancellationToken::new()).unwrap();
        assert_eq!(fixed.text(), "string? text = null;");
    }

    #[test]
    fn test_sweep_removes_unrelated_markers() {
        let source = "string a = x!;\nstring b = y!;\n";
        let document = parse(source);
        let second = diagnostics(&document).remove(1);
        let fix = MakeNullableCodeFix::new();
        let action = fix.register_code_fixes(&document, &second).remove(0);
        let fixed = fix.apply(&document, &action, &CancellationToken::new()).unwrap();

        // Only the flagged declaration is widened
        assert_eq!(fixed.text(), "string a = x;\nstring? b = y;\n");
    }

    #[test]
    fn test_registration() {
        let document = parse("string text = null!;");
        let diagnostic = diagnostics(&document).remove(0);
        let fix = MakeNullableCodeFix::new();

        let actions = fix.register_code_fixes(&document, &diagnostic);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Make variable nullable");
        assert_eq!(actions[0].equivalence_key, "Make variable nullable");
        assert_eq!(fix.fix_all_provider(), FixAllProvider::Batch);
        assert_eq!(fix.fixable_diagnostic_ids(), &["TZ001"]);

        let other = Diagnostic::new("TZ999", "Other", diagnostic.span);
        assert!(fix.register_code_fixes(&document, &other).is_empty());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let document = parse("string text = null!;");
        let diagnostic = diagnostics(&document).remove(0);
        let action = CodeAction::new("Other", "Other", diagnostic);

        let err = MakeNullableCodeFix::new()
            .apply(&document, &action, &CancellationToken::new())
            .unwrap_err();
        assert_eq!(err, FixError::unsupported_action("Other"));
    }

    #[test]
    fn test_cancelled_fix_returns_no_document() {
        let document = parse("string text = null!;");
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        let id = find_declaration(document.tree(), 14);
        let err = make_nullable(&document, id, &cancellation).unwrap_err();
        assert_eq!(err, FixError::Cancelled);
    }

    #[test]
    fn test_cancelled_between_widening_and_sweep() {
        let document = parse("string text = null!;\nUse(other!);\n");
        let cancellation = CancellationToken::new();
        let id = find_declaration(document.tree(), 14);
        let mut widened = false;

        let result = rewrite(&document, id, &cancellation, || {
            widened = true;
            cancellation.cancel();
        });

        assert!(widened);
        assert_eq!(result.unwrap_err(), FixError::Cancelled);
        assert_eq!(document.text(), "string text = null!;\nUse(other!);\n");
    }

    #[test]
    fn test_stale_declaration_is_rejected() {
        let old = parse("string text = null!;");
        let stale = find_declaration(old.tree(), 14);
        let current = parse("string text = null!;");

        let err = make_nullable(&current, stale, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, FixError::Edit(EditError::StaleNode { .. })));
    }

    #[test]
    fn test_non_declaration_node_is_rejected() {
        let document = parse("string text = null!;");
        let tree = document.tree();
        let statement = tree.node_id(&tree.root().first_child().unwrap());

        let err = make_nullable(&document, Some(statement), &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, FixError::Edit(EditError::MissingChild { .. })));
    }
}
