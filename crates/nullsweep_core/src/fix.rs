//! Repeated fixing until a document stops changing.

use blake3::Hash;
use tracing::{debug, warn};

use crate::code_fix::CodeFixProvider;
use crate::{AnalysisDriver, CancellationToken, Diagnostic, Document, FixError};

/// How a fix loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// No fixable diagnostics remain.
    Converged { iterations: usize },
    /// The iteration limit was hit with fixable diagnostics left.
    MaxIterationsReached { remaining: usize },
    /// A fix reproduced an earlier version of the document.
    CycleDetected { cycle_length: usize },
}

/// Applies one provider's fixes to a document until nothing is left to fix.
pub struct FixCoordinator {
    max_iterations: usize,
}

impl FixCoordinator {
    pub fn new() -> Self {
        Self { max_iterations: 3 }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Analyzes `document` and applies the first offered action, repeatedly,
    /// until no diagnostic the provider can fix remains.
    ///
    /// Every intermediate document is hashed; producing a text seen before
    /// stops the loop.
    pub fn fix_document(
        &self,
        document: &Document,
        driver: &AnalysisDriver,
        provider: &dyn CodeFixProvider,
        cancellation: &CancellationToken,
    ) -> Result<(Document, FixOutcome), FixError> {
        let mut current = document.clone();
        let mut history: Vec<Hash> = vec![current.hash()];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            cancellation.check()?;

            let fixable = fixable_diagnostics(&current, driver, provider);
            let Some(action) = fixable
                .iter()
                .find_map(|diagnostic| provider.register_code_fixes(&current, diagnostic).into_iter().next())
            else {
                debug!(iterations, "Fixes converged");
                return Ok((current, FixOutcome::Converged { iterations }));
            };

            current = provider.apply(&current, &action, cancellation)?;
            let current_hash = current.hash();

            if let Some(prev_idx) = history.iter().position(|h| *h == current_hash) {
                let cycle_length = history.len() - prev_idx;
                warn!(cycle_length, "Fix cycle detected");
                return Ok((current, FixOutcome::CycleDetected { cycle_length }));
            }
            history.push(current_hash);
        }

        let remaining = fixable_diagnostics(&current, driver, provider).len();
        if remaining == 0 {
            return Ok((current, FixOutcome::Converged { iterations }));
        }
        warn!(
            max_iterations = self.max_iterations,
            remaining, "Fixes did not converge"
        );
        Ok((current, FixOutcome::MaxIterationsReached { remaining }))
    }
}

impl Default for FixCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

fn fixable_diagnostics(
    document: &Document,
    driver: &AnalysisDriver,
    provider: &dyn CodeFixProvider,
) -> Vec<Diagnostic> {
    driver
        .analyze(document)
        .into_iter()
        .filter(|diagnostic| provider.can_fix(diagnostic))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_fix::CodeAction;
    use crate::rules::MakeNullableCodeFix;
    use crate::AnalyzerConfig;
    use nullsweep_parser::{CSharpParser, Parser};
    use pretty_assertions::assert_eq;

    fn driver() -> AnalysisDriver {
        AnalysisDriver::with_builtin_rules(AnalyzerConfig::new()).unwrap()
    }

    fn parse(source: &str) -> Document {
        Document::parse(&CSharpParser::new(), source).unwrap()
    }

    /// Swaps between two texts forever.
    struct Flip;

    impl CodeFixProvider for Flip {
        fn fixable_diagnostic_ids(&self) -> &[&'static str] {
            &["TZ001"]
        }

        fn register_code_fixes(&self, _document: &Document, diagnostic: &Diagnostic) -> Vec<CodeAction> {
            vec![CodeAction::new("Flip", "Flip", diagnostic.clone())]
        }

        fn apply(
            &self,
            document: &Document,
            _action: &CodeAction,
            _cancellation: &CancellationToken,
        ) -> Result<Document, FixError> {
            let next = if document.text().contains('a') { "b!;" } else { "a!;" };
            Ok(document.with_tree(CSharpParser::new().parse(next).unwrap()))
        }
    }

    #[test]
    fn test_convergence() {
        let document = parse("string a = x!;\nstring b = y!;\nreturn a!;\n");
        let (fixed, outcome) = FixCoordinator::new()
            .fix_document(&document, &driver(), &MakeNullableCodeFix::new(), &CancellationToken::new())
            .unwrap();

        assert_eq!(fixed.text(), "string? a = x;\nstring b = y;\nreturn a;\n");
        assert_eq!(outcome, FixOutcome::Converged { iterations: 2 });
    }

    #[test]
    fn test_nothing_to_fix() {
        let document = parse("int i = 0;\ni++;\n");
        let (fixed, outcome) = FixCoordinator::new()
            .fix_document(&document, &driver(), &MakeNullableCodeFix::new(), &CancellationToken::new())
            .unwrap();

        assert_eq!(fixed.text(), document.text());
        assert_eq!(outcome, FixOutcome::Converged { iterations: 1 });
    }

    #[test]
    fn test_cycle_detection() {
        let document = parse("a!;");
        let (_, outcome) = FixCoordinator::new()
            .with_max_iterations(5)
            .fix_document(&document, &driver(), &Flip, &CancellationToken::new())
            .unwrap();

        assert_eq!(outcome, FixOutcome::CycleDetected { cycle_length: 2 });
    }

    #[test]
    fn test_max_iterations() {
        let document = parse("a!;");
        let (_, outcome) = FixCoordinator::new()
            .with_max_iterations(1)
            .fix_document(&document, &driver(), &Flip, &CancellationToken::new())
            .unwrap();

        assert_eq!(outcome, FixOutcome::MaxIterationsReached { remaining: 1 });
    }

    #[test]
    fn test_cancelled() {
        let cancellation = CancellationToken::new();
        cancellation.cancel();
        let err = FixCoordinator::new()
            .fix_document(&parse("a!;"), &driver(), &MakeNullableCodeFix::new(), &cancellation)
            .unwrap_err();
        assert_eq!(err, FixError::Cancelled);
    }
}
