//! Analysis driver.
//!
//! The driver owns the registered analyzers and dispatches every node of a
//! document to the analyzers registered for its kind. Configuration decides
//! which rules are reported and at which severity.

use std::collections::HashMap;
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use nullsweep_ast::visitor::{VisitResult, Visitor, walk_node};
use nullsweep_ast::{LineIndex, SyntaxKind, SyntaxNode};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::analyzer::{Analyzer, NodeContext};
use crate::{AnalyzerConfig, CoreError, Diagnostic, DiagnosticDescriptor, Document};

/// Header markers identifying generated sources.
const GENERATED_MARKERS: &[&str] = &["<auto-generated", "<autogenerated"];

/// Runs analyzers over documents.
pub struct AnalysisDriver {
    analyzers: Vec<Arc<dyn Analyzer>>,
    registrations: HashMap<SyntaxKind, Vec<usize>>,
    descriptors: HashMap<&'static str, DiagnosticDescriptor>,
    config: AnalyzerConfig,
    generated: GlobSet,
}

impl AnalysisDriver {
    /// Creates a driver without analyzers.
    pub fn new(config: AnalyzerConfig) -> Result<Self, CoreError> {
        let generated = Self::build_globset(&config.generated_code_patterns)?;
        Ok(Self {
            analyzers: Vec::new(),
            registrations: HashMap::new(),
            descriptors: HashMap::new(),
            config,
            generated,
        })
    }

    /// Creates a driver with every built-in analyzer registered.
    pub fn with_builtin_rules(config: AnalyzerConfig) -> Result<Self, CoreError> {
        let mut driver = Self::new(config)?;
        for analyzer in crate::rules::builtin_analyzers() {
            driver.register(analyzer);
        }
        Ok(driver)
    }

    fn build_globset(patterns: &[String]) -> Result<GlobSet, CoreError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                CoreError::config(format!("Invalid generated code pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| CoreError::config(format!("Failed to build globset: {}", e)))
    }

    /// Registers an analyzer for the node kinds it declares.
    pub fn register(&mut self, analyzer: Arc<dyn Analyzer>) {
        let index = self.analyzers.len();
        for kind in analyzer.node_kinds() {
            self.registrations.entry(*kind).or_default().push(index);
        }
        for descriptor in analyzer.supported_diagnostics() {
            self.descriptors.insert(descriptor.id, *descriptor);
        }
        self.analyzers.push(analyzer);
    }

    /// Builder form of [`AnalysisDriver::register`].
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.register(analyzer);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Descriptor of a registered rule.
    pub fn descriptor(&self, rule_id: &str) -> Option<&DiagnosticDescriptor> {
        self.descriptors.get(rule_id)
    }

    /// Returns true if the document is generated code, by path or by header
    /// comment.
    pub fn is_generated(&self, document: &Document) -> bool {
        if document.path().is_some_and(|path| self.generated.is_match(path)) {
            return true;
        }
        document
            .tree()
            .tokens()
            .take_while(|token| token.kind().is_trivia())
            .filter(|token| token.kind() == SyntaxKind::Comment)
            .any(|token| GENERATED_MARKERS.iter().any(|marker| token.text().contains(marker)))
    }

    /// Analyzes one document.
    ///
    /// Diagnostics are sorted by span. Generated documents produce no
    /// diagnostics unless the configuration asks for them.
    pub fn analyze(&self, document: &Document) -> Vec<Diagnostic> {
        if !self.config.analyze_generated_code && self.is_generated(document) {
            debug!(
                path = ?document.path(),
                "Skipping generated document"
            );
            return Vec::new();
        }

        let tree = document.tree();
        let mut dispatcher = Dispatcher {
            driver: self,
            reported: Vec::new(),
        };
        // The dispatcher visits every node and never breaks
        if walk_node(&mut dispatcher, &tree.root()).is_break() {
            debug!(path = ?document.path(), "Node dispatch stopped early");
        }

        let line_index = LineIndex::new(&tree.text());
        let mut diagnostics: Vec<Diagnostic> = dispatcher
            .reported
            .into_iter()
            .filter_map(|diagnostic| self.configure(diagnostic))
            .map(|diagnostic| {
                let loc = line_index.location(diagnostic.span);
                diagnostic.with_location(loc)
            })
            .collect();
        diagnostics.sort_by(|a, b| a.span.cmp(&b.span).then_with(|| a.rule_id.cmp(&b.rule_id)));

        debug!(
            path = ?document.path(),
            diagnostics = diagnostics.len(),
            "Analyzed document"
        );
        diagnostics
    }

    /// Analyzes documents in parallel. Results are in input order.
    pub fn analyze_documents(&self, documents: &[Document]) -> Vec<Vec<Diagnostic>> {
        let results: Vec<Vec<Diagnostic>> =
            documents.par_iter().map(|document| self.analyze(document)).collect();

        let total: usize = results.iter().map(Vec::len).sum();
        info!("Analyzed {} documents, {} diagnostics", documents.len(), total);
        results
    }

    /// Applies the configured enablement and severity of the diagnostic's
    /// rule.
    fn configure(&self, diagnostic: Diagnostic) -> Option<Diagnostic> {
        let enabled_by_default = self
            .descriptors
            .get(diagnostic.rule_id.as_str())
            .is_none_or(|descriptor| descriptor.enabled_by_default);
        if !self.config.is_rule_enabled(&diagnostic.rule_id, enabled_by_default) {
            return None;
        }
        let severity = self
            .config
            .rule_severity(&diagnostic.rule_id, diagnostic.severity)?;
        Some(diagnostic.with_severity(severity))
    }

    fn analyze_node(&self, node: &SyntaxNode, reported: &mut Vec<Diagnostic>) {
        let Some(indices) = self.registrations.get(&node.kind()) else {
            return;
        };
        for &index in indices {
            let mut ctx = NodeContext::new(node.clone());
            self.analyzers[index].analyze_node(&mut ctx);
            reported.extend(ctx.into_diagnostics());
        }
    }
}

struct Dispatcher<'d> {
    driver: &'d AnalysisDriver,
    reported: Vec<Diagnostic>,
}

impl Visitor for Dispatcher<'_> {
    fn enter_node(&mut self, node: &SyntaxNode) -> VisitResult {
        self.driver.analyze_node(node, &mut self.reported);
        VisitResult::Continue(())
    }
}
