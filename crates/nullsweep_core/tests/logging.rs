//! Log output of the analysis and fix pipeline.

use std::sync::{Arc, Mutex};

use nullsweep_core::{
    AnalysisDriver, AnalyzerConfig, CancellationToken, CodeFixProvider, Document,
    MakeNullableCodeFix,
};
use nullsweep_parser::CSharpParser;
use tracing_subscriber::prelude::*;

struct LogCounter {
    needle: &'static str,
    count: Arc<Mutex<usize>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if visitor.0.contains(self.needle) {
            *self.count.lock().unwrap() += 1;
        }
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            use std::fmt::Write;
            let _ = write!(self.0, "{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }
}

fn count_events(needle: &'static str, run: impl FnOnce()) -> usize {
    let count = Arc::new(Mutex::new(0));
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("trace"))
        .with(LogCounter {
            needle,
            count: count.clone(),
        });
    tracing::subscriber::with_default(subscriber, run);
    *count.lock().unwrap()
}

fn parse(source: &str) -> Document {
    Document::parse(&CSharpParser::new(), source).unwrap()
}

#[test]
fn test_generated_documents_are_logged() {
    let driver = AnalysisDriver::with_builtin_rules(AnalyzerConfig::new()).unwrap();
    let documents = vec![
        parse("string a = x!;").with_path("Api.g.cs"),
        parse("string b = y!;").with_path("Program.cs"),
    ];

    // The subscriber is thread-local, so analyze on this thread
    let skipped = count_events("Skipping generated document", || {
        let results: Vec<_> = documents.iter().map(|d| driver.analyze(d)).collect();
        assert!(results[0].is_empty());
        assert_eq!(results[1].len(), 1);
    });
    assert_eq!(skipped, 1);

    let summaries = count_events("Analyzed 2 documents", || {
        driver.analyze_documents(&documents);
    });
    assert_eq!(summaries, 1);
}

#[test]
fn test_fix_is_logged() {
    let document = parse("string a = x!;\nstring b = y!;\n");
    let driver = AnalysisDriver::with_builtin_rules(AnalyzerConfig::new()).unwrap();

    let fixes = count_events("Made variable nullable", || {
        let diagnostic = driver.analyze(&document).remove(0);
        let fix = MakeNullableCodeFix::new();
        let action = fix.register_code_fixes(&document, &diagnostic).remove(0);
        fix.apply(&document, &action, &CancellationToken::new()).unwrap();
    });
    assert_eq!(fixes, 1);
}
