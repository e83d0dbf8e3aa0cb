//! Built-in rules and their code fixes.

mod make_nullable;
mod null_forgiving;

use std::sync::Arc;

use crate::analyzer::Analyzer;

pub use make_nullable::{MakeNullableCodeFix, find_declaration, make_nullable};
pub use null_forgiving::{NULL_FORGIVING, NullForgivingAnalyzer};

/// Every built-in analyzer.
pub fn builtin_analyzers() -> Vec<Arc<dyn Analyzer>> {
    vec![Arc::new(NullForgivingAnalyzer::new())]
}
