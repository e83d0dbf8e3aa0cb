//! # nullsweep_core
//!
//! Null-forgiving operator analysis for C# sources.
//!
//! This crate provides:
//! - The `TZ001` analyzer, which reports every postfix `!`
//! - The "Make variable nullable" code fix
//! - An analysis driver that dispatches nodes to analyzers by kind
//! - Configuration loading
//! - Post-processing of fixed trees and a fix loop
//!
//! ## Example
//!
//! ```rust
//! use nullsweep_core::{
//!     AnalysisDriver, AnalyzerConfig, CancellationToken, CodeFixProvider, Document,
//!     MakeNullableCodeFix,
//! };
//! use nullsweep_parser::CSharpParser;
//!
//! let document = Document::parse(&CSharpParser::new(), "string text = null!;").unwrap();
//! let driver = AnalysisDriver::with_builtin_rules(AnalyzerConfig::default()).unwrap();
//!
//! let diagnostics = driver.analyze(&document);
//! assert_eq!(diagnostics[0].rule_id, "TZ001");
//!
//! let fix = MakeNullableCodeFix::new();
//! let action = fix.register_code_fixes(&document, &diagnostics[0]).remove(0);
//! let fixed = fix.apply(&document, &action, &CancellationToken::new()).unwrap();
//! assert_eq!(fixed.text(), "string? text = null;");
//! ```

pub mod analyzer;
mod cancellation;
pub mod code_fix;
mod config;
mod diagnostic;
mod document;
mod driver;
mod error;
mod fix;
pub mod postprocess;
pub mod rules;

pub use analyzer::{Analyzer, NodeContext};
pub use cancellation::CancellationToken;
pub use code_fix::{CodeAction, CodeFixProvider, FixAllProvider};
pub use config::{AnalyzerConfig, CONFIG_FILE_NAMES, RuleLevel, RuleSetting};
pub use diagnostic::{Diagnostic, DiagnosticDescriptor, Severity};
pub use document::Document;
pub use driver::AnalysisDriver;
pub use error::{CoreError, FixError};
pub use fix::{FixCoordinator, FixOutcome};
pub use rules::{MakeNullableCodeFix, NullForgivingAnalyzer};
