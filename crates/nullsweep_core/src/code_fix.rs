//! Code fix surface.

use crate::{CancellationToken, Diagnostic, Document, FixError};

/// A fix offered for one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAction {
    /// Title shown to the user.
    pub title: String,
    /// Key grouping equivalent actions for fix-all.
    pub equivalence_key: String,
    /// The diagnostic the action was registered for.
    pub diagnostic: Diagnostic,
}

impl CodeAction {
    pub fn new(
        title: impl Into<String>,
        equivalence_key: impl Into<String>,
        diagnostic: Diagnostic,
    ) -> Self {
        Self {
            title: title.into(),
            equivalence_key: equivalence_key.into(),
            diagnostic,
        }
    }
}

/// How a provider fixes every occurrence at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FixAllProvider {
    /// Actions with the same equivalence key are applied as one batch.
    Batch,
    /// Fix-all is not offered.
    #[default]
    None,
}

/// Offers and applies fixes for diagnostics of specific rules.
pub trait CodeFixProvider: Send + Sync {
    /// Rule ids this provider can fix.
    fn fixable_diagnostic_ids(&self) -> &[&'static str];

    /// Actions available for `diagnostic` in `document`.
    fn register_code_fixes(&self, document: &Document, diagnostic: &Diagnostic) -> Vec<CodeAction>;

    /// Applies `action`, returning the edited document.
    fn apply(
        &self,
        document: &Document,
        action: &CodeAction,
        cancellation: &CancellationToken,
    ) -> Result<Document, FixError>;

    fn fix_all_provider(&self) -> FixAllProvider {
        FixAllProvider::None
    }

    /// Returns true if this provider handles `diagnostic`.
    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        self.fixable_diagnostic_ids()
            .contains(&diagnostic.rule_id.as_str())
    }
}
