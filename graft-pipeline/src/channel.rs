//! Diagnostic collection with suppression.

use serde::Serialize;

use crate::{Diagnostic, DiagnosticSink, Severity};

/// A suppression predicate; returning `true` hides the diagnostic.
pub type SuppressionPredicate = Box<dyn Fn(&Diagnostic) -> bool>;

/// A diagnostic as it was reported, with its suppression verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub diagnostic: Diagnostic,
    pub suppressed: bool,
}

/// Collects diagnostics for one run.
///
/// Suppression predicates accumulate and are applied when the channel is
/// drained, so a predicate registered late still hides diagnostics reported
/// before it. Every diagnostic, suppressed or not, ends up in the audit log.
#[derive(Default)]
pub struct DiagnosticChannel {
    pending: Vec<Diagnostic>,
    predicates: Vec<SuppressionPredicate>,
    audit: Vec<AuditEntry>,
}

impl DiagnosticChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "reported");
        self.pending.push(diagnostic);
    }

    /// Register a suppression predicate.
    pub fn suppress(&mut self, predicate: impl Fn(&Diagnostic) -> bool + 'static) {
        self.push_predicate(Box::new(predicate));
    }

    pub(crate) fn push_predicate(&mut self, predicate: SuppressionPredicate) {
        self.predicates.push(predicate);
    }

    /// Returns true if any registered predicate matches.
    pub fn is_suppressed(&self, diagnostic: &Diagnostic) -> bool {
        self.predicates.iter().any(|p| p(diagnostic))
    }

    /// Diagnostics reported since the last drain, in report order.
    pub fn pending(&self) -> &[Diagnostic] {
        &self.pending
    }

    /// Returns true if a pending diagnostic would surface as an error.
    pub fn has_errors(&self) -> bool {
        self.has_unsuppressed(Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.has_unsuppressed(Severity::Warning)
    }

    fn has_unsuppressed(&self, severity: Severity) -> bool {
        self.pending
            .iter()
            .any(|d| d.severity == severity && !self.is_suppressed(d))
    }

    /// Move every pending diagnostic into the audit log and return the
    /// unsuppressed ones, most severe first.
    ///
    /// Diagnostics of equal severity keep their report order.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        let mut surfaced = Vec::new();
        for diagnostic in std::mem::take(&mut self.pending) {
            let suppressed = self.is_suppressed(&diagnostic);
            if !suppressed {
                surfaced.push(diagnostic.clone());
            }
            self.audit.push(AuditEntry {
                diagnostic,
                suppressed,
            });
        }
        // `sort_by_key` is stable.
        surfaced.sort_by_key(|d| std::cmp::Reverse(d.severity.rank()));
        surfaced
    }

    /// Everything drained so far.
    pub fn audit(&self) -> &[AuditEntry] {
        &self.audit
    }

    pub fn into_audit(self) -> Vec<AuditEntry> {
        self.audit
    }
}

impl DiagnosticSink for DiagnosticChannel {
    fn report(&mut self, diagnostic: Diagnostic) {
        DiagnosticChannel::report(self, diagnostic);
    }
}

impl std::fmt::Debug for DiagnosticChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticChannel")
            .field("pending", &self.pending)
            .field("predicates", &self.predicates.len())
            .field("audit", &self.audit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_drain_orders_by_severity_then_report_order() {
        let mut channel = DiagnosticChannel::new();
        channel.report(Diagnostic::info("i1"));
        channel.report(Diagnostic::warning("w1"));
        channel.report(Diagnostic::error("e1"));
        channel.report(Diagnostic::warning("w2"));
        channel.report(Diagnostic::error("e2"));

        let drained = channel.drain();
        assert_eq!(messages(&drained), vec!["e1", "e2", "w1", "w2", "i1"]);
        assert!(channel.pending().is_empty());
        assert_eq!(channel.audit().len(), 5);
    }

    #[test]
    fn test_late_predicate_suppresses_earlier_reports() {
        let mut channel = DiagnosticChannel::new();
        channel.report(Diagnostic::error("noisy"));
        channel.report(Diagnostic::warning("kept"));
        assert!(channel.has_errors());

        channel.suppress(|d| d.message == "noisy");
        assert!(!channel.has_errors());
        assert!(channel.has_warnings());

        let drained = channel.drain();
        assert_eq!(messages(&drained), vec!["kept"]);

        let suppressed: Vec<&str> = channel
            .audit()
            .iter()
            .filter(|e| e.suppressed)
            .map(|e| e.diagnostic.message.as_str())
            .collect();
        assert_eq!(suppressed, vec!["noisy"]);
    }

    #[test]
    fn test_any_predicate_match_suppresses() {
        let mut channel = DiagnosticChannel::new();
        channel.suppress(|d| d.message.starts_with('a'));
        channel.suppress(|d| d.message.starts_with('b'));
        channel.report(Diagnostic::info("alpha"));
        channel.report(Diagnostic::info("beta"));
        channel.report(Diagnostic::info("gamma"));

        assert_eq!(messages(&channel.drain()), vec!["gamma"]);
    }
}
