//! Diagnostic types for the edit pipeline.
//!
//! This module provides types for collecting errors, warnings, and informational
//! messages produced by editors, rewriters and compile-time invocations.

use graft_syntax::{Location, SymbolId};
use serde::Serialize;

use crate::Phase;

/// Stable diagnostic codes reported by the pipeline itself.
pub mod codes {
    /// A required feature is offered by neither the host nor another editor.
    pub const UNRESOLVED_DEPENDENCY: &str = "GR0001";
    /// An editor registration is malformed (empty name, failed initialization,
    /// extension point misuse, late edit registration).
    pub const MALFORMED_REGISTRATION: &str = "GR0002";
    /// An editor was declared twice; the later declaration is ignored.
    pub const DUPLICATE_EDITOR: &str = "GR0003";
    /// An edit failed; its result was discarded.
    pub const EDIT_FAILURE: &str = "GR0010";
    /// A compile-time routine failed while running.
    pub const INVOCATION_FAILURE: &str = "GR0020";
    /// A compile-time target is not a static, concrete method.
    pub const INVALID_TARGET: &str = "GR0021";
    /// A compile-time target returns a value that nothing can observe.
    pub const DISCARDED_RETURN: &str = "GR0022";
    /// No native routine is bound to a compile-time target.
    pub const MISSING_NATIVE: &str = "GR0023";
}

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// An error; any unsuppressed error fails the run.
    Error,
    /// A warning that doesn't prevent processing but should be addressed.
    Warning,
    /// Informational message about the compilation process.
    Info,
}

impl Severity {
    /// Returns true if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns true if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }

    /// Numeric rank; higher is more severe.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Error => 2,
            Severity::Warning => 1,
            Severity::Info => 0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message produced during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// Stable code (see [`codes`]), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// The diagnostic message.
    pub message: String,
    /// The phase during which this diagnostic was reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    /// The editor this diagnostic is attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    /// The symbol this diagnostic is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<SymbolId>,
    /// Source location, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            phase: None,
            editor: None,
            symbol: None,
            location: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create a new info diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn in_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attribute this diagnostic to an editor.
    pub fn from_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    pub fn for_symbol(mut self, symbol: SymbolId) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Add a location to this diagnostic.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Add a location if one is known.
    pub fn at_opt(mut self, location: Option<Location>) -> Self {
        if location.is_some() {
            self.location = location;
        }
        self
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(editor) = &self.editor {
            write!(f, " [{}]", editor)?;
        }
        if let Some(loc) = &self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}

/// Anything diagnostics can be reported into.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use graft_syntax::Span;

    use super::*;

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("edit failed").in_phase(Phase::Syntax);
        assert!(diag.severity.is_error());
        assert_eq!(diag.phase, Some(Phase::Syntax));
    }

    #[test]
    fn test_diagnostic_with_location() {
        let diag = Diagnostic::warning("returns a value")
            .at(Location::new("src/Program.cs", Span::new(3, 9)));
        assert_eq!(
            diag.location.as_ref().map(|l| l.path.as_str()),
            Some("src/Program.cs")
        );
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Info.to_string(), "info");
    }

    #[test]
    fn test_severity_rank() {
        assert!(Severity::Error.rank() > Severity::Warning.rank());
        assert!(Severity::Warning.rank() > Severity::Info.rank());
    }

    #[test]
    fn test_display_with_code_and_editor() {
        let diag = Diagnostic::error("routine threw")
            .with_code(codes::INVOCATION_FAILURE)
            .from_editor("invoke")
            .at(Location::new("a.cs", Span::new(1, 2)));
        insta::assert_snapshot!(diag.to_string(), @"error[GR0020]: routine threw [invoke] (at a.cs:1..2)");
    }
}
