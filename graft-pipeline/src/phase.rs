//! Pipeline phases.

use serde::Serialize;

/// Information about a pipeline phase.
#[derive(Debug, Clone)]
pub struct PhaseInfo {
    /// The phase name.
    pub name: &'static str,
    /// A human-readable description.
    pub description: &'static str,
}

/// A step of the run, in execution order.
///
/// Phases only move forward. Edits registered for a phase run when that
/// phase is reached; once a phase has run, nothing more can be registered
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Start,
    Syntax,
    Semantic,
    Emit,
    End,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 5] = [
        Phase::Start,
        Phase::Syntax,
        Phase::Semantic,
        Phase::Emit,
        Phase::End,
    ];

    /// The name of this phase (used in diagnostics and logs).
    pub fn name(self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Syntax => "syntax",
            Phase::Semantic => "semantic",
            Phase::Emit => "emit",
            Phase::End => "end",
        }
    }

    /// A human-readable description of what edits in this phase are for.
    pub fn description(self) -> &'static str {
        match self {
            Phase::Start => "Editors are initialized; compilation-wide settings are edited",
            Phase::Syntax => "Syntax trees are rewritten",
            Phase::Semantic => "Symbols are inspected and compile-time code runs",
            Phase::Emit => "Last edits before the host emits the compilation",
            Phase::End => "The final snapshot is committed",
        }
    }

    /// The phase after this one, `None` after `End`.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Start => Some(Phase::Syntax),
            Phase::Syntax => Some(Phase::Semantic),
            Phase::Semantic => Some(Phase::Emit),
            Phase::Emit => Some(Phase::End),
            Phase::End => None,
        }
    }

    /// Get information about this phase.
    pub fn info(self) -> PhaseInfo {
        PhaseInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
