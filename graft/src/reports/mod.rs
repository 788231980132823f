//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod check;
mod explain;
mod output;
mod run;

pub use check::CheckReport;
pub use explain::{ExplainReport, PhaseInfo, PipelineInfo};
pub use output::{Report, TerminalOutput};
pub use run::RunReport;

/// An editor as it will run.
#[derive(Debug, Clone)]
pub struct EditorInfo {
    /// Editor name.
    pub name: String,
    /// Editor kind from the manifest.
    pub kind: String,
    /// Ordering key.
    pub order: i32,
    /// Required features.
    pub requires: Vec<String>,
    /// Offered features.
    pub provides: Vec<String>,
}

impl EditorInfo {
    fn summary(&self) -> String {
        format!("{} ({}, order {})", self.name, self.kind, self.order)
    }
}
