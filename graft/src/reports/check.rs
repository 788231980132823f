//! Check command report data structures.

use std::path::PathBuf;

use graft_pipeline::Diagnostic;

use super::{
    EditorInfo,
    output::{Output, Report},
};

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Pipeline name.
    pub pipeline: String,
    /// Editors in run order.
    pub editors: Vec<EditorInfo>,
    /// Configuration diagnostics from plan resolution.
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for diagnostic in &self.diagnostics {
            out.diagnostic(&diagnostic.to_string());
        }
        if !self.diagnostics.is_empty() {
            out.newline();
        }

        if !self.is_valid() {
            return;
        }

        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        out.newline();
        out.preformatted(&format!("  pipeline {}", self.pipeline));
        let count = self.editors.len();
        out.preformatted(&format!(
            "  {} editor{}:",
            count,
            if count == 1 { "" } else { "s" }
        ));
        for (i, editor) in self.editors.iter().enumerate() {
            out.preformatted(&format!("    {}. {}", i + 1, editor.summary()));
        }
    }
}
