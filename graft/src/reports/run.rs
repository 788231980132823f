//! Run command report data structures.

use std::path::PathBuf;

use graft_pipeline::{Diagnostic, RunStatus};
use graft_syntax::Compilation;

use super::output::{Output, Report};

/// Report data from a pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Path to the input compilation.
    pub input_path: PathBuf,
    /// Pipeline name.
    pub pipeline: String,
    pub status: RunStatus,
    /// Unsuppressed diagnostics, most severe first.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of diagnostics hidden by suppression.
    pub suppressed: usize,
    /// The resulting compilation, if any.
    pub compilation: Option<Compilation>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }
}

impl Report for RunReport {
    fn render(&self, out: &mut dyn Output) {
        for diagnostic in &self.diagnostics {
            out.diagnostic(&diagnostic.to_string());
        }
        if !self.diagnostics.is_empty() {
            out.newline();
        }

        match self.status {
            RunStatus::Succeeded => out.preformatted(&format!(
                "✓ {} edited {}",
                self.pipeline,
                self.input_path.display()
            )),
            RunStatus::Failed => {
                let errors = self.error_count();
                out.preformatted(&format!(
                    "✗ {} failed with {} error{}",
                    self.pipeline,
                    errors,
                    if errors == 1 { "" } else { "s" }
                ))
            }
            RunStatus::Cancelled => out.preformatted(&format!("{} was cancelled", self.pipeline)),
        }

        if let Some(compilation) = &self.compilation {
            out.key_value_indented("Trees", &compilation.trees().len().to_string());
            out.key_value_indented("Symbols", &compilation.symbols().len().to_string());
        }
        if self.suppressed > 0 {
            out.key_value_indented("Suppressed diagnostics", &self.suppressed.to_string());
        }
    }
}
