//! Manifest types and parsing for graft.toml files.

mod file;
mod parse;

pub use file::GraftToml;
use serde::Deserialize;

use crate::EditorConfig;

/// Root manifest for graft.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Pipeline-wide settings
    pub pipeline: PipelineConfig,

    /// Editors in declaration order
    #[serde(default, rename = "editor")]
    pub editors: Vec<EditorConfig>,
}

/// The `[pipeline]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Name of the pipeline, used in reports
    pub name: String,

    /// Features the host compiler offers to editors
    #[serde(default)]
    pub host_features: Vec<String>,

    /// Treat unsuppressed warnings as a failed run
    #[serde(default)]
    pub fail_on_warnings: bool,
}

impl Manifest {
    /// Editors that are not disabled, in declaration order.
    pub fn enabled_editors(&self) -> impl Iterator<Item = &EditorConfig> {
        self.editors.iter().filter(|e| e.enabled)
    }

    /// Look up an editor declaration by name.
    pub fn editor(&self, name: &str) -> Option<&EditorConfig> {
        self.editors.iter().find(|e| e.name == name)
    }
}
