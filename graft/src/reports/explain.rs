//! Explain command report data structures.

use std::path::PathBuf;

use super::{
    EditorInfo,
    output::{Output, Report},
};

/// Report data from pipeline explanation.
#[derive(Debug)]
pub struct ExplainReport {
    /// Path to the manifest file.
    pub config_path: PathBuf,
    /// Pipeline settings.
    pub pipeline: PipelineInfo,
    /// Pipeline phases.
    pub phases: Vec<PhaseInfo>,
    /// Editor kinds the catalog can create.
    pub kinds: Vec<String>,
    /// Editors in run order.
    pub editors: Vec<EditorInfo>,
    /// Rendered plan diagnostics.
    pub diagnostics: Vec<String>,
}

/// Information extracted from the `[pipeline]` table.
#[derive(Debug)]
pub struct PipelineInfo {
    pub name: String,
    pub host_features: Vec<String>,
    pub fail_on_warnings: bool,
    /// Declared editors with `enabled = false`.
    pub disabled: Vec<String>,
}

/// Information about a pipeline phase.
#[derive(Debug)]
pub struct PhaseInfo {
    /// Phase name.
    pub name: String,
    /// Phase description.
    pub description: String,
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

impl Report for ExplainReport {
    fn render(&self, out: &mut dyn Output) {
        out.title("Graft Pipeline Explanation");
        out.newline();

        out.key_value("Input", &self.config_path.display().to_string());
        out.key_value_indented("Pipeline", &self.pipeline.name);
        out.key_value_indented("Host features", &list_or_none(&self.pipeline.host_features));
        out.key_value_indented(
            "Fail on warnings",
            if self.pipeline.fail_on_warnings {
                "yes"
            } else {
                "no"
            },
        );
        if !self.pipeline.disabled.is_empty() {
            out.key_value_indented("Disabled", &self.pipeline.disabled.join(", "));
        }
        out.newline();

        out.section("Pipeline Phases");
        for (i, phase) in self.phases.iter().enumerate() {
            out.numbered_item(i + 1, &format!("{} - {}", phase.name, phase.description));
        }
        out.newline();

        out.section("Editor Kinds");
        for kind in &self.kinds {
            out.list_item(kind);
        }
        out.newline();

        out.section("Run Order");
        for (i, editor) in self.editors.iter().enumerate() {
            out.numbered_item(i + 1, &editor.summary());
            if !editor.requires.is_empty() {
                out.key_value_indented("  requires", &editor.requires.join(", "));
            }
            if !editor.provides.is_empty() {
                out.key_value_indented("  provides", &editor.provides.join(", "));
            }
        }

        if !self.diagnostics.is_empty() {
            out.newline();
            out.section("Plan Diagnostics");
            for diagnostic in &self.diagnostics {
                out.list_item(diagnostic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use graft_manifest::Manifest;

    use crate::{ops, reports::testing::Recorded};

    use super::*;

    #[test]
    fn test_render_explain() {
        let manifest: Manifest = r#"
            [pipeline]
            name = "generate"
            host_features = ["extended-symbol-info"]

            [[editor]]
            name = "invoke"
            kind = "compile-time-invoke"

            [[editor]]
            name = "defines"
            kind = "define-constants"
            order = -10
            constants = ["FOO"]

            [[editor]]
            name = "strip"
            kind = "strip-calls"
            enabled = false
        "#
        .parse()
        .unwrap();

        let report = ops::explain(&manifest, Path::new("graft.toml")).unwrap();
        let mut out = Recorded::default();
        report.render(&mut out);

        insta::assert_snapshot!(out.0, @r"
        Graft Pipeline Explanation
        ==========================

        Input: graft.toml
          Pipeline: generate
          Host features: extended-symbol-info
          Fail on warnings: no
          Disabled: strip

        Pipeline Phases:
          1. start - Editors are initialized; compilation-wide settings are edited
          2. syntax - Syntax trees are rewritten
          3. semantic - Symbols are inspected and compile-time code runs
          4. emit - Last edits before the host emits the compilation
          5. end - The final snapshot is committed

        Editor Kinds:
          - define-constants
          - strip-calls
          - inline-constants
          - compile-time-invoke

        Run Order:
          1. defines (define-constants, order -10)
          2. invoke (compile-time-invoke, order 0)
            requires: extended-symbol-info
        ");
    }
}
