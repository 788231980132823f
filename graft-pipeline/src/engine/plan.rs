//! Editor ordering and dependency resolution.

use std::collections::HashSet;

use serde::Serialize;

use crate::{Diagnostic, Editor, Feature, Phase, codes};

/// An editor that will take part in the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedEditor {
    pub name: String,
    pub order: i32,
    /// Position in the declaration list.
    pub declared: usize,
    pub requires: Vec<Feature>,
    pub provides: Vec<Feature>,
}

/// The resolved editor order of a run, with configuration diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Editors in run order.
    pub editors: Vec<PlannedEditor>,
    diagnostics: Vec<Diagnostic>,
}

impl Plan {
    pub(crate) fn resolve(editors: &[Box<dyn Editor>], host_features: &[Feature]) -> Self {
        let mut diagnostics = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut planned = Vec::with_capacity(editors.len());

        for (declared, editor) in editors.iter().enumerate() {
            let name = editor.name();
            if name.trim().is_empty() {
                diagnostics.push(
                    Diagnostic::error(format!("editor #{} has an empty name", declared + 1))
                        .with_code(codes::MALFORMED_REGISTRATION)
                        .in_phase(Phase::Start),
                );
                continue;
            }
            if !seen.insert(name) {
                diagnostics.push(
                    Diagnostic::info(format!(
                        "editor '{}' is declared more than once; the first declaration is kept",
                        name
                    ))
                    .with_code(codes::DUPLICATE_EDITOR)
                    .in_phase(Phase::Start)
                    .from_editor(name),
                );
                continue;
            }
            planned.push(PlannedEditor {
                name: name.to_string(),
                order: editor.order(),
                declared,
                requires: editor.requires(),
                provides: editor.provides(),
            });
        }

        // Stable: equal orders keep declaration order.
        planned.sort_by_key(|e| e.order);

        for (index, editor) in planned.iter().enumerate() {
            for feature in &editor.requires {
                let offered = host_features.contains(feature)
                    || planned
                        .iter()
                        .enumerate()
                        .any(|(other, e)| other != index && e.provides.contains(feature));
                if !offered {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "editor '{}' requires feature '{}', which neither the host nor another editor offers",
                            editor.name, feature
                        ))
                        .with_code(codes::UNRESOLVED_DEPENDENCY)
                        .in_phase(Phase::Start)
                        .from_editor(editor.name.as_str()),
                    );
                }
            }
        }

        Self {
            editors: planned,
            diagnostics,
        }
    }

    /// Configuration diagnostics, in the order they were found.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns true if the run can start.
    pub fn is_viable(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Editor names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.editors.iter().map(|e| e.name.as_str())
    }
}
