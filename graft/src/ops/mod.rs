//! Core operations.
//!
//! This module contains the business logic for graft commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod explain;
pub mod run;

use std::rc::Rc;

pub use check::check;
pub use explain::explain;
use graft_manifest::Manifest;
use graft_pipeline::{PlannedEditor, editors::EditorCatalog};
pub use run::run;

use crate::reports::EditorInfo;

/// The editor kinds the CLI knows about. The CLI has no native routines to
/// offer, so `compile-time-invoke` reports every target as unbound.
fn catalog() -> EditorCatalog {
    EditorCatalog::builtin(Rc::default())
}

fn editor_info(manifest: &Manifest, planned: &PlannedEditor) -> EditorInfo {
    EditorInfo {
        name: planned.name.clone(),
        kind: manifest
            .editor(&planned.name)
            .map(|config| config.kind.clone())
            .unwrap_or_default(),
        order: planned.order,
        requires: planned.requires.iter().map(ToString::to_string).collect(),
        provides: planned.provides.iter().map(ToString::to_string).collect(),
    }
}
