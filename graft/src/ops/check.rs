//! Check operation - manifest validation and plan resolution.

use std::path::Path;

use eyre::{Context, Result};
use graft_manifest::Manifest;

use super::{catalog, editor_info};
use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Instantiates every enabled editor and resolves the run order without
/// running anything.
pub fn check(manifest: &Manifest, config_path: &Path) -> Result<CheckReport> {
    let engine = catalog()
        .engine_for(manifest)
        .wrap_err("Validation failed")?;
    let plan = engine.plan();

    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        pipeline: manifest.pipeline.name.clone(),
        editors: plan
            .editors
            .iter()
            .map(|planned| editor_info(manifest, planned))
            .collect(),
        diagnostics: plan.diagnostics().to_vec(),
    })
}
