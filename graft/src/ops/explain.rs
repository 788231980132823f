//! Explain operation - pipeline explanation.

use std::path::Path;

use eyre::{Context, Result};
use graft_manifest::Manifest;
use graft_pipeline::Phase;

use super::{catalog, editor_info};
use crate::reports::{ExplainReport, PhaseInfo, PipelineInfo};

/// Execute the explain operation.
pub fn explain(manifest: &Manifest, config_path: &Path) -> Result<ExplainReport> {
    let catalog = catalog();
    let kinds = catalog.kinds().map(String::from).collect();
    let plan = catalog
        .engine_for(manifest)
        .wrap_err("Pipeline failed")?
        .plan();

    let phases = Phase::ALL
        .iter()
        .map(|phase| PhaseInfo {
            name: phase.name().to_string(),
            description: phase.description().to_string(),
        })
        .collect();

    Ok(ExplainReport {
        config_path: config_path.to_path_buf(),
        pipeline: PipelineInfo {
            name: manifest.pipeline.name.clone(),
            host_features: manifest.pipeline.host_features.clone(),
            fail_on_warnings: manifest.pipeline.fail_on_warnings,
            disabled: manifest
                .editors
                .iter()
                .filter(|e| !e.enabled)
                .map(|e| e.name.clone())
                .collect(),
        },
        phases,
        kinds,
        editors: plan
            .editors
            .iter()
            .map(|planned| editor_info(manifest, planned))
            .collect(),
        diagnostics: plan.diagnostics().iter().map(ToString::to_string).collect(),
    })
}
