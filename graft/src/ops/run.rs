//! Run operation - execute the pipeline over a compilation snapshot.

use std::path::Path;

use eyre::{Context, Result};
use graft_manifest::Manifest;
use graft_syntax::Compilation;

use super::catalog;
use crate::reports::RunReport;

/// Load a compilation snapshot from JSON.
pub fn load_compilation(path: &Path) -> Result<Compilation> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let compilation: Compilation = serde_json::from_str(&content)
        .wrap_err_with(|| format!("{} is not a valid compilation", path.display()))?;
    tracing::info!(
        trees = compilation.trees().len(),
        symbols = compilation.symbols().len(),
        "compilation loaded"
    );
    Ok(compilation)
}

/// Execute the run operation.
pub fn run(manifest: &Manifest, config_path: &Path, input: &Path) -> Result<RunReport> {
    let initial = load_compilation(input)?;
    let engine = catalog()
        .engine_for(manifest)
        .wrap_err("Invalid pipeline")?;

    let outcome = engine.run(initial);

    Ok(RunReport {
        config_path: config_path.to_path_buf(),
        input_path: input.to_path_buf(),
        pipeline: manifest.pipeline.name.clone(),
        status: outcome.status,
        suppressed: outcome.audit.iter().filter(|e| e.suppressed).count(),
        diagnostics: outcome.diagnostics,
        compilation: outcome.compilation,
    })
}
