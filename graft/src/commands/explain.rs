use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use graft_manifest::GraftToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ExplainCommand {
    /// Path to graft.toml (defaults to ./graft.toml)
    #[arg(short, long, default_value = "graft.toml")]
    pub config: PathBuf,
}

impl ExplainCommand {
    pub fn run(&self) -> Result<()> {
        let graft_toml = GraftToml::open(&self.config).unwrap_or_exit();

        let report = ops::explain(graft_toml.manifest(), &self.config)?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
