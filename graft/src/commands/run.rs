use std::path::PathBuf;

use clap::Args;
use eyre::{Result, WrapErr};
use graft_manifest::GraftToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct RunCommand {
    /// Compilation snapshot to edit (JSON)
    pub input: PathBuf,

    /// Path to graft.toml (defaults to ./graft.toml)
    #[arg(short, long, default_value = "graft.toml")]
    pub config: PathBuf,

    /// Print the resulting compilation as JSON to stdout
    #[arg(long)]
    pub print: bool,
}

impl RunCommand {
    pub fn run(&self) -> Result<()> {
        let graft_toml = GraftToml::open(&self.config).unwrap_or_exit();

        let report = ops::run(graft_toml.manifest(), &self.config, &self.input)?;
        // Stdout is reserved for the compilation.
        report.render(&mut TerminalOutput::stderr());

        if self.print
            && let Some(compilation) = &report.compilation
        {
            let json = serde_json::to_string_pretty(compilation)
                .wrap_err("Failed to serialize the compilation")?;
            println!("{}", json);
        }

        if !report.succeeded() {
            std::process::exit(1);
        }
        Ok(())
    }
}
