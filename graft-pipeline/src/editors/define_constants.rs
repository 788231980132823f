//! Compilation-wide constant definitions.

use eyre::{Result, WrapErr};
use graft_manifest::EditorConfig;
use graft_syntax::Compilation;

use super::EditorMeta;
use crate::{Editor, InitContext, Phase};

/// Defines constants for the whole compilation and for every tree.
///
/// Runs at `Start` so that later editors see the constants in every tree's
/// parse options.
#[derive(Debug, Clone)]
pub struct DefineConstants {
    meta: EditorMeta,
    constants: Vec<String>,
}

impl DefineConstants {
    pub const KIND: &'static str = "define-constants";

    pub fn new(meta: EditorMeta, constants: Vec<String>) -> Self {
        Self { meta, constants }
    }

    /// Options: `constants` (list of names).
    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        let constants: Vec<String> = config
            .option_or_default("constants")
            .wrap_err("option 'constants' must be a list of names")?;
        Ok(Self::new(EditorMeta::from_config(config), constants))
    }
}

impl Editor for DefineConstants {
    fn name(&self) -> &str {
        self.meta.name()
    }

    fn order(&self) -> i32 {
        self.meta.order()
    }

    fn requires(&self) -> Vec<crate::Feature> {
        self.meta.requires()
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        let constants = self.constants.clone();
        ctx.register(Phase::Start, move |compilation, _| {
            Ok(define(compilation, &constants))
        });
        Ok(())
    }
}

fn define(compilation: &Compilation, constants: &[String]) -> Compilation {
    let mut options = compilation.options().clone();
    for constant in constants {
        if !options.defines.contains(constant) {
            options.defines.push(constant.clone());
        }
    }

    let trees = compilation
        .trees()
        .iter()
        .map(|tree| tree.with_options(tree.options().clone().with_defines(constants.iter().cloned())))
        .collect();

    tracing::debug!(constants = constants.len(), "constants defined");
    compilation.with_options(options).with_trees(trees)
}
