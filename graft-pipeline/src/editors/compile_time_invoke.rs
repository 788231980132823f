//! Compile-time invocation of `[Invoke]` methods.

use std::rc::Rc;

use eyre::Result;
use graft_manifest::EditorConfig;

use super::EditorMeta;
use crate::{Editor, Feature, InitContext, Phase, invoke::NativeRegistry};

/// Runs every `[Invoke]` method of the compilation through the host's native
/// routines. Requires [`Feature::EXTENDED_SYMBOL_INFO`].
#[derive(Debug, Clone)]
pub struct CompileTimeInvoke {
    meta: EditorMeta,
    natives: Rc<NativeRegistry>,
}

impl CompileTimeInvoke {
    pub const KIND: &'static str = "compile-time-invoke";

    pub fn new(meta: EditorMeta, natives: Rc<NativeRegistry>) -> Self {
        Self {
            meta: meta.requiring(Feature::EXTENDED_SYMBOL_INFO),
            natives,
        }
    }

    /// No options.
    pub fn from_config(config: &EditorConfig, natives: Rc<NativeRegistry>) -> Self {
        Self::new(EditorMeta::from_config(config), natives)
    }
}

impl Editor for CompileTimeInvoke {
    fn name(&self) -> &str {
        self.meta.name()
    }

    fn order(&self) -> i32 {
        self.meta.order()
    }

    fn requires(&self) -> Vec<Feature> {
        self.meta.requires()
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        let natives = Rc::clone(&self.natives);
        ctx.register(Phase::Semantic, move |compilation, ctx| {
            let summary = ctx.invoke_symbols(compilation, &natives)?;
            tracing::debug!(
                invoked = summary.invoked,
                failed = summary.failed,
                rejected = summary.rejected,
                skipped = summary.skipped,
                "compile-time invocation finished"
            );
            Ok(compilation.clone())
        });
        Ok(())
    }
}
