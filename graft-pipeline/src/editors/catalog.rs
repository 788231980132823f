//! Editor discovery through an explicit registry of factories.

use std::rc::Rc;

use eyre::{Result, WrapErr, eyre};
use graft_manifest::{EditorConfig, Manifest};
use indexmap::IndexMap;

use super::{CompileTimeInvoke, DefineConstants, InlineConstants, StripCalls};
use crate::{Editor, Engine, invoke::NativeRegistry};

/// Creates an editor from its manifest declaration.
pub type EditorFactory = Box<dyn Fn(&EditorConfig) -> Result<Box<dyn Editor>>>;

/// Maps editor kinds to factories.
///
/// # Example
///
/// ```ignore
/// let mut catalog = EditorCatalog::builtin(Rc::new(natives));
/// catalog.register("rename", |config| Ok(Box::new(Rename::from_config(config)?)));
///
/// let engine = catalog.engine_for(graft_toml.manifest())?;
/// ```
#[derive(Default)]
pub struct EditorCatalog {
    factories: IndexMap<String, EditorFactory>,
}

impl EditorCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the built-in editor kinds.
    pub fn builtin(natives: Rc<NativeRegistry>) -> Self {
        let mut catalog = Self::new();
        catalog
            .register(DefineConstants::KIND, |config| {
                Ok(Box::new(DefineConstants::from_config(config)?))
            })
            .register(StripCalls::KIND, |config| {
                Ok(Box::new(StripCalls::from_config(config)?))
            })
            .register(InlineConstants::KIND, |config| {
                Ok(Box::new(InlineConstants::from_config(config)?))
            })
            .register(CompileTimeInvoke::KIND, move |config| {
                Ok(Box::new(CompileTimeInvoke::from_config(config, Rc::clone(&natives))))
            });
        catalog
    }

    /// Register a factory for `kind`, replacing any earlier one.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn(&EditorConfig) -> Result<Box<dyn Editor>> + 'static,
    ) -> &mut Self {
        self.factories.insert(kind.into(), Box::new(factory));
        self
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Create the editor declared by `config`.
    pub fn instantiate(&self, config: &EditorConfig) -> Result<Box<dyn Editor>> {
        let factory = self.factories.get(&config.kind).ok_or_else(|| {
            eyre!(
                "editor '{}' has unknown kind '{}' (known kinds: {})",
                config.name,
                config.kind,
                self.kinds().collect::<Vec<_>>().join(", ")
            )
        })?;
        factory(config).wrap_err_with(|| format!("invalid options for editor '{}'", config.name))
    }

    /// Create every enabled editor of `manifest`, in declaration order.
    pub fn instantiate_all(&self, manifest: &Manifest) -> Result<Vec<Box<dyn Editor>>> {
        manifest
            .enabled_editors()
            .map(|config| self.instantiate(config))
            .collect()
    }

    /// An engine configured from `manifest`.
    pub fn engine_for(&self, manifest: &Manifest) -> Result<Engine> {
        Ok(Engine::new()
            .host_features(manifest.pipeline.host_features.iter().cloned())
            .fail_on_warnings(manifest.pipeline.fail_on_warnings)
            .editors(self.instantiate_all(manifest)?))
    }
}

impl std::fmt::Debug for EditorCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
