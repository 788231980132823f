//! The editor trait.

use std::borrow::Cow;

use eyre::Result;
use serde::Serialize;

use crate::InitContext;

/// A named capability an editor can require or offer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Feature(Cow<'static, str>);

impl Feature {
    /// The host exposes attributes, containing types and parameter shapes
    /// for every symbol.
    pub const EXTENDED_SYMBOL_INFO: Feature = Feature::from_static("extended-symbol-info");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Feature {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Feature {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A unit of compile-time transformation.
///
/// Editors are ordered by [`order`](Editor::order) (ties keep declaration
/// order), initialized once when the run reaches [`Phase::Start`], and
/// disposed once when the run ends, whatever the exit path. During
/// [`initialize`](Editor::initialize) an editor registers the edits it wants
/// to run, extends extension points and installs suppression predicates.
///
/// # Example
///
/// ```ignore
/// struct Rename;
///
/// impl Editor for Rename {
///     fn name(&self) -> &str { "rename" }
///
///     fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
///         ctx.register(Phase::Syntax, |compilation, _ctx| Ok(compilation.clone()));
///         Ok(())
///     }
/// }
/// ```
///
/// [`Phase::Start`]: crate::Phase::Start
pub trait Editor {
    /// Unique name, used for deduplication and diagnostics attribution.
    fn name(&self) -> &str;

    /// Lower runs first.
    fn order(&self) -> i32 {
        0
    }

    /// Features that must be offered by the host or by another editor.
    fn requires(&self) -> Vec<Feature> {
        Vec::new()
    }

    /// Features this editor offers to the others.
    fn provides(&self) -> Vec<Feature> {
        Vec::new()
    }

    /// Register edits and extensions.
    ///
    /// # Errors
    ///
    /// An error aborts the run before any edit executes.
    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()>;

    /// Release resources. Called once, after the last edit of the run.
    fn dispose(&mut self) {}
}

impl<E: Editor + ?Sized> Editor for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn order(&self) -> i32 {
        (**self).order()
    }

    fn requires(&self) -> Vec<Feature> {
        (**self).requires()
    }

    fn provides(&self) -> Vec<Feature> {
        (**self).provides()
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> Result<()> {
        (**self).initialize(ctx)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}
