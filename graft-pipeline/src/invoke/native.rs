//! Native routines the host can run at compile time.

use std::rc::Rc;

use indexmap::IndexMap;

use super::Argument;

/// A routine bound to a compile-time target.
pub type NativeRoutine = Rc<dyn Fn(&[Argument]) -> eyre::Result<()>>;

/// Native routines keyed by the qualified name of the method they implement.
#[derive(Clone, Default)]
pub struct NativeRegistry {
    routines: IndexMap<String, NativeRoutine>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `routine` to the method named `qualified_name` (e.g.
    /// `App.Build.Generate`). A later registration replaces an earlier one.
    pub fn register(
        &mut self,
        qualified_name: impl Into<String>,
        routine: impl Fn(&[Argument]) -> eyre::Result<()> + 'static,
    ) -> &mut Self {
        self.routines.insert(qualified_name.into(), Rc::new(routine));
        self
    }

    pub fn get(&self, qualified_name: &str) -> Option<&NativeRoutine> {
        self.routines.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.routines.contains_key(qualified_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routines.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

impl std::fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.routines.keys()).finish()
    }
}
