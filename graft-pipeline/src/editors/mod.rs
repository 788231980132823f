//! Built-in editors and the catalog that creates editors from manifest
//! declarations.
//!
//! | kind                  | phase    | does                                              |
//! |-----------------------|----------|---------------------------------------------------|
//! | `define-constants`    | start    | defines constants for the compilation and trees   |
//! | `strip-calls`         | syntax   | removes calls to symbols carrying an attribute    |
//! | `inline-constants`    | syntax   | replaces constant names with literals             |
//! | `compile-time-invoke` | semantic | runs `[Invoke]` methods through native routines   |

mod catalog;
mod compile_time_invoke;
mod define_constants;
mod inline_constants;
mod strip_calls;

pub use catalog::{EditorCatalog, EditorFactory};
pub use compile_time_invoke::CompileTimeInvoke;
pub use define_constants::DefineConstants;
use graft_manifest::EditorConfig;
pub use inline_constants::InlineConstants;
pub use strip_calls::StripCalls;

use crate::Feature;

/// Name, order and requirements shared by the built-in editors.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorMeta {
    name: String,
    order: i32,
    requires: Vec<Feature>,
}

impl EditorMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: 0,
            requires: Vec::new(),
        }
    }

    /// Name, order and extra requirements from a manifest declaration.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            name: config.name.clone(),
            order: config.order,
            requires: config.requires.iter().map(|f| Feature::new(f.as_str())).collect(),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Add a requirement unless it is already listed.
    pub fn requiring(mut self, feature: Feature) -> Self {
        if !self.requires.contains(&feature) {
            self.requires.push(feature);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn requires(&self) -> Vec<Feature> {
        self.requires.clone()
    }
}
