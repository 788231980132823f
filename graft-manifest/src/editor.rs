//! Editor declarations.

use serde::{Deserialize, de::DeserializeOwned};

/// One `[[editor]]` entry of the manifest.
///
/// Keys other than the common ones below are kept as kind-specific options
/// and interpreted by the factory registered for `kind`.
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    /// Unique editor name, used for diagnostics attribution.
    pub name: String,

    /// Editor kind, resolved against the editor catalog.
    pub kind: String,

    /// Explicit priority; lower runs first. Ties keep declaration order.
    #[serde(default)]
    pub order: i32,

    /// Features this editor requires in addition to its built-in requirements.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Disabled editors are skipped entirely.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Kind-specific options.
    #[serde(flatten)]
    pub options: toml::Table,
}

fn default_enabled() -> bool {
    true
}

impl EditorConfig {
    /// Create a config with no options (mostly useful in tests).
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            order: 0,
            requires: Vec::new(),
            enabled: true,
            options: toml::Table::new(),
        }
    }

    /// Set a kind-specific option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Read a kind-specific option, if present.
    pub fn option<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> std::result::Result<Option<T>, toml::de::Error> {
        self.options
            .get(key)
            .cloned()
            .map(|value| value.try_into())
            .transpose()
    }

    /// Read a kind-specific option, falling back to the type's default.
    pub fn option_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> std::result::Result<T, toml::de::Error> {
        Ok(self.option(key)?.unwrap_or_default())
    }
}
