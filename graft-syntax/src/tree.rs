//! Syntax trees.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::SyntaxNode;

/// Options the host parsed a tree with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Preprocessor symbols defined for this tree.
    #[serde(default)]
    pub defines: Vec<String>,
    /// Language version the tree was parsed as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_version: Option<String>,
}

impl ParseOptions {
    /// Return options with the given symbols defined, skipping duplicates.
    pub fn with_defines<I, S>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for define in defines {
            let define = define.into();
            if !self.defines.contains(&define) {
                self.defines.push(define);
            }
        }
        self
    }

    pub fn is_defined(&self, symbol: &str) -> bool {
        self.defines.iter().any(|d| d == symbol)
    }
}

/// A parsed source file.
///
/// The path is the tree's identity inside a compilation. The root is shared,
/// so cloning a tree never copies nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxTree {
    path: String,
    root: Arc<SyntaxNode>,
    #[serde(default)]
    options: ParseOptions,
}

impl SyntaxTree {
    pub fn new(path: impl Into<String>, root: SyntaxNode) -> Self {
        Self {
            path: path.into(),
            root: Arc::new(root),
            options: ParseOptions::default(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Same tree identity and options with a new root.
    pub fn with_root(&self, root: SyntaxNode) -> Self {
        Self {
            path: self.path.clone(),
            root: Arc::new(root),
            options: self.options.clone(),
        }
    }

    pub fn with_options(&self, options: ParseOptions) -> Self {
        Self {
            path: self.path.clone(),
            root: Arc::clone(&self.root),
            options,
        }
    }

    /// Returns true if both trees share the same root allocation.
    pub fn shares_root(&self, other: &SyntaxTree) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}
