//! The immutable compilation snapshot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{SymbolTable, SyntaxTree};

/// Errors from snapshot operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    #[error("no syntax tree with path '{0}'")]
    UnknownTree(String),

    #[error("a syntax tree with path '{0}' already exists")]
    DuplicateTree(String),
}

/// Compilation-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationOptions {
    /// Name of the produced assembly.
    #[serde(default)]
    pub assembly_name: String,
    /// Constants defined for the whole compilation.
    #[serde(default)]
    pub defines: Vec<String>,
    /// Referenced libraries.
    #[serde(default)]
    pub references: Vec<String>,
}

/// The program under compilation at one point in time.
///
/// A `Compilation` is never mutated in place; every operation returns a new
/// snapshot. Trees, the symbol table and the options are shared between
/// snapshots until replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compilation {
    #[serde(default)]
    trees: Vec<SyntaxTree>,
    #[serde(default)]
    symbols: Arc<SymbolTable>,
    #[serde(default)]
    options: Arc<CompilationOptions>,
}

impl Compilation {
    pub fn new(options: CompilationOptions) -> Self {
        Self {
            trees: Vec::new(),
            symbols: Arc::new(SymbolTable::new()),
            options: Arc::new(options),
        }
    }

    pub fn trees(&self) -> &[SyntaxTree] {
        &self.trees
    }

    pub fn tree(&self, path: &str) -> Option<&SyntaxTree> {
        self.trees.iter().find(|t| t.path() == path)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn options(&self) -> &CompilationOptions {
        &self.options
    }

    /// Add a tree at the end of the tree list.
    pub fn add_tree(&self, tree: SyntaxTree) -> Result<Self, CompilationError> {
        if self.tree(tree.path()).is_some() {
            return Err(CompilationError::DuplicateTree(tree.path().to_string()));
        }
        let mut next = self.clone();
        next.trees.push(tree);
        Ok(next)
    }

    /// Replace the tree with the same path, keeping its position.
    pub fn replace_tree(&self, tree: SyntaxTree) -> Result<Self, CompilationError> {
        let index = self
            .position(tree.path())
            .ok_or_else(|| CompilationError::UnknownTree(tree.path().to_string()))?;
        let mut next = self.clone();
        next.trees[index] = tree;
        Ok(next)
    }

    pub fn remove_tree(&self, path: &str) -> Result<Self, CompilationError> {
        let index = self
            .position(path)
            .ok_or_else(|| CompilationError::UnknownTree(path.to_string()))?;
        let mut next = self.clone();
        next.trees.remove(index);
        Ok(next)
    }

    /// Replace the whole tree list.
    pub fn with_trees(&self, trees: Vec<SyntaxTree>) -> Self {
        Self {
            trees,
            symbols: Arc::clone(&self.symbols),
            options: Arc::clone(&self.options),
        }
    }

    pub fn with_symbols(&self, symbols: SymbolTable) -> Self {
        Self {
            trees: self.trees.clone(),
            symbols: Arc::new(symbols),
            options: Arc::clone(&self.options),
        }
    }

    pub fn with_options(&self, options: CompilationOptions) -> Self {
        Self {
            trees: self.trees.clone(),
            symbols: Arc::clone(&self.symbols),
            options: Arc::new(options),
        }
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.trees.iter().position(|t| t.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxNode;

    fn unit_tree(path: &str) -> SyntaxTree {
        SyntaxTree::new(path, SyntaxNode::compilation_unit(vec![]))
    }

    #[test]
    fn test_add_replace_remove() {
        let base = Compilation::default();
        let one = base.add_tree(unit_tree("a.cs")).unwrap();
        let two = one.add_tree(unit_tree("b.cs")).unwrap();
        assert_eq!(base.trees().len(), 0);
        assert_eq!(two.trees().len(), 2);

        let replaced = two
            .replace_tree(SyntaxTree::new(
                "a.cs",
                SyntaxNode::compilation_unit(vec![SyntaxNode::class("C", vec![])]),
            ))
            .unwrap();
        assert_eq!(replaced.trees()[0].path(), "a.cs");
        assert_eq!(replaced.trees()[0].root().children().len(), 1);
        assert_eq!(two.trees()[0].root().children().len(), 0);

        let removed = replaced.remove_tree("a.cs").unwrap();
        assert_eq!(removed.trees().len(), 1);
        assert_eq!(removed.trees()[0].path(), "b.cs");
    }

    #[test]
    fn test_duplicate_and_unknown_paths() {
        let one = Compilation::default().add_tree(unit_tree("a.cs")).unwrap();
        assert_eq!(
            one.add_tree(unit_tree("a.cs")),
            Err(CompilationError::DuplicateTree("a.cs".into()))
        );
        assert_eq!(
            one.remove_tree("missing.cs"),
            Err(CompilationError::UnknownTree("missing.cs".into()))
        );
    }

    #[test]
    fn test_with_options_keeps_trees() {
        let one = Compilation::default().add_tree(unit_tree("a.cs")).unwrap();
        let options = CompilationOptions {
            defines: vec!["FOO".into()],
            ..Default::default()
        };
        let next = one.with_options(options);
        assert_eq!(next.options().defines, vec!["FOO"]);
        assert!(next.trees()[0].shares_root(&one.trees()[0]));
    }
}
