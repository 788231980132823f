//! Conditional call removal.

use std::collections::HashSet;

use eyre::{Result, WrapErr};
use graft_manifest::EditorConfig;
use graft_syntax::{
    Compilation, NodeClass, ParseOptions, Symbol, SymbolId, SyntaxKind, SyntaxNode, Value,
};

use super::EditorMeta;
use crate::{
    Editor, InitContext, Phase,
    dispatch::{Dispatched, Dispatcher, PassContext, Rewriter},
};

/// Removes statements that call a symbol carrying an attribute, and hides
/// diagnostics about the symbols whose calls were removed.
///
/// String arguments of the attribute name constants; a call is kept in a
/// tree that defines any of them. `[Conditional("DEBUG")]` calls survive
/// only where `DEBUG` is defined.
#[derive(Debug, Clone)]
pub struct StripCalls {
    meta: EditorMeta,
    attribute: String,
}

impl StripCalls {
    pub const KIND: &'static str = "strip-calls";
    pub const DEFAULT_ATTRIBUTE: &'static str = "Conditional";

    pub fn new(meta: EditorMeta, attribute: impl Into<String>) -> Self {
        Self {
            meta,
            attribute: attribute.into(),
        }
    }

    /// Options: `attribute` (defaults to `Conditional`).
    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        let attribute: Option<String> = config
            .option("attribute")
            .wrap_err("option 'attribute' must be a string")?;
        Ok(Self::new(
            EditorMeta::from_config(config),
            attribute.unwrap_or_else(|| Self::DEFAULT_ATTRIBUTE.to_string()),
        ))
    }
}

impl Editor for StripCalls {
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
        let attribute = self.attribute.clone();
        ctx.register(Phase::Syntax, move |compilation, ctx| {
            let targets: Vec<&Symbol> = compilation.symbols().with_attribute(&attribute).collect();
            if targets.is_empty() {
                return Ok(compilation.clone());
            }

            let cancel = ctx.cancellation().clone();
            let mut stripped = HashSet::new();
            let mut trees = Vec::with_capacity(compilation.trees().len());
            for tree in compilation.trees() {
                let mut stripper = CallStripper {
                    targets: stripped_in(&targets, &attribute, tree.options()),
                };
                if stripper.targets.is_empty() {
                    trees.push(tree.clone());
                    continue;
                }
                stripped.extend(stripper.targets.iter().copied());
                let mut dispatcher = Dispatcher::new([&mut stripper as &mut dyn Rewriter]);
                match dispatcher.dispatch(tree, &cancel)? {
                    Dispatched::Tree(tree) => trees.push(tree),
                    Dispatched::Removed => {}
                }
                tracing::debug!(
                    tree = tree.path(),
                    removed = dispatcher.stats().removed,
                    "calls stripped"
                );
            }

            // Only symbols whose calls go away in at least one tree.
            if !stripped.is_empty() {
                ctx.suppress(move |d| d.symbol.is_some_and(|id| stripped.contains(&id)));
            }
            Ok(compilation.with_trees(trees))
        });
        Ok(())
    }
}

/// Targets whose calls go away in a tree parsed with `options`.
fn stripped_in(targets: &[&Symbol], attribute: &str, options: &ParseOptions) -> HashSet<SymbolId> {
    targets
        .iter()
        .filter(|symbol| {
            !symbol
                .attributes
                .iter()
                .filter(|a| a.name == attribute)
                .flat_map(|a| &a.args)
                .any(|arg| matches!(arg, Value::Str(name) if options.is_defined(name)))
        })
        .map(|symbol| symbol.id)
        .collect()
}

struct CallStripper {
    targets: HashSet<SymbolId>,
}

impl Rewriter for CallStripper {
    fn name(&self) -> &str {
        StripCalls::KIND
    }

    fn visits(&self) -> &[NodeClass] {
        &[NodeClass::Statement]
    }

    fn rewrite(&mut self, node: SyntaxNode, _: &mut PassContext) -> Result<Option<SyntaxNode>> {
        if node.kind() != SyntaxKind::ExpressionStatement {
            return Ok(Some(node));
        }
        let strips = node
            .children()
            .first()
            .and_then(SyntaxNode::invoked_symbol)
            .is_some_and(|id| self.targets.contains(&id));
        Ok((!strips).then_some(node))
    }
}
