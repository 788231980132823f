//! Constant identifier inlining.

use eyre::{Result, WrapErr};
use graft_manifest::EditorConfig;
use graft_syntax::{NodeClass, SyntaxKind, SyntaxNode, Value};
use indexmap::IndexMap;

use super::EditorMeta;
use crate::{
    EMIT_CONSTANT, Editor, InitContext, Link, Phase,
    dispatch::{Dispatcher, PassContext, Rewriter},
};

/// Replaces identifiers naming a configured constant with a literal.
///
/// The literal comes from the `emit-constant` extension point, so other
/// editors can change how values are spelled.
#[derive(Debug, Clone)]
pub struct InlineConstants {
    meta: EditorMeta,
    values: IndexMap<String, Value>,
}

impl InlineConstants {
    pub const KIND: &'static str = "inline-constants";

    pub fn new(meta: EditorMeta, values: IndexMap<String, Value>) -> Self {
        Self { meta, values }
    }

    /// Options: `values` (table of name to constant).
    pub fn from_config(config: &EditorConfig) -> Result<Self> {
        let values: IndexMap<String, Value> = config
            .option_or_default("values")
            .wrap_err("option 'values' must be a table of constants")?;
        Ok(Self::new(EditorMeta::from_config(config), values))
    }
}

impl Editor for InlineConstants {
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
        if self.values.is_empty() {
            tracing::debug!(editor = self.meta.name(), "no values to inline");
            return Ok(());
        }
        let values = self.values.clone();
        ctx.register(Phase::Syntax, move |compilation, ctx| {
            let mut inliner = Inliner {
                values: &values,
                emit: ctx.extensions().get(EMIT_CONSTANT)?.build(),
                replaced: 0,
            };
            let cancel = ctx.cancellation().clone();
            let inlined = Dispatcher::new([&mut inliner as &mut dyn Rewriter])
                .rewrite_compilation(compilation, &cancel)?;
            tracing::debug!(replaced = inliner.replaced, "constants inlined");
            Ok(inlined)
        });
        Ok(())
    }
}

struct Inliner<'a> {
    values: &'a IndexMap<String, Value>,
    emit: Link<Value, SyntaxNode>,
    replaced: usize,
}

impl Rewriter for Inliner<'_> {
    fn name(&self) -> &str {
        InlineConstants::KIND
    }

    fn visits(&self) -> &[NodeClass] {
        &[NodeClass::Expression]
    }

    fn rewrite(&mut self, node: SyntaxNode, _: &mut PassContext) -> Result<Option<SyntaxNode>> {
        if node.kind() != SyntaxKind::Identifier || node.symbol().is_some() {
            return Ok(Some(node));
        }
        match self.values.get(node.text()) {
            Some(value) => {
                self.replaced += 1;
                Ok(Some((self.emit)(value.clone()).with_span(node.span())))
            }
            None => Ok(Some(node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_keeps_value_types() {
        let mut table = toml::Table::new();
        table.insert("VERSION".to_string(), toml::Value::from("1.2"));
        table.insert("RETRIES".to_string(), toml::Value::from(3));
        table.insert("VERBOSE".to_string(), toml::Value::from(false));
        let config = EditorConfig::new("inline", InlineConstants::KIND).with_option("values", table);

        let editor = InlineConstants::from_config(&config).unwrap();
        assert_eq!(editor.values.get("VERSION"), Some(&Value::string("1.2")));
        assert_eq!(editor.values.get("RETRIES"), Some(&Value::Int(3)));
        assert_eq!(editor.values.get("VERBOSE"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_bound_identifiers_are_left_alone() {
        let values = IndexMap::from([("X".to_string(), Value::Int(1))]);
        let mut inliner = Inliner {
            values: &values,
            emit: std::rc::Rc::new(|v: Value| SyntaxNode::literal(v.to_string())),
            replaced: 0,
        };
        let mut cx = PassContext::new(crate::CancellationToken::new());

        let bound = SyntaxNode::identifier("X").with_symbol(graft_syntax::SymbolId(4));
        assert_eq!(
            inliner.rewrite(bound.clone(), &mut cx).unwrap(),
            Some(bound)
        );
        let free = SyntaxNode::identifier("X");
        assert_eq!(
            inliner.rewrite(free, &mut cx).unwrap(),
            Some(SyntaxNode::literal("1"))
        );
        assert_eq!(
            inliner.rewrite(SyntaxNode::identifier("Y"), &mut cx).unwrap(),
            Some(SyntaxNode::identifier("Y"))
        );
        assert_eq!(inliner.replaced, 1);
    }
}
