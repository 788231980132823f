//! Shared fixtures for the pipeline tests.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use graft_pipeline::{Editor, Feature, InitContext};
use graft_syntax::{
    Attribute, Compilation, Location, Span, Symbol, SymbolId, SyntaxKind, SyntaxNode, SyntaxTree,
};

/// Shared event log for editors under test.
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// `class Program { void Main(string[] args) { <statements> } }`.
pub fn program(statements: Vec<SyntaxNode>) -> SyntaxTree {
    SyntaxTree::new(
        "Program.cs",
        SyntaxNode::compilation_unit(vec![SyntaxNode::class(
            "Program",
            vec![SyntaxNode::method(
                "Main",
                vec![SyntaxNode::parameter("args")],
                statements,
            )],
        )]),
    )
}

/// `name("…");` with the callee bound to `symbol`.
pub fn call(name: &str, symbol: SymbolId) -> SyntaxNode {
    SyntaxNode::expression_statement(SyntaxNode::invocation(
        SyntaxNode::identifier(name).with_symbol(symbol),
        vec![SyntaxNode::literal("\"…\"")],
    ))
}

pub fn compilation(trees: Vec<SyntaxTree>, symbols: Vec<Symbol>) -> Compilation {
    Compilation::default()
        .with_trees(trees)
        .with_symbols(symbols.into())
}

/// Expression statements of every tree, in tree order.
pub fn statements(compilation: &Compilation) -> Vec<SyntaxNode> {
    compilation
        .trees()
        .iter()
        .flat_map(|tree| tree.root().descendants())
        .filter(|node| node.kind() == SyntaxKind::ExpressionStatement)
        .cloned()
        .collect()
}

/// A static method of type `Build` (#1) marked for compile-time invocation.
pub fn invoke_target(id: u32, name: &str) -> Symbol {
    Symbol::method(id, name)
        .in_container(SymbolId(1))
        .with_static(true)
        .with_attribute(Attribute::new(graft_pipeline::invoke::INVOKE_ATTRIBUTE))
        .at(location(id))
}

pub fn location(id: u32) -> Location {
    let start = id as usize * 100;
    Location::new("Build.cs", Span::new(start, start + 10))
}

type InitFn = Box<dyn FnMut(&mut InitContext<'_>) -> eyre::Result<()>>;

/// An editor whose initialization is a closure. Logs `init <name>` and
/// `dispose <name>`.
pub struct Scripted {
    name: String,
    order: i32,
    requires: Vec<Feature>,
    provides: Vec<Feature>,
    init: InitFn,
    log: Log,
}

impl Scripted {
    pub fn new(
        name: &str,
        log: &Log,
        init: impl FnMut(&mut InitContext<'_>) -> eyre::Result<()> + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            order: 0,
            requires: Vec::new(),
            provides: Vec::new(),
            init: Box::new(init),
            log: Rc::clone(log),
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn requiring(mut self, feature: &str) -> Self {
        self.requires.push(Feature::new(feature));
        self
    }

    pub fn providing(mut self, feature: &str) -> Self {
        self.provides.push(Feature::new(feature));
        self
    }
}

impl Editor for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn requires(&self) -> Vec<Feature> {
        self.requires.clone()
    }

    fn provides(&self) -> Vec<Feature> {
        self.provides.clone()
    }

    fn initialize(&mut self, ctx: &mut InitContext<'_>) -> eyre::Result<()> {
        self.log.borrow_mut().push(format!("init {}", self.name));
        (self.init)(ctx)
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push(format!("dispose {}", self.name));
    }
}
