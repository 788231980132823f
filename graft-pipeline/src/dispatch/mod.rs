//! Single-pass, multi-rewriter tree dispatch.
//!
//! The [`Dispatcher`] walks a syntax tree once, pre-order. At every node it
//! runs the rewriters registered for the node's [`NodeClass`] left to right,
//! each one receiving the previous one's output, and only then descends into
//! the children of the result. When a rewrite changes the node's class, the
//! rewriters still to come are those registered for the new class. No matter how many rewriters take part, every
//! node is entered at most once.

mod pass;
mod rewriter;

use graft_syntax::{Compilation, NodeClass, SyntaxNode, SyntaxTree};
use indexmap::IndexMap;
pub use pass::{PassContext, PassStats};
pub use rewriter::Rewriter;

use crate::CancellationToken;

/// Result of dispatching over one tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// The rewritten tree, with the original path and options.
    Tree(SyntaxTree),
    /// The root itself was removed.
    Removed,
}

/// Runs a set of rewriters over trees in a single pass per tree.
pub struct Dispatcher<'r> {
    rewriters: Vec<&'r mut dyn Rewriter>,
    table: IndexMap<NodeClass, Vec<usize>>,
    stats: PassStats,
}

impl<'r> Dispatcher<'r> {
    /// Keep the rewriters that rewrite trees, ordered by priority, and index
    /// them by the classes they visit.
    pub fn new(rewriters: impl IntoIterator<Item = &'r mut dyn Rewriter>) -> Self {
        let mut rewriters: Vec<&'r mut dyn Rewriter> =
            rewriters.into_iter().filter(|r| r.rewrites_tree()).collect();
        rewriters.sort_by_key(|r| r.priority());

        let mut table: IndexMap<NodeClass, Vec<usize>> = IndexMap::new();
        for (index, rewriter) in rewriters.iter().enumerate() {
            for class in rewriter.visits() {
                let entry = table.entry(*class).or_default();
                if !entry.contains(&index) {
                    entry.push(index);
                }
            }
        }

        Self {
            rewriters,
            table,
            stats: PassStats::default(),
        }
    }

    /// Returns true if no rewriter takes part.
    pub fn is_empty(&self) -> bool {
        self.rewriters.is_empty()
    }

    /// Names of the participating rewriters, in run order.
    pub fn names(&self) -> Vec<&str> {
        self.rewriters.iter().map(|r| r.name()).collect()
    }

    /// Counters accumulated over every pass of this dispatcher.
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// Run one pass over `tree`.
    ///
    /// # Errors
    ///
    /// Fails with the first rewriter error, or with [`Cancelled`] when the
    /// token is cancelled between two nodes.
    ///
    /// [`Cancelled`]: crate::Cancelled
    pub fn dispatch(
        &mut self,
        tree: &SyntaxTree,
        cancel: &CancellationToken,
    ) -> eyre::Result<Dispatched> {
        let span = tracing::debug_span!("graft.dispatch", tree = tree.path());
        let _enter = span.enter();

        let mut cx = PassContext::new(cancel.clone());
        let root = self.visit(tree.root().clone(), &mut cx)?;
        let stats = cx.stats();
        self.accumulate(stats);
        tracing::debug!(
            visited = stats.visited,
            rewritten = stats.rewritten,
            removed = stats.removed,
            "pass complete"
        );

        Ok(match root {
            Some(root) => Dispatched::Tree(tree.with_root(root)),
            None => Dispatched::Removed,
        })
    }

    /// Dispatch over every tree of `compilation`. Trees whose root was
    /// removed are dropped from the result.
    pub fn rewrite_compilation(
        &mut self,
        compilation: &Compilation,
        cancel: &CancellationToken,
    ) -> eyre::Result<Compilation> {
        let mut trees = Vec::with_capacity(compilation.trees().len());
        for tree in compilation.trees() {
            match self.dispatch(tree, cancel)? {
                Dispatched::Tree(tree) => trees.push(tree),
                Dispatched::Removed => {
                    tracing::debug!(tree = tree.path(), "tree removed");
                }
            }
        }
        Ok(compilation.with_trees(trees))
    }

    fn visit(&mut self, node: SyntaxNode, cx: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
        cx.cancellation().check()?;
        cx.stats.visited += 1;

        // The next rewriter is looked up by the class of the current node, so
        // a rewrite that changes the class hands the node to the rewriters
        // of its new class. Each rewriter still runs at most once per node.
        let mut current = node;
        let mut last: Option<usize> = None;
        while let Some(index) = self.table.get(&current.class_of()).and_then(|indices| {
            indices
                .iter()
                .copied()
                .find(|&i| last.is_none_or(|last| i > last))
        }) {
            last = Some(index);
            let rewriter = &mut self.rewriters[index];
            match rewriter.rewrite(current, cx)? {
                Some(next) => {
                    cx.stats.rewritten += 1;
                    current = next;
                }
                None => {
                    tracing::trace!(rewriter = rewriter.name(), "node removed");
                    cx.stats.removed += 1;
                    return Ok(None);
                }
            }
        }

        let is_type = current.class_of() == NodeClass::Type;
        let (shell, children) = current.split_children();
        let before = children.len();

        if is_type {
            cx.enter_type();
        }
        let mut kept = Vec::with_capacity(before);
        for child in children {
            if let Some(child) = self.visit(child, cx)? {
                kept.push(child);
            }
        }
        let lost_children = kept.len() < before;
        if is_type {
            kept.extend(cx.exit_type());
        }

        if lost_children && kept.len() < shell.kind().min_children() {
            cx.stats.removed += 1;
            return Ok(None);
        }
        Ok(Some(shell.with_children(kept)))
    }

    fn accumulate(&mut self, pass: PassStats) {
        self.stats.visited += pass.visited;
        self.stats.rewritten += pass.rewritten;
        self.stats.removed += pass.removed;
        self.stats.injected += pass.injected;
    }
}

#[cfg(test)]
mod tests {
    use graft_syntax::{ParseOptions, SyntaxKind};

    use super::*;
    use crate::Cancelled;

    /// Counts the nodes it sees and changes nothing.
    struct Counter {
        name: &'static str,
        seen: usize,
    }

    impl Rewriter for Counter {
        fn name(&self) -> &str {
            self.name
        }

        fn visits(&self) -> &[NodeClass] {
            &NodeClass::ALL
        }

        fn rewrite(&mut self, node: SyntaxNode, _: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
            self.seen += 1;
            Ok(Some(node))
        }
    }

    /// Removes expression statements calling the identifier `target`.
    struct DropCalls {
        target: &'static str,
    }

    impl Rewriter for DropCalls {
        fn name(&self) -> &str {
            "drop-calls"
        }

        fn visits(&self) -> &[NodeClass] {
            &[NodeClass::Statement]
        }

        fn rewrite(&mut self, node: SyntaxNode, _: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
            let calls_target = node.kind() == SyntaxKind::ExpressionStatement
                && node
                    .children()
                    .first()
                    .and_then(|e| e.children().first())
                    .is_some_and(|callee| callee.text() == self.target);
            Ok((!calls_target).then_some(node))
        }
    }

    /// Appends a text suffix to identifiers, recording its turn.
    struct Suffix {
        suffix: &'static str,
        priority: i32,
    }

    impl Rewriter for Suffix {
        fn name(&self) -> &str {
            self.suffix
        }

        fn visits(&self) -> &[NodeClass] {
            &[NodeClass::Expression]
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn rewrite(&mut self, node: SyntaxNode, _: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
            if node.kind() != SyntaxKind::Identifier {
                return Ok(Some(node));
            }
            let text = format!("{}{}", node.text(), self.suffix);
            Ok(Some(node.with_text(text)))
        }
    }

    fn call(name: &str) -> SyntaxNode {
        SyntaxNode::expression_statement(SyntaxNode::invocation(
            SyntaxNode::identifier(name),
            vec![SyntaxNode::literal("1")],
        ))
    }

    fn sample_tree() -> SyntaxTree {
        let root = SyntaxNode::compilation_unit(vec![SyntaxNode::class(
            "Program",
            vec![SyntaxNode::method(
                "Main",
                vec![SyntaxNode::parameter("args")],
                vec![call("Log"), call("Run")],
            )],
        )]);
        SyntaxTree::new("Program.cs", root).with_options(ParseOptions::default().with_defines(["DEBUG"]))
    }

    #[test]
    fn test_single_pass_visits_every_node_once() {
        let tree = sample_tree();
        let total = tree.root().node_count();
        let mut a = Counter { name: "a", seen: 0 };
        let mut b = Counter { name: "b", seen: 0 };
        let mut c = Counter { name: "c", seen: 0 };

        let mut dispatcher = Dispatcher::new([
            &mut a as &mut dyn Rewriter,
            &mut b as &mut dyn Rewriter,
            &mut c as &mut dyn Rewriter,
        ]);
        let result = dispatcher.dispatch(&tree, &CancellationToken::new()).unwrap();

        assert_eq!(dispatcher.stats().visited, total);
        assert_eq!(result, Dispatched::Tree(tree.clone()));
        drop(dispatcher);
        assert_eq!((a.seen, b.seen, c.seen), (total, total, total));
    }

    #[test]
    fn test_removes_single_statement() {
        let tree = sample_tree();
        let mut drop_log = DropCalls { target: "Log" };
        let mut dispatcher = Dispatcher::new([&mut drop_log as &mut dyn Rewriter]);

        let Dispatched::Tree(rewritten) = dispatcher.dispatch(&tree, &CancellationToken::new()).unwrap() else {
            panic!("root should survive");
        };

        let statements: Vec<&SyntaxNode> = rewritten
            .root()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::ExpressionStatement)
            .collect();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0], &call("Run"));
        assert_eq!(rewritten.path(), "Program.cs");
        assert!(rewritten.options().is_defined("DEBUG"));
        assert_eq!(dispatcher.stats().removed, 1);
    }

    #[test]
    fn test_rewriters_accumulate_by_priority() {
        let tree = SyntaxTree::new("x.cs", SyntaxNode::identifier("x"));
        let mut late = Suffix { suffix: "_late", priority: 10 };
        let mut early = Suffix { suffix: "_early", priority: -1 };
        let mut dispatcher = Dispatcher::new([
            &mut late as &mut dyn Rewriter,
            &mut early as &mut dyn Rewriter,
        ]);
        assert_eq!(dispatcher.names(), vec!["_early", "_late"]);

        let Dispatched::Tree(rewritten) = dispatcher.dispatch(&tree, &CancellationToken::new()).unwrap() else {
            panic!("root should survive");
        };
        assert_eq!(rewritten.root().text(), "x_early_late");
    }

    #[test]
    fn test_class_change_hands_node_to_new_class() {
        /// Replaces an expression statement with its expression.
        struct Unwrap;

        impl Rewriter for Unwrap {
            fn name(&self) -> &str {
                "unwrap"
            }

            fn visits(&self) -> &[NodeClass] {
                &[NodeClass::Statement]
            }

            fn rewrite(&mut self, node: SyntaxNode, _: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
                Ok(node.children().first().cloned())
            }
        }

        /// Records the kinds of the expressions it sees.
        #[derive(Default)]
        struct Kinds(Vec<SyntaxKind>);

        impl Rewriter for Kinds {
            fn name(&self) -> &str {
                "kinds"
            }

            fn visits(&self) -> &[NodeClass] {
                &[NodeClass::Expression]
            }

            fn priority(&self) -> i32 {
                1
            }

            fn rewrite(&mut self, node: SyntaxNode, _: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
                self.0.push(node.kind());
                Ok(Some(node))
            }
        }

        let tree = SyntaxTree::new("s.cs", call("Log"));
        let mut unwrap = Unwrap;
        let mut kinds = Kinds::default();
        let mut dispatcher = Dispatcher::new([
            &mut unwrap as &mut dyn Rewriter,
            &mut kinds as &mut dyn Rewriter,
        ]);
        let Dispatched::Tree(rewritten) = dispatcher.dispatch(&tree, &CancellationToken::new()).unwrap() else {
            panic!("root should survive");
        };
        drop(dispatcher);

        assert_eq!(rewritten.root().kind(), SyntaxKind::Invocation);
        assert_eq!(kinds.0.first(), Some(&SyntaxKind::Invocation));
        assert_eq!(
            kinds.0.iter().filter(|k| **k == SyntaxKind::Invocation).count(),
            1
        );
    }

    #[test]
    fn test_inactive_rewriters_are_skipped() {
        struct Passive;

        impl Rewriter for Passive {
            fn name(&self) -> &str {
                "passive"
            }

            fn visits(&self) -> &[NodeClass] {
                &NodeClass::ALL
            }

            fn rewrites_tree(&self) -> bool {
                false
            }

            fn rewrite(&mut self, _: SyntaxNode, _: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
                Ok(None)
            }
        }

        let mut passive = Passive;
        let dispatcher = Dispatcher::new([&mut passive as &mut dyn Rewriter]);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_removing_the_root() {
        let tree = SyntaxTree::new("s.cs", call("Log"));
        let mut drop_log = DropCalls { target: "Log" };
        let mut dispatcher = Dispatcher::new([&mut drop_log as &mut dyn Rewriter]);
        let result = dispatcher.dispatch(&tree, &CancellationToken::new()).unwrap();
        assert_eq!(result, Dispatched::Removed);
    }

    #[test]
    fn test_lost_required_child_removes_parent() {
        /// Removes every literal.
        struct DropLiterals;

        impl Rewriter for DropLiterals {
            fn name(&self) -> &str {
                "drop-literals"
            }

            fn visits(&self) -> &[NodeClass] {
                &[NodeClass::Expression]
            }

            fn rewrite(&mut self, node: SyntaxNode, _: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
                Ok((node.kind() != SyntaxKind::Literal).then_some(node))
            }
        }

        // The argument loses its only child and goes too; the argument list
        // may be empty, so the call itself survives.
        let tree = SyntaxTree::new("s.cs", call("Log"));
        let mut rewriter = DropLiterals;
        let mut dispatcher = Dispatcher::new([&mut rewriter as &mut dyn Rewriter]);
        let Dispatched::Tree(rewritten) = dispatcher.dispatch(&tree, &CancellationToken::new()).unwrap() else {
            panic!("statement should survive");
        };

        let expected = SyntaxNode::expression_statement(SyntaxNode::invocation(
            SyntaxNode::identifier("Log"),
            Vec::new(),
        ));
        assert_eq!(rewritten.root(), &expected);
        assert_eq!(dispatcher.stats().removed, 2);
    }

    #[test]
    fn test_injected_members_are_appended_to_the_enclosing_type() {
        /// Adds a field next to every method it sees.
        struct AddBackingField;

        impl Rewriter for AddBackingField {
            fn name(&self) -> &str {
                "backing-field"
            }

            fn visits(&self) -> &[NodeClass] {
                &[NodeClass::Method, NodeClass::Field]
            }

            fn rewrite(&mut self, node: SyntaxNode, cx: &mut PassContext) -> eyre::Result<Option<SyntaxNode>> {
                if node.kind() == SyntaxKind::Method {
                    let field = SyntaxNode::token(SyntaxKind::Field, format!("_{}", node.text()));
                    assert!(cx.inject_member(field));
                }
                Ok(Some(node))
            }
        }

        let tree = sample_tree();
        let mut rewriter = AddBackingField;
        let mut dispatcher = Dispatcher::new([&mut rewriter as &mut dyn Rewriter]);
        let Dispatched::Tree(rewritten) = dispatcher.dispatch(&tree, &CancellationToken::new()).unwrap() else {
            panic!("root should survive");
        };

        let class = &rewritten.root().children()[0];
        let members: Vec<(SyntaxKind, &str)> = class
            .children()
            .iter()
            .map(|m| (m.kind(), m.text()))
            .collect();
        assert_eq!(
            members,
            vec![(SyntaxKind::Method, "Main"), (SyntaxKind::Field, "_Main")]
        );
        assert_eq!(dispatcher.stats().injected, 1);
        assert_eq!(dispatcher.stats().visited, tree.root().node_count());
    }

    #[test]
    fn test_injection_outside_a_type_is_refused() {
        let mut cx = PassContext::new(CancellationToken::new());
        assert!(!cx.inject_member(SyntaxNode::identifier("x")));
        assert_eq!(cx.type_depth(), 0);
    }

    #[test]
    fn test_cancelled_pass() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut counter = Counter { name: "a", seen: 0 };
        let mut dispatcher = Dispatcher::new([&mut counter as &mut dyn Rewriter]);

        let err = dispatcher.dispatch(&sample_tree(), &cancel).unwrap_err();
        assert!(err.downcast_ref::<Cancelled>().is_some());
        drop(dispatcher);
        assert_eq!(counter.seen, 0);
    }

    #[test]
    fn test_rewrite_compilation_drops_removed_trees() {
        let compilation = Compilation::default()
            .add_tree(SyntaxTree::new("a.cs", call("Log")))
            .and_then(|c| c.add_tree(sample_tree()))
            .unwrap();
        let mut drop_log = DropCalls { target: "Log" };
        let mut dispatcher = Dispatcher::new([&mut drop_log as &mut dyn Rewriter]);

        let rewritten = dispatcher
            .rewrite_compilation(&compilation, &CancellationToken::new())
            .unwrap();
        let paths: Vec<&str> = rewritten.trees().iter().map(|t| t.path()).collect();
        assert_eq!(paths, vec!["Program.cs"]);
    }
}
