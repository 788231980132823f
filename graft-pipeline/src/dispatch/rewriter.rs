//! The rewriter trait.

use graft_syntax::{NodeClass, SyntaxNode};

use super::PassContext;

/// A per-node transform run by the [`Dispatcher`](super::Dispatcher).
///
/// A rewriter declares the node classes it visits; the dispatcher calls it
/// only for nodes of those classes. Returning `Ok(None)` removes the node
/// together with its subtree.
pub trait Rewriter {
    /// The name of this rewriter (for logging).
    fn name(&self) -> &str;

    /// Node classes this rewriter wants to see.
    ///
    /// Matched against the node as earlier rewriters left it, so a node whose
    /// class was changed reaches the rewriters of its new class.
    fn visits(&self) -> &[NodeClass];

    /// Rewriters returning `false` are left out of the pass.
    fn rewrites_tree(&self) -> bool {
        true
    }

    /// Lower runs first among rewriters of one pass. Ties keep the order the
    /// rewriters were handed to the dispatcher.
    fn priority(&self) -> i32 {
        0
    }

    /// Rewrite one node.
    ///
    /// Children have not been visited yet; whatever children the returned
    /// node has are visited next.
    fn rewrite(
        &mut self,
        node: SyntaxNode,
        cx: &mut PassContext,
    ) -> eyre::Result<Option<SyntaxNode>>;
}
