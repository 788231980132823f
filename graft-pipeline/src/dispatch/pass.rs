//! Per-pass state.

use graft_syntax::SyntaxNode;
use serde::Serialize;

use crate::CancellationToken;

/// Counters for one or more dispatch passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Nodes entered.
    pub visited: usize,
    /// Rewriter calls that kept their node.
    pub rewritten: usize,
    /// Nodes removed, by a rewriter or because they lost required children.
    pub removed: usize,
    /// Members injected into type declarations.
    pub injected: usize,
}

/// State shared by all rewriters during one pass.
pub struct PassContext {
    cancel: CancellationToken,
    pub(crate) stats: PassStats,
    frames: Vec<Vec<SyntaxNode>>,
}

impl PassContext {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            stats: PassStats::default(),
            frames: Vec::new(),
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Counters of the pass so far.
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// Append `member` to the nearest type declaration enclosing the node
    /// being rewritten, after its existing members.
    ///
    /// Injected members are not visited by this pass. Returns `false` when
    /// no type declaration encloses the node.
    pub fn inject_member(&mut self, member: SyntaxNode) -> bool {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.push(member);
                self.stats.injected += 1;
                true
            }
            None => false,
        }
    }

    /// Depth of enclosing type declarations.
    pub fn type_depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn enter_type(&mut self) {
        self.frames.push(Vec::new());
    }

    pub(crate) fn exit_type(&mut self) -> Vec<SyntaxNode> {
        self.frames.pop().unwrap_or_default()
    }
}
