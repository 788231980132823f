//! Cooperative cancellation.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

/// Returned (or propagated through `eyre`) when a run was cancelled.
///
/// The engine recognizes it in edit results and stops without reporting an
/// error diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the run was cancelled")]
pub struct Cancelled;

/// A shared flag checked between editors, edits, dispatched nodes and
/// invoked symbols.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone of this token observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
