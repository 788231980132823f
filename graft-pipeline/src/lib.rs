//! Compile-time edit pipeline.
//!
//! Independent *editors* transform a [`Compilation`] snapshot during
//! compilation. The [`Engine`] orders them, checks their feature
//! requirements, and applies the edits they register phase by phase:
//!
//! ```text
//! Start → Syntax → Semantic → Emit → End
//! ```
//!
//! Edits can build on each other through [`Chain`]-based extension points,
//! rewrite trees with a single-pass [`Dispatcher`](dispatch::Dispatcher), and
//! run `[Invoke]` methods through the [`SymbolInvoker`](invoke::SymbolInvoker).
//! Everything they report flows through one [`DiagnosticChannel`].
//!
//! [`Compilation`]: graft_syntax::Compilation

mod cancel;
mod channel;
mod combinator;
mod context;
mod diagnostic;
pub mod dispatch;
mod editor;
pub mod editors;
mod engine;
mod extension;
pub mod invoke;
mod phase;

pub use cancel::{CancellationToken, Cancelled};
pub use channel::{AuditEntry, DiagnosticChannel, SuppressionPredicate};
pub use combinator::{Chain, Link, Wrapper};
pub use context::{EditContext, EditFn, InitContext, RegistrationError};
pub use diagnostic::{Diagnostic, DiagnosticSink, Severity, codes};
pub use editor::{Editor, Feature};
pub use engine::{Engine, Plan, PlannedEditor, RunOutcome, RunStatus};
pub use extension::{EMIT_CONSTANT, ExtensionError, ExtensionPoint, ExtensionPoints};
pub use phase::{Phase, PhaseInfo};

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
