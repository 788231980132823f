//! Compile-time invocation of attributed methods.
//!
//! Methods annotated with [`INVOKE_ATTRIBUTE`] are run during compilation
//! through a [`NativeRegistry`] supplied by the host. Every problem with a
//! target (wrong shape, missing routine, failing routine) becomes a
//! diagnostic at the symbol's location and the walk continues.

mod binding;
mod native;

use std::{
    collections::HashSet,
    panic::{AssertUnwindSafe, catch_unwind},
};

pub use binding::{Argument, ArgumentKind, bind};
use graft_syntax::{Symbol, SymbolId, SymbolKind, SymbolTable};
pub use native::{NativeRegistry, NativeRoutine};
use serde::Serialize;

use crate::{CancellationToken, Cancelled, Diagnostic, DiagnosticSink, codes, panic_message};

/// Name of the attribute marking a method for compile-time execution.
pub const INVOKE_ATTRIBUTE: &str = "Invoke";

/// Counts from one invoker walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvokeSummary {
    /// Routines that ran to completion.
    pub invoked: usize,
    /// Routines that returned an error or panicked.
    pub failed: usize,
    /// Targets rejected before running (invalid shape, no native routine).
    pub rejected: usize,
    /// Targets already attempted earlier in the run.
    pub skipped: usize,
}

/// Walks a symbol table and runs every `Invoke` target once per run.
#[derive(Debug, Default)]
pub struct SymbolInvoker {
    attempted: HashSet<SymbolId>,
}

impl SymbolInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `symbol` was already attempted by this invoker.
    pub fn has_attempted(&self, symbol: SymbolId) -> bool {
        self.attempted.contains(&symbol)
    }

    /// Invoke every target in `symbols`, in table order.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] as soon as cancellation is observed between
    /// two symbols.
    pub fn invoke(
        &mut self,
        symbols: &SymbolTable,
        natives: &NativeRegistry,
        sink: &mut dyn DiagnosticSink,
        cancel: &CancellationToken,
    ) -> Result<InvokeSummary, Cancelled> {
        let mut summary = InvokeSummary::default();

        for symbol in symbols.with_attribute(INVOKE_ATTRIBUTE) {
            cancel.check()?;

            if !self.attempted.insert(symbol.id) {
                summary.skipped += 1;
                continue;
            }

            if !validate(symbol, symbols, sink) {
                summary.rejected += 1;
                continue;
            }

            let name = symbols.qualified_name(symbol);
            let Some(routine) = natives.get(&name) else {
                sink.report(
                    target_diagnostic(
                        symbol,
                        Diagnostic::error(format!("no native routine is bound to '{}'", name)),
                    )
                    .with_code(codes::MISSING_NATIVE),
                );
                summary.rejected += 1;
                continue;
            };

            let arguments = bind(symbol, symbols);
            tracing::debug!(target = %name, arguments = arguments.len(), "invoking");

            let failure = match catch_unwind(AssertUnwindSafe(|| routine(&arguments))) {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(format!("{:#}", err)),
                Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
            };

            match failure {
                None => summary.invoked += 1,
                Some(reason) => {
                    tracing::warn!(target = %name, %reason, "compile-time routine failed");
                    sink.report(
                        target_diagnostic(
                            symbol,
                            Diagnostic::error(format!("'{}' failed: {}", name, reason)),
                        )
                        .with_code(codes::INVOCATION_FAILURE),
                    );
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Check the target's shape. Errors reject the target; a non-void return
/// type is only a warning.
fn validate(symbol: &Symbol, symbols: &SymbolTable, sink: &mut dyn DiagnosticSink) -> bool {
    let name = symbols.qualified_name(symbol);
    let problem = if symbol.kind != SymbolKind::Method {
        Some("is not a method")
    } else if !symbol.is_static {
        Some("must be static")
    } else if symbol.is_abstract {
        Some("must not be abstract")
    } else {
        None
    };

    if let Some(problem) = problem {
        sink.report(
            target_diagnostic(
                symbol,
                Diagnostic::error(format!(
                    "'{}' is marked [{}] but {}",
                    name, INVOKE_ATTRIBUTE, problem
                )),
            )
            .with_code(codes::INVALID_TARGET),
        );
        return false;
    }

    if let Some(ty) = &symbol.return_type {
        sink.report(
            target_diagnostic(
                symbol,
                Diagnostic::warning(format!(
                    "the '{}' value returned by '{}' is discarded",
                    ty, name
                )),
            )
            .with_code(codes::DISCARDED_RETURN),
        );
    }

    true
}

fn target_diagnostic(symbol: &Symbol, diagnostic: Diagnostic) -> Diagnostic {
    diagnostic
        .for_symbol(symbol.id)
        .at_opt(symbol.location.clone())
}
