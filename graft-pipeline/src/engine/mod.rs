//! Pipeline orchestrator.

mod plan;

use std::panic::{AssertUnwindSafe, catch_unwind};

use graft_syntax::Compilation;
pub use plan::{Plan, PlannedEditor};
use serde::Serialize;

use crate::{
    AuditEntry, CancellationToken, Cancelled, Diagnostic, Editor, Feature, InitContext, Phase,
    RegistrationError, codes,
    context::{EditContext, RunState},
    panic_message,
};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// `End` was reached with no unsuppressed error.
    Succeeded,
    /// Configuration was rejected, or unsuppressed errors remained at `End`.
    Failed,
    /// The cancellation token was triggered.
    Cancelled,
}

/// Everything a run produces.
#[derive(Debug)]
pub struct RunOutcome {
    /// The final snapshot; on cancellation, the last committed one. `None`
    /// when configuration was rejected.
    pub compilation: Option<Compilation>,
    /// Unsuppressed diagnostics, most severe first.
    pub diagnostics: Vec<Diagnostic>,
    /// Every diagnostic reported during the run.
    pub audit: Vec<AuditEntry>,
    pub status: RunStatus,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity.is_error())
    }
}

/// Disposes initialized editors in reverse initialization order when
/// dropped, whichever way the run exits.
#[derive(Default)]
struct Lifecycle {
    initialized: Vec<Box<dyn Editor>>,
}

impl Lifecycle {
    fn push(&mut self, editor: Box<dyn Editor>) {
        self.initialized.push(editor);
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        while let Some(mut editor) = self.initialized.pop() {
            tracing::debug!(editor = editor.name(), "disposing");
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| editor.dispose())) {
                tracing::warn!(
                    editor = editor.name(),
                    reason = %panic_message(payload.as_ref()),
                    "editor panicked while disposing"
                );
            }
        }
    }
}

/// The edit pipeline.
///
/// The engine orders and deduplicates editors, checks their feature
/// requirements, initializes them at [`Phase::Start`], then applies the
/// registered edits phase by phase, committing one snapshot per phase.
///
/// # Example
///
/// ```ignore
/// let outcome = Engine::new()
///     .host_feature(Feature::EXTENDED_SYMBOL_INFO)
///     .editor(MyEditor::new())
///     .run(compilation);
///
/// for diagnostic in &outcome.diagnostics {
///     eprintln!("{}", diagnostic);
/// }
/// ```
#[derive(Default)]
pub struct Engine {
    editors: Vec<Box<dyn Editor>>,
    host_features: Vec<Feature>,
    fail_on_warnings: bool,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an editor. Declaration order breaks ties between equal orders.
    pub fn editor(mut self, editor: impl Editor + 'static) -> Self {
        self.editors.push(Box::new(editor));
        self
    }

    pub fn editors(mut self, editors: impl IntoIterator<Item = Box<dyn Editor>>) -> Self {
        self.editors.extend(editors);
        self
    }

    /// Declare a feature the host offers.
    pub fn host_feature(mut self, feature: impl Into<Feature>) -> Self {
        self.host_features.push(feature.into());
        self
    }

    pub fn host_features<F: Into<Feature>>(mut self, features: impl IntoIterator<Item = F>) -> Self {
        self.host_features.extend(features.into_iter().map(Into::into));
        self
    }

    /// Treat unsuppressed warnings at `End` as a failed run.
    pub fn fail_on_warnings(mut self, fail: bool) -> Self {
        self.fail_on_warnings = fail;
        self
    }

    /// Use `token` to cancel the run from elsewhere.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Resolve order, duplicates and dependencies without running anything.
    pub fn plan(&self) -> Plan {
        Plan::resolve(&self.editors, &self.host_features)
    }

    /// Run every editor over `initial`.
    ///
    /// Never fails: configuration problems, failed edits and failed
    /// compile-time routines are all reported in [`RunOutcome::diagnostics`].
    pub fn run(self, initial: Compilation) -> RunOutcome {
        let span = tracing::info_span!("graft.run", editors = self.editors.len());
        let _enter = span.enter();

        let plan = self.plan();
        let Engine {
            editors,
            fail_on_warnings,
            cancel,
            ..
        } = self;

        let mut state = RunState::new(cancel);
        for diagnostic in plan.diagnostics() {
            state.channel.report(diagnostic.clone());
        }
        if !plan.is_viable() {
            tracing::warn!("configuration rejected, no edit will run");
            return finish(state, None, RunStatus::Failed, fail_on_warnings);
        }

        let mut slots: Vec<Option<Box<dyn Editor>>> = editors.into_iter().map(Some).collect();
        let ordered: Vec<Box<dyn Editor>> = plan
            .editors
            .iter()
            .filter_map(|planned| slots.get_mut(planned.declared).and_then(Option::take))
            .collect();

        // Declared before any edit runs so that editors are disposed on every
        // exit path below, including unwinding.
        let mut lifecycle = Lifecycle::default();

        for (rank, mut editor) in ordered.into_iter().enumerate() {
            if state.cancel.is_cancelled() {
                return finish(state, Some(initial), RunStatus::Cancelled, fail_on_warnings);
            }
            let name = editor.name().to_string();
            let result = catch_unwind(AssertUnwindSafe(|| {
                editor.initialize(&mut InitContext::new(&mut state, &name, rank))
            }));
            let reason = match result {
                Ok(Ok(())) => {
                    tracing::debug!(editor = %name, "initialized");
                    lifecycle.push(editor);
                    continue;
                }
                Ok(Err(err)) if err.downcast_ref::<Cancelled>().is_some() => {
                    return finish(state, Some(initial), RunStatus::Cancelled, fail_on_warnings);
                }
                Ok(Err(err)) => format!("{:#}", err),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };
            tracing::warn!(editor = %name, %reason, "initialization failed");
            state.channel.report(
                Diagnostic::error(format!("editor '{}' failed to initialize: {}", name, reason))
                    .with_code(codes::MALFORMED_REGISTRATION)
                    .in_phase(Phase::Start)
                    .from_editor(name),
            );
            return finish(state, None, RunStatus::Failed, fail_on_warnings);
        }

        let mut committed = initial;
        for phase in Phase::ALL {
            let phase_span = tracing::debug_span!("graft.phase", %phase);
            let _enter = phase_span.enter();

            let mut working = committed.clone();
            for mut edit in state.queue.take(phase) {
                if state.cancel.is_cancelled() {
                    tracing::debug!("cancelled, keeping last committed snapshot");
                    return finish(state, Some(committed), RunStatus::Cancelled, fail_on_warnings);
                }

                // Follow-ups and suppressions of the edit are staged in its
                // context and dropped with it unless the edit succeeds.
                let result = catch_unwind(AssertUnwindSafe(|| {
                    let mut ctx = EditContext::new(&mut state, &edit.editor, edit.rank, phase);
                    let next = (edit.run)(&working, &mut ctx);
                    (next, ctx.into_staged())
                }));
                let diagnostic = match result {
                    Ok((Ok(next), staged)) => {
                        tracing::debug!(editor = %edit.editor, "edit applied");
                        staged.apply(&mut state);
                        working = next;
                        continue;
                    }
                    Ok((Err(err), _)) if err.downcast_ref::<Cancelled>().is_some() => {
                        tracing::debug!("cancelled, keeping last committed snapshot");
                        return finish(state, Some(committed), RunStatus::Cancelled, fail_on_warnings);
                    }
                    Ok((Err(err), _)) if err.downcast_ref::<RegistrationError>().is_some() => {
                        Diagnostic::error(format!("malformed registration: {:#}", err))
                            .with_code(codes::MALFORMED_REGISTRATION)
                    }
                    Ok((Err(err), _)) => Diagnostic::error(format!("edit failed: {:#}", err))
                        .with_code(codes::EDIT_FAILURE),
                    Err(payload) => Diagnostic::error(format!(
                        "edit panicked: {}",
                        panic_message(payload.as_ref())
                    ))
                    .with_code(codes::EDIT_FAILURE),
                };
                tracing::warn!(editor = %edit.editor, message = %diagnostic.message, "edit discarded");
                state
                    .channel
                    .report(diagnostic.in_phase(phase).from_editor(edit.editor.as_str()));
            }

            committed = working;
            tracing::debug!("phase committed");
        }

        drop(lifecycle);
        finish(state, Some(committed), RunStatus::Succeeded, fail_on_warnings)
    }
}

/// Drain the channel and settle the final status.
fn finish(
    mut state: RunState,
    compilation: Option<Compilation>,
    status: RunStatus,
    fail_on_warnings: bool,
) -> RunOutcome {
    let blocked = state.channel.has_errors() || (fail_on_warnings && state.channel.has_warnings());
    let status = match status {
        RunStatus::Succeeded if blocked => RunStatus::Failed,
        other => other,
    };
    let diagnostics = state.channel.drain();
    tracing::info!(?status, diagnostics = diagnostics.len(), "run finished");

    RunOutcome {
        compilation,
        diagnostics,
        audit: state.channel.into_audit(),
        status,
    }
}
