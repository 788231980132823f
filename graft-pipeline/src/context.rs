//! Run state and the contexts handed to editors and edits.

use std::collections::BTreeMap;

use graft_syntax::Compilation;
use thiserror::Error;

use crate::{
    CancellationToken, Cancelled, Diagnostic, DiagnosticChannel, DiagnosticSink, ExtensionPoints,
    Phase, SuppressionPredicate,
    invoke::{InvokeSummary, NativeRegistry, SymbolInvoker},
};

/// An edit: produces the next snapshot from the current one.
pub type EditFn = Box<dyn FnMut(&Compilation, &mut EditContext<'_>) -> eyre::Result<Compilation>>;

/// An edit was registered for a phase that has already started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot register an edit for phase '{requested}' while running phase '{current}'")]
pub struct RegistrationError {
    pub requested: Phase,
    pub current: Phase,
}

pub(crate) struct RegisteredEdit {
    pub(crate) editor: String,
    pub(crate) rank: usize,
    pub(crate) run: EditFn,
}

/// Edits waiting for their phase.
#[derive(Default)]
pub(crate) struct EditQueue {
    phases: BTreeMap<Phase, Vec<RegisteredEdit>>,
}

impl EditQueue {
    fn push(&mut self, phase: Phase, edit: RegisteredEdit) {
        self.phases.entry(phase).or_default().push(edit);
    }

    /// Edits of `phase` in editor order, then registration order.
    pub(crate) fn take(&mut self, phase: Phase) -> Vec<RegisteredEdit> {
        let mut edits = self.phases.remove(&phase).unwrap_or_default();
        edits.sort_by_key(|e| e.rank);
        edits
    }

    pub(crate) fn len(&self, phase: Phase) -> usize {
        self.phases.get(&phase).map_or(0, Vec::len)
    }
}

/// Everything the engine owns for the duration of one run.
pub(crate) struct RunState {
    pub(crate) channel: DiagnosticChannel,
    pub(crate) extensions: ExtensionPoints,
    pub(crate) invoker: SymbolInvoker,
    pub(crate) queue: EditQueue,
    pub(crate) cancel: CancellationToken,
}

impl RunState {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        Self {
            channel: DiagnosticChannel::new(),
            extensions: ExtensionPoints::with_defaults(),
            invoker: SymbolInvoker::new(),
            queue: EditQueue::default(),
            cancel,
        }
    }
}

/// Follow-up edits and suppression predicates of one edit call.
///
/// They take effect only once the edit has succeeded; a failed or panicking
/// edit leaves nothing behind but its diagnostics.
#[derive(Default)]
pub(crate) struct Staged {
    edits: Vec<(Phase, RegisteredEdit)>,
    predicates: Vec<SuppressionPredicate>,
}

impl Staged {
    pub(crate) fn apply(self, state: &mut RunState) {
        for (phase, edit) in self.edits {
            state.queue.push(phase, edit);
        }
        for predicate in self.predicates {
            state.channel.push_predicate(predicate);
        }
    }
}

/// Reports into the channel, filling in editor and phase when missing.
struct Attributed<'a> {
    channel: &'a mut DiagnosticChannel,
    editor: &'a str,
    phase: Phase,
}

impl DiagnosticSink for Attributed<'_> {
    fn report(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.editor.is_none() {
            diagnostic.editor = Some(self.editor.to_string());
        }
        if diagnostic.phase.is_none() {
            diagnostic.phase = Some(self.phase);
        }
        self.channel.report(diagnostic);
    }
}

/// Handed to [`Editor::initialize`](crate::Editor::initialize).
pub struct InitContext<'a> {
    state: &'a mut RunState,
    editor: &'a str,
    rank: usize,
}

impl<'a> InitContext<'a> {
    pub(crate) fn new(state: &'a mut RunState, editor: &'a str, rank: usize) -> Self {
        Self {
            state,
            editor,
            rank,
        }
    }

    /// Name of the editor being initialized.
    pub fn editor(&self) -> &str {
        self.editor
    }

    /// Register an edit for `phase`.
    pub fn register(
        &mut self,
        phase: Phase,
        edit: impl FnMut(&Compilation, &mut EditContext<'_>) -> eyre::Result<Compilation> + 'static,
    ) {
        tracing::debug!(editor = self.editor, %phase, "edit registered");
        self.state.queue.push(
            phase,
            RegisteredEdit {
                editor: self.editor.to_string(),
                rank: self.rank,
                run: Box::new(edit),
            },
        );
    }

    pub fn extensions(&mut self) -> &mut ExtensionPoints {
        &mut self.state.extensions
    }

    /// Hide every diagnostic matching `predicate` from the run's output.
    pub fn suppress(&mut self, predicate: impl Fn(&Diagnostic) -> bool + 'static) {
        self.state.channel.suppress(predicate);
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        DiagnosticSink::report(self, diagnostic);
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.state.cancel
    }
}

impl DiagnosticSink for InitContext<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        Attributed {
            channel: &mut self.state.channel,
            editor: self.editor,
            phase: Phase::Start,
        }
        .report(diagnostic);
    }
}

/// Handed to every edit call.
pub struct EditContext<'a> {
    state: &'a mut RunState,
    editor: &'a str,
    rank: usize,
    phase: Phase,
    staged: Staged,
}

impl<'a> EditContext<'a> {
    pub(crate) fn new(state: &'a mut RunState, editor: &'a str, rank: usize, phase: Phase) -> Self {
        Self {
            state,
            editor,
            rank,
            phase,
            staged: Staged::default(),
        }
    }

    /// Hand back what the edit registered, to be applied if it succeeded.
    pub(crate) fn into_staged(self) -> Staged {
        self.staged
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Name of the editor that registered the running edit.
    pub fn editor(&self) -> &str {
        self.editor
    }

    /// Register a follow-up edit for a later phase.
    ///
    /// The follow-up is queued only if the running edit succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] if `phase` is not strictly after the
    /// running phase. Propagating it fails the running edit.
    pub fn register(
        &mut self,
        phase: Phase,
        edit: impl FnMut(&Compilation, &mut EditContext<'_>) -> eyre::Result<Compilation> + 'static,
    ) -> Result<(), RegistrationError> {
        if phase <= self.phase {
            return Err(RegistrationError {
                requested: phase,
                current: self.phase,
            });
        }
        tracing::debug!(editor = self.editor, %phase, "follow-up edit registered");
        self.staged.edits.push((
            phase,
            RegisteredEdit {
                editor: self.editor.to_string(),
                rank: self.rank,
                run: Box::new(edit),
            },
        ));
        Ok(())
    }

    pub fn extensions(&self) -> &ExtensionPoints {
        &self.state.extensions
    }

    /// Hide every diagnostic matching `predicate` from the run's output,
    /// once the running edit has succeeded.
    pub fn suppress(&mut self, predicate: impl Fn(&Diagnostic) -> bool + 'static) {
        self.staged.predicates.push(Box::new(predicate));
    }

    /// Report a diagnostic attributed to this edit's editor and phase.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        DiagnosticSink::report(self, diagnostic);
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.state.cancel
    }

    pub fn check_cancelled(&self) -> Result<(), Cancelled> {
        self.state.cancel.check()
    }

    /// Run compile-time invocation over the compilation's symbols.
    ///
    /// The invoker is shared by the whole run, so a symbol invoked by an
    /// earlier edit is skipped.
    pub fn invoke_symbols(
        &mut self,
        compilation: &Compilation,
        natives: &NativeRegistry,
    ) -> Result<InvokeSummary, Cancelled> {
        let RunState {
            channel,
            invoker,
            cancel,
            ..
        } = &mut *self.state;
        let mut sink = Attributed {
            channel,
            editor: self.editor,
            phase: self.phase,
        };
        invoker.invoke(compilation.symbols(), natives, &mut sink, cancel)
    }
}

impl DiagnosticSink for EditContext<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        Attributed {
            channel: &mut self.state.channel,
            editor: self.editor,
            phase: self.phase,
        }
        .report(diagnostic);
    }
}
