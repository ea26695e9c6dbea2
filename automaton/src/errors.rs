// Allow unused assignments - required by miette::Diagnostic derive macro
#![allow(unused_assignments)]

use miette::Diagnostic;

// AUTOMATON ERROR
// ================================================================================================

/// Errors raised by table-backed automata.
///
/// States and inputs are recorded by their `Debug` rendering so the error does not depend on the
/// symbol types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum AutomatonError {
    #[error("state {0} is not part of the automaton")]
    UnknownState(String),
    #[error("state {state} has no transition on input {input}")]
    #[diagnostic(help("every reachable state needs an edge for every input symbol"))]
    MissingTransition { state: String, input: String },
    #[error("state {0} has no label")]
    MissingLabel(String),
    #[error("state {0} is listed more than once in the transition relation")]
    DuplicateState(String),
}

impl AutomatonError {
    pub(crate) fn unknown_state(state: &impl core::fmt::Debug) -> Self {
        Self::UnknownState(format!("{state:?}"))
    }

    pub(crate) fn missing_transition(
        state: &impl core::fmt::Debug,
        input: &impl core::fmt::Debug,
    ) -> Self {
        Self::MissingTransition {
            state: format!("{state:?}"),
            input: format!("{input:?}"),
        }
    }

    pub(crate) fn missing_label(state: &impl core::fmt::Debug) -> Self {
        Self::MissingLabel(format!("{state:?}"))
    }

    pub(crate) fn duplicate_state(state: &impl core::fmt::Debug) -> Self {
        Self::DuplicateState(format!("{state:?}"))
    }
}
