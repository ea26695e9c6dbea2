// Allow unused assignments - required by miette::Diagnostic derive macro
#![allow(unused_assignments)]

use core::{error::Error, fmt};

use aigdfa_circuit::{Bits, CircuitError};
use miette::Diagnostic;

/// Which alphabet of an automaton a symbol or code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphabetKind {
    Inputs,
    Outputs,
    States,
}

impl fmt::Display for AlphabetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inputs => f.write_str("input"),
            Self::Outputs => f.write_str("output"),
            Self::States => f.write_str("state"),
        }
    }
}

// COMPILE ERROR
// ================================================================================================

/// Errors raised while compiling an automaton into a circuit or reading a circuit back as an
/// automaton.
///
/// Symbols are recorded by their `Debug` rendering.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CompileError {
    #[error("the {0} alphabet is empty")]
    #[diagnostic(help("every alphabet needs at least one symbol to be encoded"))]
    EmptyAlphabet(AlphabetKind),
    #[error("state {state} has more than one transition on input {input}")]
    AmbiguousTransition { state: String, input: String },
    #[error("start state {0} is not part of the state encoding")]
    UnknownStartState(String),
    #[error("cannot choose the output port; candidates are [{}]", .candidates.join(", "))]
    #[diagnostic(help(
        "name the output explicitly with `OutputSelection::Named` in the decompile options"
    ))]
    AmbiguousOutput { candidates: Vec<String> },
    #[error("input {0} has no code in the input encoding")]
    InvalidInputEncoding(String),
    #[error("circuit does not have the shape of a compiled automaton: {0}")]
    #[diagnostic(help(
        "expected exactly one input, one or two outputs and one latch under the configured port names"
    ))]
    MalformedCircuitShape(String),
    #[error("{alphabet} {symbol} has no code in the {alphabet} encoding")]
    UnencodedSymbol { alphabet: AlphabetKind, symbol: String },
    #[error("{alphabet} code {code} does not decode to any symbol")]
    UndecodableCode { alphabet: AlphabetKind, code: Bits },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Circuit(#[from] CircuitError),
    #[error("automaton query failed")]
    Automaton(#[source] Box<dyn Error + Send + Sync + 'static>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Options(#[from] OptionsError),
}

impl CompileError {
    /// Wraps an error raised by the source automaton.
    pub fn automaton(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Automaton(Box::new(err))
    }

    pub(crate) fn unencoded(alphabet: AlphabetKind, symbol: &impl fmt::Debug) -> Self {
        match alphabet {
            AlphabetKind::Inputs => Self::InvalidInputEncoding(format!("{symbol:?}")),
            _ => Self::UnencodedSymbol { alphabet, symbol: format!("{symbol:?}") },
        }
    }
}

// OPTIONS ERROR
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum OptionsError {
    #[error("port name for {0} must not be empty")]
    EmptyPortName(&'static str),
    #[error("port name '{0}' is used for more than one port")]
    DuplicatePortName(String),
    #[error("one-hot mask tables require one-hot {0} encoding")]
    #[diagnostic(help("use `TableStrategy::Lookup` or switch the {0} alphabet to one-hot"))]
    MasksRequireOneHot(AlphabetKind),
    #[error("dummy action {code} does not fit the action port")]
    DummyActionWidth { code: Bits },
}
