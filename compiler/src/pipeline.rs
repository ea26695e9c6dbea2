use core::{fmt::Debug, hash::Hash};

use aigdfa_automaton::{Automaton, TransitionRelation};
use aigdfa_circuit::Circuit;
use tracing::instrument;

use crate::{
    AlphabetKind, CompileError, CompileOptions, DecompileOptions, Encoding, Relabeling,
    adapter::{CircuitAutomaton, RawCodes, to_automaton},
    assemble::assemble,
    delayed::{Delayed, DelayedState, Observation},
    tables::synthesize,
};

// COMPILED
// ================================================================================================

/// Result of compiling an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled<I: Eq + Hash, O: Eq + Hash, S: Eq + Hash> {
    circuit: Circuit,
    relabeling: Relabeling<I, O, S>,
    monitor: Circuit,
}

impl<I, O, S> Compiled<I, O, S>
where
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    pub(crate) fn new(circuit: Circuit, relabeling: Relabeling<I, O, S>, monitor: Circuit) -> Self {
        Self { circuit, relabeling, monitor }
    }

    /// The machine: one action input, the output port and the state latch.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Encodings used for inputs, outputs and states.
    pub fn relabeling(&self) -> &Relabeling<I, O, S> {
        &self.relabeling
    }

    /// The validity monitor over the action port.
    pub fn monitor(&self) -> &Circuit {
        &self.monitor
    }

    /// Returns the machine and the monitor composed in parallel, sharing the action port.
    pub fn monitored(&self) -> Result<Circuit, CompileError> {
        Ok(self.circuit.par(&self.monitor)?)
    }

    /// Returns `(circuit, relabeling, monitor)`.
    pub fn into_parts(self) -> (Circuit, Relabeling<I, O, S>, Circuit) {
        (self.circuit, self.relabeling, self.monitor)
    }
}

// COMPILATION
// ================================================================================================

/// Compiles `automaton` into a circuit whose output is the label of the current state.
///
/// The reachable part of the automaton is flattened first; unreachable states are not encoded.
///
/// # Errors
/// Returns an error if the options are inconsistent, the automaton fails to answer a query, an
/// alphabet is empty, or a label is missing from the output alphabet.
#[instrument(skip_all, fields(inputs = automaton.inputs().len(), outputs = automaton.outputs().len()))]
pub fn compile<A: Automaton>(
    automaton: &A,
    options: &CompileOptions,
) -> Result<Compiled<A::Input, A::Output, A::State>, CompileError> {
    options.validate()?;
    let relation = automaton.to_relation().map_err(CompileError::automaton)?;
    compile_relation(
        &relation,
        automaton.inputs().iter().cloned(),
        automaton.outputs().iter().cloned(),
        options,
    )
}

/// Compiles the delayed-output view of `automaton`.
///
/// The state latch also holds the previously produced label, so the circuit output lags the
/// automaton by one step and reads [`Observation::NotYetObserved`] before the first step.
pub fn compile_delayed<A: Automaton>(
    automaton: &A,
    options: &CompileOptions,
) -> Result<
    Compiled<A::Input, Observation<A::Output>, DelayedState<A::State, A::Output>>,
    CompileError,
> {
    compile(&Delayed::new(automaton), options)
}

/// Compiles an explicit transition relation over the given alphabets.
///
/// States are encoded in the order of the relation.
pub fn compile_relation<S, I, O>(
    relation: &TransitionRelation<S, I, O>,
    inputs: impl IntoIterator<Item = I>,
    outputs: impl IntoIterator<Item = O>,
    options: &CompileOptions,
) -> Result<Compiled<I, O, S>, CompileError>
where
    S: Clone + Eq + Hash + Debug,
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
{
    options.validate()?;
    let inputs = Encoding::new(AlphabetKind::Inputs, inputs, options.input_encoding())?;
    let outputs = Encoding::new(AlphabetKind::Outputs, outputs, options.output_encoding())?;
    let states =
        Encoding::new(AlphabetKind::States, relation.states().cloned(), options.state_encoding())?;

    let tables = synthesize(relation, &states, &inputs, &outputs)?;
    assemble(&tables, Relabeling::new(inputs, outputs, states), relation.start(), options)
}

// DECOMPILATION
// ================================================================================================

/// Reads a compiled circuit back as an automaton over the symbols of `relabeling`.
pub fn decompile<'c, I, O, S>(
    circuit: &'c Circuit,
    relabeling: &'c Relabeling<I, O, S>,
    options: &DecompileOptions,
) -> Result<CircuitAutomaton<'c, &'c Relabeling<I, O, S>>, CompileError>
where
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    to_automaton(circuit, relabeling, options)
}

/// Reads a circuit as an automaton over raw codes.
///
/// The port encodings are taken from [`DecompileOptions::with_raw_encoding`] and default to
/// one-hot.
pub fn decompile_raw<'c>(
    circuit: &'c Circuit,
    options: &DecompileOptions,
) -> Result<CircuitAutomaton<'c, RawCodes>, CompileError> {
    let codec = RawCodes::new(options.raw_input_encoding(), options.raw_output_encoding());
    to_automaton(circuit, codec, options)
}
