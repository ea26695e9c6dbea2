//! Reading a compiled circuit back as an automaton.

use core::{fmt::Debug, hash::Hash};

use aigdfa_automaton::Automaton;
use aigdfa_circuit::{Bits, Circuit, Port, sim::assignment};
use tracing::instrument;

use crate::{
    CompileError, DecompileOptions, EncodingScheme, OptionsError, OutputSelection, Relabeling,
};

// SYMBOL CODEC
// ================================================================================================

/// Translation between the raw codes on circuit ports and automaton symbols.
pub trait SymbolCodec {
    type Input: Clone + Eq + Hash + Debug;
    type Output: Clone + Eq + Hash + Debug;
    type State: Clone + Eq + Hash + Debug;

    /// Input alphabet for an action port of the given width.
    fn input_alphabet(&self, width: usize) -> Vec<Self::Input>;

    /// Output alphabet for an output port of the given width.
    fn output_alphabet(&self, width: usize) -> Vec<Self::Output>;

    fn encode_input(&self, input: &Self::Input, width: usize) -> Result<Bits, CompileError>;

    fn decode_output(&self, code: &Bits) -> Result<Self::Output, CompileError>;

    fn encode_state(&self, state: &Self::State) -> Result<Bits, CompileError>;

    fn decode_state(&self, code: &Bits) -> Result<Self::State, CompileError>;

    /// Action code applied when only the label is of interest.
    fn dummy_action(&self, width: usize) -> Bits {
        Bits::one_hot(0, width)
    }
}

impl<C: SymbolCodec + ?Sized> SymbolCodec for &C {
    type Input = C::Input;
    type Output = C::Output;
    type State = C::State;

    fn input_alphabet(&self, width: usize) -> Vec<C::Input> {
        (**self).input_alphabet(width)
    }

    fn output_alphabet(&self, width: usize) -> Vec<C::Output> {
        (**self).output_alphabet(width)
    }

    fn encode_input(&self, input: &C::Input, width: usize) -> Result<Bits, CompileError> {
        (**self).encode_input(input, width)
    }

    fn decode_output(&self, code: &Bits) -> Result<C::Output, CompileError> {
        (**self).decode_output(code)
    }

    fn encode_state(&self, state: &C::State) -> Result<Bits, CompileError> {
        (**self).encode_state(state)
    }

    fn decode_state(&self, code: &Bits) -> Result<C::State, CompileError> {
        (**self).decode_state(code)
    }

    fn dummy_action(&self, width: usize) -> Bits {
        (**self).dummy_action(width)
    }
}

impl<I, O, S> SymbolCodec for Relabeling<I, O, S>
where
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    type Input = I;
    type Output = O;
    type State = S;

    fn input_alphabet(&self, _width: usize) -> Vec<I> {
        self.inputs().symbols().to_vec()
    }

    fn output_alphabet(&self, _width: usize) -> Vec<O> {
        self.outputs().symbols().to_vec()
    }

    fn encode_input(&self, input: &I, _width: usize) -> Result<Bits, CompileError> {
        self.inputs().try_encode(input)
    }

    fn decode_output(&self, code: &Bits) -> Result<O, CompileError> {
        self.outputs().try_decode(code).cloned()
    }

    fn encode_state(&self, state: &S) -> Result<Bits, CompileError> {
        self.states().try_encode(state)
    }

    fn decode_state(&self, code: &Bits) -> Result<S, CompileError> {
        self.states().try_decode(code).cloned()
    }

    /// Code of the first input symbol.
    fn dummy_action(&self, width: usize) -> Bits {
        self.inputs()
            .iter()
            .next()
            .map(|(_, code)| code)
            .unwrap_or_else(|| Bits::one_hot(0, width))
    }
}

/// Codec for circuits without a relabeling.
///
/// Symbols are the raw codes themselves. Under one-hot, the input and output alphabets are the
/// one-hot codes of the port width. Under binary, they are every code of the port width. States
/// are the raw contents of the state latch, and output codes are passed through as read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCodes {
    inputs: EncodingScheme,
    outputs: EncodingScheme,
}

impl RawCodes {
    pub fn new(inputs: EncodingScheme, outputs: EncodingScheme) -> Self {
        Self { inputs, outputs }
    }

    pub fn input_encoding(&self) -> EncodingScheme {
        self.inputs
    }

    pub fn output_encoding(&self) -> EncodingScheme {
        self.outputs
    }
}

impl SymbolCodec for RawCodes {
    type Input = Bits;
    type Output = Bits;
    type State = Bits;

    fn input_alphabet(&self, width: usize) -> Vec<Bits> {
        codes(self.inputs, width)
    }

    fn output_alphabet(&self, width: usize) -> Vec<Bits> {
        codes(self.outputs, width)
    }

    fn encode_input(&self, input: &Bits, width: usize) -> Result<Bits, CompileError> {
        let legal = match self.inputs {
            EncodingScheme::OneHot => input.is_one_hot(),
            EncodingScheme::Binary => true,
        };
        if input.width() != width || !legal {
            return Err(CompileError::InvalidInputEncoding(input.to_string()));
        }
        Ok(input.clone())
    }

    fn decode_output(&self, code: &Bits) -> Result<Bits, CompileError> {
        Ok(code.clone())
    }

    fn encode_state(&self, state: &Bits) -> Result<Bits, CompileError> {
        Ok(state.clone())
    }

    fn decode_state(&self, code: &Bits) -> Result<Bits, CompileError> {
        Ok(code.clone())
    }

    /// The first code of the input alphabet.
    fn dummy_action(&self, width: usize) -> Bits {
        match self.inputs {
            EncodingScheme::OneHot => Bits::one_hot(0, width),
            EncodingScheme::Binary => Bits::zeros(width),
        }
    }
}

/// Every legal code of a port of the given width, in code order.
fn codes(scheme: EncodingScheme, width: usize) -> Vec<Bits> {
    match scheme {
        EncodingScheme::OneHot => (0..width).map(|index| Bits::one_hot(index, width)).collect(),
        EncodingScheme::Binary => {
            let count = u32::try_from(width)
                .ok()
                .and_then(|width| 1u64.checked_shl(width))
                .unwrap_or(u64::MAX);
            (0..count).map(|value| Bits::from_u64(value, width)).collect()
        },
    }
}

// CIRCUIT AUTOMATON
// ================================================================================================

/// A circuit with one action input and one state latch, viewed as an automaton.
///
/// `label` and `transition` evaluate the circuit once with the state latch pinned; the circuit
/// itself is never mutated.
#[derive(Debug, Clone)]
pub struct CircuitAutomaton<'c, C: SymbolCodec> {
    circuit: &'c Circuit,
    codec: C,
    action: String,
    output: String,
    state: String,
    action_width: usize,
    start: C::State,
    inputs: Vec<C::Input>,
    outputs: Vec<C::Output>,
    dummy_action: Bits,
}

impl<C: SymbolCodec> CircuitAutomaton<'_, C> {
    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Name of the output port read as the label.
    pub fn output_port(&self) -> &str {
        &self.output
    }

    pub fn dummy_action(&self) -> &Bits {
        &self.dummy_action
    }

    /// Evaluates the circuit from `state` with `action` and returns `(output, next state)` codes.
    fn step(&self, state: &C::State, action: Bits) -> Result<(Bits, Bits), CompileError> {
        let latches = assignment([(self.state.as_str(), self.codec.encode_state(state)?)]);
        let eval = self.circuit.eval(&assignment([(self.action.as_str(), action)]), Some(&latches))?;
        let output = eval.output(&self.output).cloned().ok_or_else(|| {
            CompileError::MalformedCircuitShape(format!("output '{}' was not produced", self.output))
        })?;
        let next = eval.latch(&self.state).cloned().ok_or_else(|| {
            CompileError::MalformedCircuitShape(format!("latch '{}' was not updated", self.state))
        })?;
        Ok((output, next))
    }
}

impl<C: SymbolCodec> Automaton for CircuitAutomaton<'_, C> {
    type State = C::State;
    type Input = C::Input;
    type Output = C::Output;
    type Error = CompileError;

    fn start(&self) -> C::State {
        self.start.clone()
    }

    fn inputs(&self) -> &[C::Input] {
        &self.inputs
    }

    fn outputs(&self) -> &[C::Output] {
        &self.outputs
    }

    fn label(&self, state: &C::State) -> Result<C::Output, CompileError> {
        let (output, _) = self.step(state, self.dummy_action.clone())?;
        self.codec.decode_output(&output)
    }

    fn transition(&self, state: &C::State, input: &C::Input) -> Result<C::State, CompileError> {
        let action = self.codec.encode_input(input, self.action_width)?;
        let (_, next) = self.step(state, action)?;
        self.codec.decode_state(&next)
    }
}

// CONSTRUCTION
// ================================================================================================

/// Views `circuit` as an automaton, translating codes through `codec`.
///
/// # Errors
/// Returns an error if:
/// - the circuit does not have exactly one input named like the configured action, one latch
///   named like the configured state, and one or two outputs;
/// - the output port cannot be selected unambiguously;
/// - the dummy action does not fit the action port;
/// - the initial latch value cannot be decoded.
#[instrument(skip_all, fields(
    inputs = circuit.inputs().len(),
    outputs = circuit.outputs().len(),
    latches = circuit.latches().len(),
))]
pub fn to_automaton<'c, C: SymbolCodec>(
    circuit: &'c Circuit,
    codec: C,
    options: &DecompileOptions,
) -> Result<CircuitAutomaton<'c, C>, CompileError> {
    let names = options.port_names();
    names.validate()?;

    let [action] = circuit.inputs() else {
        return Err(shape_error("exactly one input", circuit.inputs().len()));
    };
    let [latch] = circuit.latches() else {
        return Err(shape_error("exactly one latch", circuit.latches().len()));
    };
    if !(1..=2).contains(&circuit.outputs().len()) {
        return Err(shape_error("one or two outputs", circuit.outputs().len()));
    }
    if action.name() != names.action() {
        return Err(CompileError::MalformedCircuitShape(format!(
            "input is named '{}', expected '{}'",
            action.name(),
            names.action()
        )));
    }
    if latch.name() != names.state() {
        return Err(CompileError::MalformedCircuitShape(format!(
            "latch is named '{}', expected '{}'",
            latch.name(),
            names.state()
        )));
    }
    let output = select_output(circuit, options.output_selection(), names.output())?;

    let dummy_action = match options.dummy_action() {
        Some(code) if code.width() != action.width() => {
            return Err(OptionsError::DummyActionWidth { code: code.clone() }.into());
        },
        Some(code) => code.clone(),
        None => codec.dummy_action(action.width()),
    };
    let start = codec.decode_state(latch.init())?;
    tracing::debug!(
        output = output.name(),
        action_width = action.width(),
        state_width = latch.width(),
        "decompiled circuit"
    );

    Ok(CircuitAutomaton {
        circuit,
        inputs: codec.input_alphabet(action.width()),
        outputs: codec.output_alphabet(output.width()),
        action: action.name().to_string(),
        output: output.name().to_string(),
        state: latch.name().to_string(),
        action_width: action.width(),
        start,
        dummy_action,
        codec,
    })
}

fn shape_error(expected: &str, found: usize) -> CompileError {
    CompileError::MalformedCircuitShape(format!("expected {expected}, found {found}"))
}

fn select_output<'c>(
    circuit: &'c Circuit,
    selection: &OutputSelection,
    conventional: &str,
) -> Result<&'c Port, CompileError> {
    let outputs = circuit.outputs();
    let ambiguous = || CompileError::AmbiguousOutput {
        candidates: outputs.iter().map(|port| port.name().to_string()).collect(),
    };
    match selection {
        OutputSelection::PreferConventional => match outputs {
            [only] => Ok(only),
            _ => circuit.output(conventional).ok_or_else(ambiguous),
        },
        OutputSelection::Sole => match outputs {
            [only] => Ok(only),
            _ => Err(ambiguous()),
        },
        OutputSelection::Named(name) => circuit.output(name).ok_or_else(|| {
            CompileError::MalformedCircuitShape(format!("circuit has no output named '{name}'"))
        }),
    }
}
