use aigdfa_circuit::Bits;
use itertools::Itertools;

use crate::{AlphabetKind, OptionsError};

// ENCODING SCHEME
// ================================================================================================

/// How the symbols of an alphabet are mapped to bit-vector codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodingScheme {
    /// One bit per symbol, exactly one bit set.
    #[default]
    OneHot,
    /// The symbol index in binary, at least one bit wide.
    ///
    /// Narrower than one-hot, but codes have no cheap legality test: binary inputs are assumed
    /// valid by the validity monitor.
    Binary,
}

impl EncodingScheme {
    /// Returns the code width for an alphabet of `size` symbols.
    pub fn width(self, size: usize) -> usize {
        match self {
            Self::OneHot => size,
            Self::Binary => (usize::BITS - size.saturating_sub(1).leading_zeros()).max(1) as usize,
        }
    }
}

// TABLE STRATEGY
// ================================================================================================

/// How the label and transition tables are realized as gates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableStrategy {
    /// Exact match on every address bit; works with any encoding.
    #[default]
    Lookup,
    /// Test only the set bits of each one-hot address field.
    ///
    /// Requires one-hot state and input encodings. Cheaper, but illegal raw inputs may select
    /// several entries at once.
    OneHotMasks,
}

// PORT NAMES
// ================================================================================================

/// Names of the ports of a compiled machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortNames {
    action: String,
    output: String,
    state: String,
    next_state: String,
    valid: String,
}

impl Default for PortNames {
    fn default() -> Self {
        Self {
            action: "action".into(),
            output: "output".into(),
            state: "state".into(),
            next_state: "next_state".into(),
            valid: "valid".into(),
        }
    }
}

impl PortNames {
    pub fn with_action(mut self, name: impl Into<String>) -> Self {
        self.action = name.into();
        self
    }

    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.output = name.into();
        self
    }

    pub fn with_state(mut self, name: impl Into<String>) -> Self {
        self.state = name.into();
        self
    }

    pub fn with_next_state(mut self, name: impl Into<String>) -> Self {
        self.next_state = name.into();
        self
    }

    pub fn with_valid(mut self, name: impl Into<String>) -> Self {
        self.valid = name.into();
        self
    }

    /// Input port carrying the encoded action.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Output port carrying the encoded label.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Latch holding the encoded current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Output of the transition table, fed back into the state latch.
    pub fn next_state(&self) -> &str {
        &self.next_state
    }

    /// Output of the validity monitor.
    pub fn valid(&self) -> &str {
        &self.valid
    }

    /// Checks that every name is non-empty and that the names are pairwise distinct.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let named = [
            ("action", &self.action),
            ("output", &self.output),
            ("state", &self.state),
            ("next_state", &self.next_state),
            ("valid", &self.valid),
        ];
        if let Some((role, _)) = named.iter().find(|(_, name)| name.is_empty()) {
            return Err(OptionsError::EmptyPortName(*role));
        }
        match named.iter().map(|(_, name)| name.as_str()).duplicates().next() {
            Some(name) => Err(OptionsError::DuplicatePortName(name.to_string())),
            None => Ok(()),
        }
    }
}

// COMPILE OPTIONS
// ================================================================================================

/// Parameters of automaton-to-circuit compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    input_encoding: EncodingScheme,
    output_encoding: EncodingScheme,
    state_encoding: EncodingScheme,
    table_strategy: TableStrategy,
    expose_next_state: bool,
    names: PortNames,
}

impl CompileOptions {
    // CONSTRUCTOR
    // --------------------------------------------------------------------------------------------

    /// Creates options with the given encodings and table strategy and the conventional port
    /// names.
    ///
    /// # Errors
    /// Returns an error if the table strategy is incompatible with the encodings.
    pub fn new(
        input_encoding: EncodingScheme,
        output_encoding: EncodingScheme,
        state_encoding: EncodingScheme,
        table_strategy: TableStrategy,
    ) -> Result<Self, OptionsError> {
        let options = Self {
            input_encoding,
            output_encoding,
            state_encoding,
            table_strategy,
            ..Self::default()
        };
        options.validate()?;
        Ok(options)
    }

    /// Uses the same encoding scheme for inputs, outputs and states.
    pub fn with_encoding(mut self, scheme: EncodingScheme) -> Self {
        self.input_encoding = scheme;
        self.output_encoding = scheme;
        self.state_encoding = scheme;
        self
    }

    pub fn with_input_encoding(mut self, scheme: EncodingScheme) -> Self {
        self.input_encoding = scheme;
        self
    }

    pub fn with_output_encoding(mut self, scheme: EncodingScheme) -> Self {
        self.output_encoding = scheme;
        self
    }

    pub fn with_state_encoding(mut self, scheme: EncodingScheme) -> Self {
        self.state_encoding = scheme;
        self
    }

    pub fn with_table_strategy(mut self, strategy: TableStrategy) -> Self {
        self.table_strategy = strategy;
        self
    }

    /// Keeps the `next_state` port as an output of the compiled circuit.
    ///
    /// The state latch still holds the pre-update value; the extra output shows the value it
    /// will hold after the current step.
    pub fn with_exposed_next_state(mut self, expose: bool) -> Self {
        self.expose_next_state = expose;
        self
    }

    pub fn with_port_names(mut self, names: PortNames) -> Self {
        self.names = names;
        self
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    pub fn input_encoding(&self) -> EncodingScheme {
        self.input_encoding
    }

    pub fn output_encoding(&self) -> EncodingScheme {
        self.output_encoding
    }

    pub fn state_encoding(&self) -> EncodingScheme {
        self.state_encoding
    }

    pub fn table_strategy(&self) -> TableStrategy {
        self.table_strategy
    }

    pub fn expose_next_state(&self) -> bool {
        self.expose_next_state
    }

    pub fn port_names(&self) -> &PortNames {
        &self.names
    }

    /// Checks the port names and the compatibility of the table strategy with the encodings.
    pub fn validate(&self) -> Result<(), OptionsError> {
        self.names.validate()?;
        if self.table_strategy == TableStrategy::OneHotMasks {
            if self.state_encoding != EncodingScheme::OneHot {
                return Err(OptionsError::MasksRequireOneHot(AlphabetKind::States));
            }
            if self.input_encoding != EncodingScheme::OneHot {
                return Err(OptionsError::MasksRequireOneHot(AlphabetKind::Inputs));
            }
        }
        Ok(())
    }
}

// DECOMPILE OPTIONS
// ================================================================================================

/// Which output port of a circuit carries the automaton label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputSelection {
    /// The only output if there is exactly one, otherwise the port with the configured output
    /// name.
    #[default]
    PreferConventional,
    /// The only output; more than one output is an error.
    Sole,
    /// The port with the given name.
    Named(String),
}

/// Parameters of circuit-to-automaton decompilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompileOptions {
    names: PortNames,
    output: OutputSelection,
    dummy_action: Option<Bits>,
    raw_inputs: EncodingScheme,
    raw_outputs: EncodingScheme,
}

impl DecompileOptions {
    pub fn with_port_names(mut self, names: PortNames) -> Self {
        self.names = names;
        self
    }

    pub fn with_output_selection(mut self, selection: OutputSelection) -> Self {
        self.output = selection;
        self
    }

    /// Sets the action code applied when evaluating a label.
    ///
    /// The label only depends on the state latch, so any legal code works. By default the code
    /// of the first input symbol is used, or one-hot index 0 for raw circuits.
    pub fn with_dummy_action(mut self, code: Bits) -> Self {
        self.dummy_action = Some(code);
        self
    }

    /// Sets the encodings assumed for the action and output ports when a circuit is read
    /// without a relabeling.
    pub fn with_raw_encoding(mut self, inputs: EncodingScheme, outputs: EncodingScheme) -> Self {
        self.raw_inputs = inputs;
        self.raw_outputs = outputs;
        self
    }

    pub fn port_names(&self) -> &PortNames {
        &self.names
    }

    pub fn raw_input_encoding(&self) -> EncodingScheme {
        self.raw_inputs
    }

    pub fn raw_output_encoding(&self) -> EncodingScheme {
        self.raw_outputs
    }

    pub fn output_selection(&self) -> &OutputSelection {
        &self.output
    }

    pub fn dummy_action(&self) -> Option<&Bits> {
        self.dummy_action.as_ref()
    }
}
