//! Sequential circuit representation.
//!
//! A circuit is an [`Aig`] plus three ordered lists of named ports: inputs, outputs and latches.
//! Input and latch bits are leaves of the graph; output bits and latch next-state bits are
//! arbitrary literals.

use itertools::Itertools;

use crate::{
    Bits, CircuitBuilder, CircuitError, PortKind,
    aig::{Aig, Lit},
};

/// An ordered list of literals forming a bit-vector signal (LSB first).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Word(Vec<Lit>);

impl Word {
    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn lits(&self) -> &[Lit] {
        &self.0
    }

    /// Returns the literal driving bit `index`.
    pub fn bit(&self, index: usize) -> Option<Lit> {
        self.0.get(index).copied()
    }
}

impl From<Vec<Lit>> for Word {
    fn from(lits: Vec<Lit>) -> Self {
        Self(lits)
    }
}

impl FromIterator<Lit> for Word {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A named input or output port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub(crate) name: String,
    pub(crate) bits: Word,
}

impl Port {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.bits.width()
    }

    pub fn bits(&self) -> &Word {
        &self.bits
    }
}

/// A named state register.
///
/// `bits` are the leaves carrying the current (pre-update) value; `next` is the word latched at
/// the end of each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Latch {
    pub(crate) name: String,
    pub(crate) init: Bits,
    pub(crate) bits: Word,
    pub(crate) next: Word,
}

impl Latch {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.bits.width()
    }

    /// Value held by the latch before the first step.
    pub fn init(&self) -> &Bits {
        &self.init
    }
}

/// A synchronous boolean circuit with named bit-vector ports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Circuit {
    pub(crate) aig: Aig,
    pub(crate) inputs: Vec<Port>,
    pub(crate) outputs: Vec<Port>,
    pub(crate) latches: Vec<Latch>,
}

impl Circuit {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns a circuit forwarding input `name` to the output of the same name.
    pub fn identity(name: &str, width: usize) -> Result<Self, CircuitError> {
        let mut builder = CircuitBuilder::new();
        let word = builder.input(name, width)?;
        builder.output(name, &word)?;
        builder.finish()
    }

    /// Returns a circuit whose `output` is `low` in the low-order bits followed by `high`.
    pub fn concat(
        low: (&str, usize),
        high: (&str, usize),
        output: &str,
    ) -> Result<Self, CircuitError> {
        let mut builder = CircuitBuilder::new();
        let low = builder.input(low.0, low.1)?;
        let high = builder.input(high.0, high.1)?;
        let joined = builder.concat(&low, &high);
        builder.output(output, &joined)?;
        builder.finish()
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    pub fn aig(&self) -> &Aig {
        &self.aig
    }

    /// Number of AND gates.
    pub fn num_ands(&self) -> usize {
        self.aig.num_ands()
    }

    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    pub fn latches(&self) -> &[Latch] {
        &self.latches
    }

    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|port| port.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|port| port.name == name)
    }

    pub fn latch(&self, name: &str) -> Option<&Latch> {
        self.latches.iter().find(|latch| latch.name == name)
    }

    // HELPERS
    // --------------------------------------------------------------------------------------------

    pub(crate) fn ensure_unique(&self) -> Result<(), CircuitError> {
        let groups = [
            (PortKind::Input, self.inputs.iter().map(Port::name).collect::<Vec<_>>()),
            (PortKind::Output, self.outputs.iter().map(Port::name).collect()),
            (PortKind::Latch, self.latches.iter().map(Latch::name).collect()),
        ];
        for (kind, names) in groups {
            if let Some(name) = names.into_iter().duplicates().next() {
                return Err(CircuitError::DuplicatePort { kind, name: name.to_string() });
            }
        }
        Ok(())
    }
}
