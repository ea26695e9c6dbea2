//! Circuit evaluation and step-by-step simulation.
//!
//! A step evaluates the combinational logic from the current latch values and the supplied
//! inputs, then moves every latch to its next value. The update is never visible to the step
//! that computed it.

use std::collections::{BTreeMap, HashMap};

use crate::{
    Bits, Circuit, CircuitError, PortKind,
    aig::{NodeId, lit_value},
    circuit::Word,
};

/// Values for named ports.
pub type Assignment = BTreeMap<String, Bits>;

/// Builds an [`Assignment`] from `(name, value)` pairs.
pub fn assignment<K: Into<String>>(values: impl IntoIterator<Item = (K, Bits)>) -> Assignment {
    values.into_iter().map(|(name, value)| (name.into(), value)).collect()
}

/// Result of evaluating a circuit once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Output port values.
    pub outputs: Assignment,
    /// Latch values after the step.
    pub latches: Assignment,
}

impl Evaluation {
    pub fn output(&self, name: &str) -> Option<&Bits> {
        self.outputs.get(name)
    }

    pub fn latch(&self, name: &str) -> Option<&Bits> {
        self.latches.get(name)
    }
}

impl Circuit {
    /// Initial value of every latch.
    pub fn initial_latches(&self) -> Assignment {
        self.latches.iter().map(|latch| (latch.name.clone(), latch.init.clone())).collect()
    }

    /// Evaluate the circuit once.
    ///
    /// Every input must be assigned. Latches listed in `latches` are pinned to the given values;
    /// the others hold their initial value.
    pub fn eval(
        &self,
        inputs: &Assignment,
        latches: Option<&Assignment>,
    ) -> Result<Evaluation, CircuitError> {
        if let Some(name) = inputs.keys().find(|name| self.input(name).is_none()) {
            return Err(CircuitError::UnknownPort { kind: PortKind::Input, name: name.clone() });
        }
        if let Some(name) =
            latches.and_then(|pinned| pinned.keys().find(|name| self.latch(name).is_none()))
        {
            return Err(CircuitError::UnknownPort { kind: PortKind::Latch, name: name.clone() });
        }

        let mut leaves = HashMap::new();
        for port in &self.inputs {
            let value =
                inputs.get(&port.name).ok_or_else(|| CircuitError::MissingInput(port.name.clone()))?;
            bind(&mut leaves, PortKind::Input, &port.name, &port.bits, value)?;
        }
        for latch in &self.latches {
            let value = latches.and_then(|pinned| pinned.get(&latch.name)).unwrap_or(&latch.init);
            bind(&mut leaves, PortKind::Latch, &latch.name, &latch.bits, value)?;
        }

        let values = self.aig.eval(&leaves);
        let read = |word: &Word| word.lits().iter().map(|lit| lit_value(&values, *lit)).collect();
        Ok(Evaluation {
            outputs: self.outputs.iter().map(|port| (port.name.clone(), read(&port.bits))).collect(),
            latches: self
                .latches
                .iter()
                .map(|latch| (latch.name.clone(), read(&latch.next)))
                .collect(),
        })
    }

    /// Returns a simulation cursor starting from the initial latch values.
    pub fn simulator(&self) -> Simulator<'_> {
        Simulator {
            circuit: self,
            latches: self.initial_latches(),
            steps: 0,
        }
    }
}

fn bind(
    leaves: &mut HashMap<NodeId, bool>,
    kind: PortKind,
    name: &str,
    bits: &Word,
    value: &Bits,
) -> Result<(), CircuitError> {
    if value.width() != bits.width() {
        return Err(CircuitError::WidthMismatch {
            kind,
            name: name.to_string(),
            expected: bits.width(),
            got: value.width(),
        });
    }
    for (lit, bit) in bits.lits().iter().zip(value.iter()) {
        leaves.insert(lit.node(), bit);
    }
    Ok(())
}

// SIMULATOR
// ================================================================================================

/// Stepping cursor over a circuit.
///
/// The caller owns the cursor and pulls as many steps as needed.
#[derive(Debug, Clone)]
pub struct Simulator<'c> {
    circuit: &'c Circuit,
    latches: Assignment,
    steps: usize,
}

impl Simulator<'_> {
    /// Evaluate one step with the given inputs and advance the latches.
    ///
    /// The returned evaluation carries the outputs of this step and the latch values that the
    /// next step will start from. On error the cursor is left unchanged.
    pub fn step(&mut self, inputs: &Assignment) -> Result<Evaluation, CircuitError> {
        let evaluation = self.circuit.eval(inputs, Some(&self.latches))?;
        self.latches = evaluation.latches.clone();
        self.steps += 1;
        tracing::trace!(step = self.steps, outputs = ?evaluation.outputs, "simulation step");
        Ok(evaluation)
    }

    /// Latch values the next step starts from.
    pub fn latches(&self) -> &Assignment {
        &self.latches
    }

    /// Number of steps taken since creation or the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn reset(&mut self) {
        self.latches = self.circuit.initial_latches();
        self.steps = 0;
    }
}
