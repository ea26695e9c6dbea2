//! Circuit composition: parallel and sequential combination, renaming, and feedback.

use std::collections::{HashMap, HashSet};

use crate::{
    Bits, Circuit, CircuitError, PortKind,
    aig::{ImportMap, Lit, NodeId},
    circuit::{Latch, Port},
};

/// Feedback wiring from an output back into an input through a new latch.
///
/// The latch takes the name of `input`. When `keep_output` is true the output port stays visible,
/// exposing the value the latch will hold after the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loopback {
    pub input: String,
    pub output: String,
    /// Initial latch value; all zeros when `None`.
    pub init: Option<Bits>,
    pub keep_output: bool,
}

impl Loopback {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            init: None,
            keep_output: false,
        }
    }

    pub fn with_init(mut self, init: Bits) -> Self {
        self.init = Some(init);
        self
    }

    pub fn with_keep_output(mut self, keep_output: bool) -> Self {
        self.keep_output = keep_output;
        self
    }
}

impl Circuit {
    /// Parallel composition.
    ///
    /// Inputs with the same name are shared and must have the same width. Outputs and latches of
    /// the two circuits must have distinct names.
    pub fn par(&self, other: &Circuit) -> Result<Circuit, CircuitError> {
        let mut bindings = HashMap::new();
        for port in &other.inputs {
            if let Some(shared) = self.input(&port.name) {
                check_width(PortKind::Input, shared, port)?;
                bind_port(&mut bindings, port, shared.bits.lits());
            }
        }

        let mut result = self.clone();
        let map = result.aig.import(&other.aig, |id| bindings.get(&id).copied());
        for port in &other.inputs {
            if self.input(&port.name).is_none() {
                result.inputs.push(translate_port(&map, port));
            }
        }
        result.outputs.extend(other.outputs.iter().map(|port| translate_port(&map, port)));
        result.latches.extend(other.latches.iter().map(|latch| translate_latch(&map, latch)));
        result.ensure_unique()?;
        Ok(result)
    }

    /// Sequential composition: outputs of `self` feed the same-named inputs of `other`.
    ///
    /// Outputs of `self` that `other` consumes are hidden; the remaining outputs of `self` are
    /// passed through next to the outputs of `other`. Inputs of `other` that are not driven by
    /// `self` become inputs of the result, shared with same-named inputs of `self`.
    pub fn seq(&self, other: &Circuit) -> Result<Circuit, CircuitError> {
        let mut bindings = HashMap::new();
        let mut consumed = HashSet::new();
        for port in &other.inputs {
            if let Some(driver) = self.output(&port.name) {
                check_width(PortKind::Input, driver, port)?;
                bind_port(&mut bindings, port, driver.bits.lits());
                consumed.insert(port.name.clone());
            } else if let Some(shared) = self.input(&port.name) {
                check_width(PortKind::Input, shared, port)?;
                bind_port(&mut bindings, port, shared.bits.lits());
            }
        }

        let mut result = self.clone();
        let map = result.aig.import(&other.aig, |id| bindings.get(&id).copied());
        result.outputs.retain(|port| !consumed.contains(&port.name));
        for port in &other.inputs {
            if !consumed.contains(&port.name) && self.input(&port.name).is_none() {
                result.inputs.push(translate_port(&map, port));
            }
        }
        result.outputs.extend(other.outputs.iter().map(|port| translate_port(&map, port)));
        result.latches.extend(other.latches.iter().map(|latch| translate_latch(&map, latch)));
        result.ensure_unique()?;
        Ok(result)
    }

    /// Rename input ports; `renames` holds `(from, to)` pairs.
    pub fn rename_inputs(mut self, renames: &[(&str, &str)]) -> Result<Circuit, CircuitError> {
        rename_ports(&mut self.inputs, PortKind::Input, renames)?;
        self.ensure_unique()?;
        Ok(self)
    }

    /// Rename output ports; `renames` holds `(from, to)` pairs.
    pub fn rename_outputs(mut self, renames: &[(&str, &str)]) -> Result<Circuit, CircuitError> {
        rename_ports(&mut self.outputs, PortKind::Output, renames)?;
        self.ensure_unique()?;
        Ok(self)
    }

    /// Close a feedback loop: input `feedback.input` becomes a latch driven by output
    /// `feedback.output`.
    pub fn loopback(mut self, feedback: Loopback) -> Result<Circuit, CircuitError> {
        let input_pos =
            self.inputs.iter().position(|port| port.name == feedback.input).ok_or_else(|| {
                CircuitError::UnknownPort { kind: PortKind::Input, name: feedback.input.clone() }
            })?;
        let output_pos =
            self.outputs.iter().position(|port| port.name == feedback.output).ok_or_else(|| {
                CircuitError::UnknownPort { kind: PortKind::Output, name: feedback.output.clone() }
            })?;

        let width = self.inputs[input_pos].width();
        let next = self.outputs[output_pos].bits.clone();
        if next.width() != width {
            return Err(CircuitError::WidthMismatch {
                kind: PortKind::Output,
                name: feedback.output,
                expected: width,
                got: next.width(),
            });
        }
        let init = feedback.init.unwrap_or_else(|| Bits::zeros(width));
        if init.width() != width {
            return Err(CircuitError::WidthMismatch {
                kind: PortKind::Latch,
                name: feedback.input,
                expected: width,
                got: init.width(),
            });
        }

        let input = self.inputs.remove(input_pos);
        if !feedback.keep_output {
            self.outputs.remove(output_pos);
        }
        self.latches.push(Latch { name: input.name, init, bits: input.bits, next });
        self.ensure_unique()?;
        Ok(self)
    }
}

// HELPERS
// ================================================================================================

fn check_width(kind: PortKind, expected: &Port, got: &Port) -> Result<(), CircuitError> {
    if expected.width() != got.width() {
        return Err(CircuitError::WidthMismatch {
            kind,
            name: got.name.clone(),
            expected: expected.width(),
            got: got.width(),
        });
    }
    Ok(())
}

/// Binds the leaves of `port` to `lits`, bit by bit.
fn bind_port(bindings: &mut HashMap<NodeId, Lit>, port: &Port, lits: &[Lit]) {
    for (leaf, lit) in port.bits.lits().iter().zip(lits) {
        bindings.insert(leaf.node(), *lit);
    }
}

fn translate_port(map: &ImportMap, port: &Port) -> Port {
    Port {
        name: port.name.clone(),
        bits: map.lits(port.bits.lits()).collect(),
    }
}

fn translate_latch(map: &ImportMap, latch: &Latch) -> Latch {
    Latch {
        name: latch.name.clone(),
        init: latch.init.clone(),
        bits: map.lits(latch.bits.lits()).collect(),
        next: map.lits(latch.next.lits()).collect(),
    }
}

fn rename_ports(
    ports: &mut [Port],
    kind: PortKind,
    renames: &[(&str, &str)],
) -> Result<(), CircuitError> {
    let mut targets = Vec::with_capacity(renames.len());
    for (from, to) in renames {
        let pos = ports.iter().position(|port| port.name == *from).ok_or_else(|| {
            CircuitError::UnknownPort { kind, name: from.to_string() }
        })?;
        targets.push((pos, *to));
    }
    for (pos, to) in targets {
        ports[pos].name = to.to_string();
    }
    Ok(())
}
