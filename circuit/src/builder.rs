use crate::{
    Bits, Circuit, CircuitError, PortKind, Word,
    aig::{Aig, Lit},
    circuit::{Latch, Port},
};

/// Incremental construction of a [`Circuit`].
///
/// Ports are declared by name; word-level operations are lowered to AND gates immediately. Every
/// latch declared with [`CircuitBuilder::latch`] must be driven with
/// [`CircuitBuilder::drive_latch`] before [`CircuitBuilder::finish`] is called.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    aig: Aig,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    latches: Vec<PendingLatch>,
}

#[derive(Debug)]
struct PendingLatch {
    name: String,
    init: Bits,
    bits: Word,
    next: Option<Word>,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the underlying graph for bit-level gates.
    pub fn aig_mut(&mut self) -> &mut Aig {
        &mut self.aig
    }

    // PORTS
    // --------------------------------------------------------------------------------------------

    /// Declare an input port and return the word carrying its value.
    pub fn input(&mut self, name: impl Into<String>, width: usize) -> Result<Word, CircuitError> {
        let name = name.into();
        if self.inputs.iter().any(|port| port.name == name) {
            return Err(CircuitError::DuplicatePort { kind: PortKind::Input, name });
        }
        let bits: Word = (0..width).map(|_| self.aig.leaf()).collect();
        self.inputs.push(Port { name, bits: bits.clone() });
        Ok(bits)
    }

    /// Declare a latch with the given initial value and return the word carrying its current
    /// value. The latch width is the width of `init`.
    pub fn latch(&mut self, name: impl Into<String>, init: Bits) -> Result<Word, CircuitError> {
        let name = name.into();
        if self.latches.iter().any(|latch| latch.name == name) {
            return Err(CircuitError::DuplicatePort { kind: PortKind::Latch, name });
        }
        let bits: Word = (0..init.width()).map(|_| self.aig.leaf()).collect();
        self.latches.push(PendingLatch { name, init, bits: bits.clone(), next: None });
        Ok(bits)
    }

    /// Set the word latched into `name` at the end of each step.
    pub fn drive_latch(&mut self, name: &str, next: &Word) -> Result<(), CircuitError> {
        let latch = self.latches.iter_mut().find(|latch| latch.name == name).ok_or_else(|| {
            CircuitError::UnknownPort { kind: PortKind::Latch, name: name.to_string() }
        })?;
        if latch.bits.width() != next.width() {
            return Err(CircuitError::WidthMismatch {
                kind: PortKind::Latch,
                name: name.to_string(),
                expected: latch.bits.width(),
                got: next.width(),
            });
        }
        latch.next = Some(next.clone());
        Ok(())
    }

    /// Expose `word` as an output port.
    pub fn output(&mut self, name: impl Into<String>, word: &Word) -> Result<(), CircuitError> {
        let name = name.into();
        if self.outputs.iter().any(|port| port.name == name) {
            return Err(CircuitError::DuplicatePort { kind: PortKind::Output, name });
        }
        self.outputs.push(Port { name, bits: word.clone() });
        Ok(())
    }

    /// Consume the builder and return the finished circuit.
    pub fn finish(self) -> Result<Circuit, CircuitError> {
        let latches = self
            .latches
            .into_iter()
            .map(|latch| match latch.next {
                Some(next) => Ok(Latch {
                    name: latch.name,
                    init: latch.init,
                    bits: latch.bits,
                    next,
                }),
                None => Err(CircuitError::UndrivenLatch(latch.name)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Circuit {
            aig: self.aig,
            inputs: self.inputs,
            outputs: self.outputs,
            latches,
        })
    }

    // WORD OPERATIONS
    // --------------------------------------------------------------------------------------------

    pub fn constant(&self, value: &Bits) -> Word {
        value.iter().map(Lit::constant).collect()
    }

    pub fn not(&self, word: &Word) -> Word {
        word.lits().iter().map(|lit| !*lit).collect()
    }

    pub fn and(&mut self, a: &Word, b: &Word) -> Result<Word, CircuitError> {
        self.zip_with("and", a, b, Aig::and)
    }

    pub fn or(&mut self, a: &Word, b: &Word) -> Result<Word, CircuitError> {
        self.zip_with("or", a, b, Aig::or)
    }

    pub fn xor(&mut self, a: &Word, b: &Word) -> Result<Word, CircuitError> {
        self.zip_with("xor", a, b, Aig::xor)
    }

    /// Single-bit equality test of two words.
    pub fn eq(&mut self, a: &Word, b: &Word) -> Result<Lit, CircuitError> {
        let diff = self.xor(a, b)?;
        Ok(self.is_zero(&diff))
    }

    /// True iff every bit of `word` is clear.
    pub fn is_zero(&mut self, word: &Word) -> Lit {
        !self.any(word)
    }

    /// True iff some bit of `word` is set.
    pub fn any(&mut self, word: &Word) -> Lit {
        self.aig.or_all(word.lits().iter().copied())
    }

    /// Returns `word - 1`, wrapping at zero.
    pub fn decrement(&mut self, word: &Word) -> Word {
        let mut borrow = Lit::TRUE;
        let mut result = Vec::with_capacity(word.width());
        for bit in word.lits() {
            result.push(self.aig.xor(*bit, borrow));
            borrow = self.aig.and(!*bit, borrow);
        }
        Word::from(result)
    }

    /// Returns `low` in the low-order bits followed by `high`.
    pub fn concat(&self, low: &Word, high: &Word) -> Word {
        low.lits().iter().chain(high.lits()).copied().collect()
    }

    /// `sel ? when_true : when_false`, bitwise.
    pub fn ite(
        &mut self,
        sel: Lit,
        when_true: &Word,
        when_false: &Word,
    ) -> Result<Word, CircuitError> {
        self.zip_with("ite", when_true, when_false, |aig, t, f| aig.mux(sel, t, f))
    }

    fn zip_with(
        &mut self,
        op: &'static str,
        a: &Word,
        b: &Word,
        mut gate: impl FnMut(&mut Aig, Lit, Lit) -> Lit,
    ) -> Result<Word, CircuitError> {
        if a.width() != b.width() {
            return Err(CircuitError::OperandWidthMismatch { op, lhs: a.width(), rhs: b.width() });
        }
        Ok(a.lits().iter().zip(b.lits()).map(|(x, y)| gate(&mut self.aig, *x, *y)).collect())
    }
}
