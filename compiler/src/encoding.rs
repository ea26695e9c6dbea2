//! Bijections between alphabets and fixed-width bit-vector codes.

use core::{fmt::Debug, hash::Hash};
use std::collections::HashMap;

use aigdfa_circuit::Bits;

use crate::{AlphabetKind, CompileError, EncodingScheme};

// ENCODING
// ================================================================================================

/// A bijection between the symbols of an alphabet and their codes.
///
/// Symbols are numbered in the order they were supplied; the code of symbol `i` is
/// `one_hot(i)` or `i` in binary, depending on the scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding<T: Eq + Hash> {
    kind: AlphabetKind,
    scheme: EncodingScheme,
    width: usize,
    symbols: Vec<T>,
    index: HashMap<T, usize>,
}

impl<T: Clone + Eq + Hash + Debug> Encoding<T> {
    /// Numbers the symbols of `alphabet` in order; repeated symbols keep their first position.
    ///
    /// # Errors
    /// Returns an error if the alphabet is empty.
    pub fn new(
        kind: AlphabetKind,
        alphabet: impl IntoIterator<Item = T>,
        scheme: EncodingScheme,
    ) -> Result<Self, CompileError> {
        let mut symbols = Vec::new();
        let mut index = HashMap::new();
        for symbol in alphabet {
            if !index.contains_key(&symbol) {
                index.insert(symbol.clone(), symbols.len());
                symbols.push(symbol);
            }
        }
        if symbols.is_empty() {
            return Err(CompileError::EmptyAlphabet(kind));
        }
        Ok(Self {
            kind,
            scheme,
            width: scheme.width(symbols.len()),
            symbols,
            index,
        })
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    pub fn kind(&self) -> AlphabetKind {
        self.kind
    }

    pub fn scheme(&self) -> EncodingScheme {
        self.scheme
    }

    /// Width of every code.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in code order.
    pub fn symbols(&self) -> &[T] {
        &self.symbols
    }

    /// `(symbol, code)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, Bits)> + '_ {
        self.symbols.iter().enumerate().map(|(pos, symbol)| (symbol, self.code_at(pos)))
    }

    // ENCODING / DECODING
    // --------------------------------------------------------------------------------------------

    /// Returns the code of `symbol`, or `None` if it is not part of the alphabet.
    pub fn encode(&self, symbol: &T) -> Option<Bits> {
        self.index.get(symbol).map(|pos| self.code_at(*pos))
    }

    /// Returns the symbol whose code is `code`.
    ///
    /// Codes of the wrong width, one-hot codes without exactly one set bit, and binary codes at
    /// or above the alphabet size decode to `None`.
    pub fn decode(&self, code: &Bits) -> Option<&T> {
        if code.width() != self.width {
            return None;
        }
        let pos = match self.scheme {
            EncodingScheme::OneHot => code.one_hot_index()?,
            EncodingScheme::Binary => usize::try_from(code.to_u64()?).ok()?,
        };
        self.symbols.get(pos)
    }

    /// Like [`Encoding::encode`], but reports a missing symbol as an error.
    pub fn try_encode(&self, symbol: &T) -> Result<Bits, CompileError> {
        self.encode(symbol).ok_or_else(|| CompileError::unencoded(self.kind, symbol))
    }

    /// Like [`Encoding::decode`], but reports an undecodable code as an error.
    pub fn try_decode(&self, code: &Bits) -> Result<&T, CompileError> {
        self.decode(code).ok_or_else(|| CompileError::UndecodableCode {
            alphabet: self.kind,
            code: code.clone(),
        })
    }

    fn code_at(&self, pos: usize) -> Bits {
        match self.scheme {
            EncodingScheme::OneHot => Bits::one_hot(pos, self.width),
            EncodingScheme::Binary => Bits::from_u64(pos as u64, self.width),
        }
    }
}

// RELABELING
// ================================================================================================

/// The three encodings of a compiled automaton.
///
/// Produced by compilation and consumed by decompilation to translate raw codes back into
/// symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relabeling<I: Eq + Hash, O: Eq + Hash, S: Eq + Hash> {
    inputs: Encoding<I>,
    outputs: Encoding<O>,
    states: Encoding<S>,
}

impl<I, O, S> Relabeling<I, O, S>
where
    I: Clone + Eq + Hash + Debug,
    O: Clone + Eq + Hash + Debug,
    S: Clone + Eq + Hash + Debug,
{
    pub fn new(inputs: Encoding<I>, outputs: Encoding<O>, states: Encoding<S>) -> Self {
        Self { inputs, outputs, states }
    }

    pub fn inputs(&self) -> &Encoding<I> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Encoding<O> {
        &self.outputs
    }

    pub fn states(&self) -> &Encoding<S> {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use aigdfa_circuit::Bits;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::Encoding;
    use crate::{AlphabetKind, CompileError, EncodingScheme};

    fn scheme() -> impl Strategy<Value = EncodingScheme> {
        prop_oneof![Just(EncodingScheme::OneHot), Just(EncodingScheme::Binary)]
    }

    #[test]
    fn repeated_symbols_keep_first_position() {
        let enc =
            Encoding::new(AlphabetKind::States, ["x", "y", "x", "z"], EncodingScheme::OneHot)
                .unwrap();
        assert_eq!(enc.symbols(), &["x", "y", "z"]);
        assert_eq!(enc.encode(&"z"), Some(Bits::one_hot(2, 3)));
    }

    #[test]
    fn empty_alphabet_is_rejected() {
        let err = Encoding::<u8>::new(AlphabetKind::Outputs, [], EncodingScheme::Binary);
        assert!(matches!(err, Err(CompileError::EmptyAlphabet(AlphabetKind::Outputs))));
    }

    #[test]
    fn illegal_codes_decode_to_nothing() {
        let one_hot = Encoding::new(AlphabetKind::Inputs, 0..3u8, EncodingScheme::OneHot).unwrap();
        assert_eq!(one_hot.decode(&Bits::zeros(3)), None);
        assert_eq!(one_hot.decode(&Bits::from_u64(0b011, 3)), None);
        assert_eq!(one_hot.decode(&Bits::one_hot(0, 4)), None);

        let binary = Encoding::new(AlphabetKind::Inputs, 0..3u8, EncodingScheme::Binary).unwrap();
        assert_eq!(binary.width(), 2);
        assert_eq!(binary.decode(&Bits::from_u64(2, 2)), Some(&2));
        assert_eq!(binary.decode(&Bits::from_u64(3, 2)), None);
        assert!(matches!(
            binary.try_decode(&Bits::from_u64(3, 2)),
            Err(CompileError::UndecodableCode { alphabet: AlphabetKind::Inputs, .. })
        ));
    }

    #[test]
    fn missing_input_symbols_are_invalid_inputs() {
        let enc = Encoding::new(AlphabetKind::Inputs, ['a'], EncodingScheme::OneHot).unwrap();
        assert!(matches!(enc.try_encode(&'q'), Err(CompileError::InvalidInputEncoding(s)) if s == "'q'"));
    }

    proptest! {
        #[test]
        fn encoding_is_a_bijection(size in 1usize..40, scheme in scheme()) {
            let enc = Encoding::new(AlphabetKind::States, 0..size, scheme).unwrap();
            prop_assert_eq!(enc.width(), scheme.width(size));
            let mut seen = std::collections::HashSet::new();
            for (symbol, code) in enc.iter() {
                prop_assert_eq!(code.width(), enc.width());
                if scheme == EncodingScheme::OneHot {
                    prop_assert!(code.is_one_hot());
                }
                prop_assert!(seen.insert(code.clone()));
                prop_assert_eq!(enc.decode(&code), Some(symbol));
            }
            prop_assert_eq!(seen.len(), size);
        }
    }
}
