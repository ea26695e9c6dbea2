//! Combinational lookup tables.
//!
//! A table maps fixed-width address codes to fixed-width data codes. Addresses without an entry
//! produce the table default. Tables are lowered into a sum of products: one match term per entry
//! and one OR per data bit.

use std::collections::BTreeMap;

use crate::{Bits, Circuit, CircuitBuilder, CircuitError, Word, aig::Lit};

/// How an address is compared against the keys of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchMode {
    /// Compare every address bit; addresses outside the table select the default.
    #[default]
    Exact,
    /// Test only the bits that are set in each key.
    ///
    /// Smaller than [`MatchMode::Exact`], but only meaningful when every address is made of
    /// one-hot fields: an address with extra set bits may match several keys at once, and the
    /// default is only selected for addresses that match no key.
    SetBits,
}

/// An explicit code-to-code mapping with a default for unlisted codes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupTable {
    in_width: usize,
    out_width: usize,
    #[cfg_attr(feature = "serde", serde(with = "entry_list"))]
    entries: BTreeMap<Bits, Bits>,
    default: Bits,
}

/// Entries are written as a list of `(key, value)` pairs since keys are not strings.
#[cfg(feature = "serde")]
mod entry_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::Bits;

    pub fn serialize<S: Serializer>(
        entries: &BTreeMap<Bits, Bits>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(entries.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Bits, Bits>, D::Error> {
        let pairs = Vec::<(Bits, Bits)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl LookupTable {
    /// Create an empty table whose default is the all-zero code.
    pub fn new(in_width: usize, out_width: usize) -> Self {
        Self {
            in_width,
            out_width,
            entries: BTreeMap::new(),
            default: Bits::zeros(out_width),
        }
    }

    /// Replace the code produced for unlisted addresses.
    pub fn with_default(mut self, default: Bits) -> Result<Self, CircuitError> {
        if default.width() != self.out_width {
            return Err(CircuitError::TableWidthMismatch {
                key: Bits::zeros(self.in_width),
                value: default,
                in_width: self.in_width,
                out_width: self.out_width,
            });
        }
        self.default = default;
        Ok(self)
    }

    /// Add an entry. Every key may be inserted only once.
    pub fn insert(&mut self, key: Bits, value: Bits) -> Result<(), CircuitError> {
        if key.width() != self.in_width || value.width() != self.out_width {
            return Err(CircuitError::TableWidthMismatch {
                key,
                value,
                in_width: self.in_width,
                out_width: self.out_width,
            });
        }
        if let Some(existing) = self.entries.get(&key) {
            return Err(CircuitError::DuplicateTableKey { key, existing: existing.clone() });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn in_width(&self) -> usize {
        self.in_width
    }

    pub fn out_width(&self) -> usize {
        self.out_width
    }

    pub fn default_code(&self) -> &Bits {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for `key`, if listed.
    pub fn get(&self, key: &Bits) -> Option<&Bits> {
        self.entries.get(key)
    }

    /// Returns the code the table produces for `key`, falling back to the default.
    pub fn resolve(&self, key: &Bits) -> &Bits {
        self.entries.get(key).unwrap_or(&self.default)
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bits, &Bits)> {
        self.entries.iter()
    }
}

// CIRCUIT CONSTRUCTION
// ================================================================================================

impl CircuitBuilder {
    /// Lower `table` over `address` into gates and return the data word.
    pub fn lookup(
        &mut self,
        address: &Word,
        table: &LookupTable,
        mode: MatchMode,
    ) -> Result<Word, CircuitError> {
        if address.width() != table.in_width() {
            return Err(CircuitError::OperandWidthMismatch {
                op: "lookup",
                lhs: address.width(),
                rhs: table.in_width(),
            });
        }

        let mut matches = Vec::with_capacity(table.len());
        for (key, value) in table.iter() {
            let term = self.match_term(address, key, mode);
            matches.push((term, value));
        }

        let aig = self.aig_mut();
        let any_match = aig.or_all(matches.iter().map(|(term, _)| *term));
        let mut data = Vec::with_capacity(table.out_width());
        for bit in 0..table.out_width() {
            let selected = matches
                .iter()
                .filter(|(_, value)| value.get(bit) == Some(true))
                .map(|(term, _)| *term);
            let mut lit = aig.or_all(selected.collect::<Vec<_>>());
            if table.default_code().get(bit) == Some(true) {
                lit = aig.or(lit, !any_match);
            }
            data.push(lit);
        }
        Ok(Word::from(data))
    }

    fn match_term(&mut self, address: &Word, key: &Bits, mode: MatchMode) -> Lit {
        let literals = address.lits().iter().zip(key.iter());
        let aig = self.aig_mut();
        match mode {
            MatchMode::SetBits if key.count_ones() > 0 => {
                aig.and_all(literals.filter(|(_, set)| *set).map(|(lit, _)| *lit).collect::<Vec<_>>())
            },
            _ => aig.and_all(
                literals.map(|(lit, set)| if set { *lit } else { !*lit }).collect::<Vec<_>>(),
            ),
        }
    }
}

impl Circuit {
    /// Returns a combinational circuit realizing `table` from input `input` to output `output`.
    pub fn lookup(
        input: &str,
        output: &str,
        table: &LookupTable,
        mode: MatchMode,
    ) -> Result<Circuit, CircuitError> {
        let mut builder = CircuitBuilder::new();
        let address = builder.input(input, table.in_width())?;
        let data = builder.lookup(&address, table, mode)?;
        builder.output(output, &data)?;
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{LookupTable, MatchMode};
    use crate::{Bits, Circuit, CircuitError, sim::assignment};

    fn squares() -> LookupTable {
        let mut table = LookupTable::new(2, 4);
        for x in 0..3u64 {
            table.insert(Bits::from_u64(x, 2), Bits::from_u64(x * x, 4)).unwrap();
        }
        table
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 4)]
    #[case(3, 0)]
    fn exact_lookup_routes_unlisted_to_default(#[case] x: u64, #[case] expected: u64) {
        let circuit = Circuit::lookup("x", "y", &squares(), MatchMode::Exact).unwrap();
        let eval = circuit.eval(&assignment([("x", Bits::from_u64(x, 2))]), None).unwrap();
        assert_eq!(eval.output("y"), Some(&Bits::from_u64(expected, 4)));
    }

    #[test]
    fn custom_default_is_used_for_unlisted_codes() {
        let table = squares().with_default(Bits::from_u64(0b1111, 4)).unwrap();
        let circuit = Circuit::lookup("x", "y", &table, MatchMode::Exact).unwrap();
        let eval = circuit.eval(&assignment([("x", Bits::from_u64(3, 2))]), None).unwrap();
        assert_eq!(eval.output("y"), Some(&Bits::from_u64(0b1111, 4)));
        assert_eq!(table.resolve(&Bits::from_u64(3, 2)), &Bits::from_u64(0b1111, 4));
    }

    #[test]
    fn set_bits_lookup_agrees_on_one_hot_addresses() {
        let mut table = LookupTable::new(3, 2);
        table.insert(Bits::one_hot(0, 3), Bits::from_u64(1, 2)).unwrap();
        table.insert(Bits::one_hot(1, 3), Bits::from_u64(2, 2)).unwrap();
        table.insert(Bits::one_hot(2, 3), Bits::from_u64(3, 2)).unwrap();

        let exact = Circuit::lookup("x", "y", &table, MatchMode::Exact).unwrap();
        let masked = Circuit::lookup("x", "y", &table, MatchMode::SetBits).unwrap();
        assert!(masked.num_ands() <= exact.num_ands());
        for index in 0..3 {
            let inputs = assignment([("x", Bits::one_hot(index, 3))]);
            assert_eq!(
                exact.eval(&inputs, None).unwrap().outputs,
                masked.eval(&inputs, None).unwrap().outputs
            );
        }
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut table = squares();
        let err = table.insert(Bits::from_u64(1, 2), Bits::from_u64(9, 4)).unwrap_err();
        assert_eq!(
            err,
            CircuitError::DuplicateTableKey {
                key: Bits::from_u64(1, 2),
                existing: Bits::from_u64(1, 4),
            }
        );
    }

    #[test]
    fn entries_must_match_table_widths() {
        let mut table = LookupTable::new(2, 2);
        assert!(matches!(
            table.insert(Bits::zeros(3), Bits::zeros(2)),
            Err(CircuitError::TableWidthMismatch { .. })
        ));
    }
}
