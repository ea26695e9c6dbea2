use core::fmt;

use smallvec::SmallVec;

/// A fixed-width bit vector.
///
/// Bit 0 is the least significant bit. Concatenation places the left operand in the low-order
/// bits, so `a.concat(&b)` has `a` at positions `0..a.width()` and `b` above it.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bits(SmallVec<[bool; 16]>);

impl Bits {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns a vector of `width` cleared bits.
    pub fn zeros(width: usize) -> Self {
        Self(SmallVec::from_elem(false, width))
    }

    /// Returns a vector of `width` bits with only bit `index` set.
    ///
    /// If `index >= width` the result has no bit set.
    pub fn one_hot(index: usize, width: usize) -> Self {
        let mut bits = Self::zeros(width);
        if index < width {
            bits.0[index] = true;
        }
        bits
    }

    /// Returns the low `width` bits of `value`; bits above 64 are zero.
    pub fn from_u64(value: u64, width: usize) -> Self {
        (0..width).map(|i| i < 64 && (value >> i) & 1 == 1).collect()
    }

    // ACCESSORS
    // --------------------------------------------------------------------------------------------

    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bit at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|bit| **bit).count()
    }

    /// Returns true if exactly one bit is set.
    pub fn is_one_hot(&self) -> bool {
        self.count_ones() == 1
    }

    /// Returns the position of the set bit if exactly one bit is set.
    pub fn one_hot_index(&self) -> Option<usize> {
        if !self.is_one_hot() {
            return None;
        }
        self.0.iter().position(|bit| *bit)
    }

    /// Returns the vector as an unsigned integer, or `None` if a bit at position 64 or above is
    /// set.
    pub fn to_u64(&self) -> Option<u64> {
        let mut value = 0u64;
        for (i, bit) in self.iter().enumerate() {
            if !bit {
                continue;
            }
            if i >= 64 {
                return None;
            }
            value |= 1 << i;
        }
        Some(value)
    }

    // TRANSFORMATIONS
    // --------------------------------------------------------------------------------------------

    /// Returns `self` in the low-order bits followed by `high` in the high-order bits.
    pub fn concat(&self, high: &Bits) -> Bits {
        self.iter().chain(high.iter()).collect()
    }

    /// Splits the vector into its low `mid` bits and the remaining high bits.
    ///
    /// # Panics
    /// Panics if `mid > self.width()`.
    pub fn split_at(&self, mid: usize) -> (Bits, Bits) {
        let (low, high) = self.0.split_at(mid);
        (Bits::from(low), Bits::from(high))
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&[bool]> for Bits {
    fn from(bits: &[bool]) -> Self {
        Self(SmallVec::from_slice(bits))
    }
}

impl<const N: usize> From<[bool; N]> for Bits {
    fn from(bits: [bool; N]) -> Self {
        Self(SmallVec::from_slice(&bits))
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0b")?;
        if self.is_empty() {
            return f.write_str("_");
        }
        for bit in self.0.iter().rev() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Bits;

    #[test]
    fn one_hot_sets_single_bit() {
        let bits = Bits::one_hot(2, 4);
        assert_eq!(bits.as_slice(), &[false, false, true, false]);
        assert!(bits.is_one_hot());
        assert_eq!(bits.one_hot_index(), Some(2));
        assert_eq!(bits.to_string(), "0b0100");
    }

    #[test]
    fn one_hot_out_of_range_is_zero() {
        let bits = Bits::one_hot(5, 3);
        assert_eq!(bits, Bits::zeros(3));
        assert_eq!(bits.one_hot_index(), None);
    }

    #[test]
    fn concat_places_receiver_low() {
        let low = Bits::from([true, false]);
        let high = Bits::from([false, false, true]);
        let joined = low.concat(&high);
        assert_eq!(joined.width(), 5);
        assert_eq!(joined.to_u64(), Some(0b10001));
        assert_eq!(joined.split_at(2), (low, high));
    }

    #[test]
    fn empty_vector_displays_placeholder() {
        assert_eq!(Bits::zeros(0).to_string(), "0b_");
    }

    proptest! {
        #[test]
        fn from_u64_round_trips(value in 0u64..1 << 20) {
            let bits = Bits::from_u64(value, 20);
            prop_assert_eq!(bits.width(), 20);
            prop_assert_eq!(bits.to_u64(), Some(value));
            prop_assert_eq!(bits.count_ones(), value.count_ones() as usize);
        }
    }
}
