//! Single bits and fixed-width bit vectors.

use bitvec::prelude::*;
use crate::branch::Outcome;

/// A bit vector. Index 0 holds the most-significant bit.
pub type Bits = BitVec<u8, Msb0>;

/// A borrowed view of a [Bits] vector.
pub type BitStr = BitSlice<u8, Msb0>;

/// A two-valued logic cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    pub fn is_one(self) -> bool { self == Self::One }
}

impl std::ops::BitXor for Bit {
    type Output = Self;
    fn bitxor(self, rhs: Self) -> Self {
        Self::from(bool::from(self) ^ bool::from(rhs))
    }
}

impl std::ops::Not for Bit {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }
}

impl From<bool> for Bit {
    fn from(x: bool) -> Self {
        match x {
            true => Self::One,
            false => Self::Zero,
        }
    }
}

impl From<Bit> for bool {
    fn from(b: Bit) -> bool { b == Bit::One }
}

impl From<Outcome> for Bit {
    fn from(o: Outcome) -> Self {
        match o {
            Outcome::T => Self::One,
            Outcome::N => Self::Zero,
        }
    }
}

impl std::fmt::Display for Bit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let c = match self {
            Self::Zero => '0',
            Self::One => '1',
        };
        write!(f, "{}", c)
    }
}

/// Build a `width`-bit vector from the low-order bits of `val`.
///
/// Bits above `usize::BITS` are zero.
pub fn bits_from_usize(val: usize, width: usize) -> Bits {
    (0..width).rev()
        .map(|i| i < usize::BITS as usize && (val >> i) & 1 == 1)
        .collect()
}

/// Read a bit vector as an unsigned integer (most-significant bit first).
///
/// Only meaningful for vectors no wider than `usize::BITS`.
pub fn bits_to_usize(bits: &BitStr) -> usize {
    bits.iter().by_vals().fold(0, |acc, b| (acc << 1) | (b as usize))
}

/// Render a bit vector as a string of '0' and '1', most-significant first.
pub fn render(bits: &BitStr) -> String {
    bits.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect()
}

/// Concatenate two bit vectors: `hi` occupies the most-significant end.
pub fn concat(hi: &BitStr, lo: &BitStr) -> Bits {
    let mut res = Bits::with_capacity(hi.len() + lo.len());
    res.extend_from_bitslice(hi);
    res.extend_from_bitslice(lo);
    res
}
