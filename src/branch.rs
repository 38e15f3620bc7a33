//! Types for representing branches and branch outcomes.

use crate::bit::*;

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Not taken
    N = 0,
    /// Taken
    T = 1
}

impl Outcome {
    pub fn is_taken(self) -> bool { self == Self::T }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N
        }
    }
}

impl From<Outcome> for bool {
    fn from(o: Outcome) -> bool { o.is_taken() }
}

/// A branch instruction, identified by a fixed-width address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BranchInstruction {
    addr: Bits,
}
impl BranchInstruction {
    /// Create an instruction from the low-order `width` bits of `pc`.
    pub fn new(pc: usize, width: usize) -> Self {
        Self { addr: bits_from_usize(pc, width) }
    }

    pub fn from_bits(addr: Bits) -> Self {
        Self { addr }
    }

    /// The address bits (most-significant first).
    pub fn address(&self) -> &BitStr { &self.addr }

    /// The address as an integer.
    pub fn pc(&self) -> usize { bits_to_usize(&self.addr) }

    pub fn width(&self) -> usize { self.addr.len() }
}

impl std::fmt::Display for BranchInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", render(&self.addr))
    }
}
