//! Branch history registers.

use bitvec::prelude::*;
use std::collections::BTreeMap;
use itertools::Itertools;

use crate::bit::*;
use crate::error::PredictorError;

/// A fixed-width shift register.
///
/// Used both as a branch history register (a FIFO of the most recent
/// outcomes, newest in the least-significant position) and as a plain
/// holding register for a counter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftRegister {
    label: String,
    data: Bits,
}

impl std::fmt::Display for ShiftRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", render(&self.data))
    }
}

impl ShiftRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(label: impl Into<String>, len: usize) -> Self {
        Self {
            label: label.into(),
            data: bitvec![u8, Msb0; 0; len],
        }
    }

    pub fn len(&self) -> usize { self.data.len() }
    pub fn label(&self) -> &str { &self.label }

    /// Return the current contents.
    pub fn read(&self) -> &BitStr { &self.data }

    /// Replace the contents. The length of `bits` must match the register.
    pub fn load(&mut self, bits: &BitStr) -> Result<(), PredictorError> {
        PredictorError::check_len("register load", self.len(), bits.len())?;
        self.data.copy_from_bitslice(bits);
        Ok(())
    }

    /// Shift every bit one position toward the most-significant end,
    /// discard the oldest bit, and place `bit` in the least-significant
    /// position.
    pub fn insert(&mut self, bit: Bit) {
        let len = self.len();
        if len == 0 {
            return;
        }
        self.data.shift_left(1);
        self.data.set(len - 1, bit.into());
    }

    /// Diagnostic dump of the register.
    pub fn monitor(&self) -> String {
        format!("{}: {}\n", self.label, self)
    }
}

/// A set of [ShiftRegister], one for each distinct address key.
///
/// Addresses are projected onto their low-order `key_bits` bits. A register
/// is created (all zero) the first time its key is seen.
#[derive(Clone, Debug)]
pub struct RegisterBank {
    label: String,
    key_bits: usize,
    reg_bits: usize,
    data: BTreeMap<Bits, ShiftRegister>,
}

impl RegisterBank {
    pub fn new(label: impl Into<String>, key_bits: usize, reg_bits: usize)
        -> Self
    {
        Self {
            label: label.into(),
            key_bits,
            reg_bits,
            data: BTreeMap::new(),
        }
    }

    pub fn key_bits(&self) -> usize { self.key_bits }
    pub fn reg_bits(&self) -> usize { self.reg_bits }

    /// Number of registers created so far.
    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Project an address onto the key used to select a register.
    pub fn key(&self, address: &BitStr) -> Result<Bits, PredictorError> {
        if address.len() < self.key_bits {
            return Err(PredictorError::LengthMismatch {
                what: "register bank address",
                expected: self.key_bits,
                found: address.len(),
            });
        }
        Ok(address[address.len() - self.key_bits..].to_bitvec())
    }

    /// Return the register selected by `address`, creating it if necessary.
    pub fn read(&mut self, address: &BitStr)
        -> Result<&mut ShiftRegister, PredictorError>
    {
        let key = self.key(address)?;
        let reg_bits = self.reg_bits;
        let label = &self.label;
        Ok(self.data.entry(key).or_insert_with_key(|k| {
            ShiftRegister::new(format!("{}[{}]", label, render(k)), reg_bits)
        }))
    }

    /// Return the register selected by `address` without creating it.
    pub fn get(&self, address: &BitStr) -> Option<&ShiftRegister> {
        let key = self.key(address).ok()?;
        self.data.get(&key)
    }

    /// Load `bits` into the register selected by `address`.
    pub fn write(&mut self, address: &BitStr, bits: &BitStr)
        -> Result<(), PredictorError>
    {
        self.read(address)?.load(bits)
    }

    /// Diagnostic dump of every register in the bank.
    pub fn monitor(&self) -> String {
        if self.data.is_empty() {
            return format!("{}: <empty>\n", self.label);
        }
        self.data.values().map(|r| r.monitor()).join("")
    }
}
