//! Construction-time predictor configuration.

use crate::error::PredictorError;
use crate::predictor::{ TwoLevelPredictor, Variant };

/// Strategy used to fold a branch address into a set index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashMode {
    /// Fold address bit `i` into output bit `i mod K` with XOR.
    Xor,
    /// Declared, but not implemented.
    Truncate,
}

/// Counter update discipline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountMode {
    /// Clamp at zero and at the maximum value.
    Saturating,
    /// Declared, but not implemented.
    Wrapping,
}

/// Widths and modes shared by every two-level predictor organization.
///
/// Not every organization uses every field (GAg never looks at the
/// address), but all of them are validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictorConfig {
    /// Width of each branch history register
    pub history_bits: usize,

    /// Width of each saturating counter
    pub counter_bits: usize,

    /// Width of a branch address
    pub address_bits: usize,

    /// Width of the set index (or PAs table selector)
    pub set_bits: usize,

    pub hash_mode: HashMode,
    pub count_mode: CountMode,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            history_bits: 4,
            counter_bits: 2,
            address_bits: 8,
            set_bits: 4,
            hash_mode: HashMode::Xor,
            count_mode: CountMode::Saturating,
        }
    }
}

impl PredictorConfig {
    /// Check that the configuration describes a usable predictor.
    pub fn validate(&self) -> Result<(), PredictorError> {
        let widths = [
            ("history_bits", self.history_bits),
            ("counter_bits", self.counter_bits),
            ("address_bits", self.address_bits),
            ("set_bits", self.set_bits),
        ];
        if let Some(&(field, _)) = widths.iter().find(|&&(_, w)| w == 0) {
            return Err(PredictorError::ZeroWidth { field });
        }
        if self.set_bits > self.address_bits {
            return Err(PredictorError::SelectorTooWide {
                selector: self.set_bits,
                address: self.address_bits,
            });
        }
        if self.hash_mode != HashMode::Xor {
            return Err(PredictorError::UnsupportedHashMode(self.hash_mode));
        }
        if self.count_mode != CountMode::Saturating {
            return Err(PredictorError::UnsupportedCountMode(self.count_mode));
        }
        Ok(())
    }

    /// Validate this configuration and build a predictor with the given
    /// organization.
    pub fn build(self, variant: Variant)
        -> Result<TwoLevelPredictor, PredictorError>
    {
        TwoLevelPredictor::new(variant, self)
    }
}
