//! Errors reported by predictor construction and operation.

use thiserror::Error;
use crate::config::{ CountMode, HashMode };

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PredictorError {
    /// A configured width is zero.
    #[error("invalid configuration: {field} must be non-zero")]
    ZeroWidth { field: &'static str },

    /// The set/selector width is wider than a branch address.
    #[error("invalid configuration: selector width {selector} exceeds address width {address}")]
    SelectorTooWide { selector: usize, address: usize },

    #[error("invalid configuration: hash mode {0:?} is not implemented")]
    UnsupportedHashMode(HashMode),

    #[error("invalid configuration: count mode {0:?} is not implemented")]
    UnsupportedCountMode(CountMode),

    /// A bit vector had the wrong width for the register or table it was
    /// handed to.
    #[error("{what}: expected {expected} bits, found {found}")]
    LengthMismatch { what: &'static str, expected: usize, found: usize },

    /// A table entry was read before it was ever written.
    #[error("no table entry for key {key}")]
    MissingEntry { key: String },

    #[error("unknown predictor variant '{0}'")]
    UnknownVariant(String),
}

impl PredictorError {
    /// Fail with [PredictorError::LengthMismatch] unless `found == expected`.
    pub(crate) fn check_len(what: &'static str, expected: usize, found: usize)
        -> Result<(), Self>
    {
        if expected != found {
            return Err(Self::LengthMismatch { what, expected, found });
        }
        Ok(())
    }
}
