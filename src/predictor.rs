//! Two-level adaptive branch predictors.
//!
//! All eight organizations share the same engine ([TwoLevelPredictor]) and
//! differ only in where branch history is kept and how the pattern history
//! table is indexed. See "Alternative Implementations of Two-Level Adaptive
//! Branch Prediction" (Yeh and Patt, 1992).

pub mod two_level;
pub use two_level::*;

use crate::branch::*;
use crate::error::PredictorError;

/// Interface to a predictor whose state is only changed by the correct
/// branch outcome.
///
/// For each dynamic branch, [BranchPredictor::predict] must be called
/// before [BranchPredictor::update], and branches must be presented in the
/// order they retire.
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted outcome for this branch.
    ///
    /// Missing registers and table entries are created with their
    /// all-zero defaults; nothing else changes.
    fn predict(&mut self, inst: &BranchInstruction)
        -> Result<Outcome, PredictorError>;

    /// Train the predictor with the correct outcome for this branch.
    fn update(&mut self, inst: &BranchInstruction, outcome: Outcome)
        -> Result<(), PredictorError>;

    /// Human-readable snapshot of all registers and tables.
    fn monitor(&self) -> String;
}

/// Where branch history is recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryScope {
    /// A single global history register
    Global,
    /// One history register per branch address
    PerAddress,
    /// One history register per set of addresses (selected by hashing)
    PerSet,
}

/// How the key into the pattern history table is formed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexScheme {
    /// The history register alone
    History,
    /// The history register alone, in a table with room for 2^K selector
    /// rows
    SelectedHistory,
    /// The full branch address followed by the history register
    AddressHistory,
    /// The hashed branch address followed by the history register
    SetHistory,
}

/// The eight classic two-level organizations.
///
/// The first letter names the history scope (Global, Per-address, per-Set),
/// the last names the pattern table scope (global, per-address, per-set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant { GAg, GAp, PAg, PAp, PAs, SAg, SAp, SAs }

impl Variant {
    pub const ALL: [Variant; 8] = [
        Self::GAg, Self::GAp,
        Self::PAg, Self::PAp, Self::PAs,
        Self::SAg, Self::SAp, Self::SAs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GAg => "GAg",
            Self::GAp => "GAp",
            Self::PAg => "PAg",
            Self::PAp => "PAp",
            Self::PAs => "PAs",
            Self::SAg => "SAg",
            Self::SAp => "SAp",
            Self::SAs => "SAs",
        }
    }

    pub fn history_scope(&self) -> HistoryScope {
        match self {
            Self::GAg | Self::GAp => HistoryScope::Global,
            Self::PAg | Self::PAp | Self::PAs => HistoryScope::PerAddress,
            Self::SAg | Self::SAp | Self::SAs => HistoryScope::PerSet,
        }
    }

    // NOTE: PAs does not hash the address into its index; it differs from
    // PAg only in the size of its table.
    pub fn index_scheme(&self) -> IndexScheme {
        match self {
            Self::GAg | Self::PAg | Self::SAg => IndexScheme::History,
            Self::PAs => IndexScheme::SelectedHistory,
            Self::GAp | Self::PAp | Self::SAp => IndexScheme::AddressHistory,
            Self::SAs => IndexScheme::SetHistory,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Variant {
    type Err = PredictorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| PredictorError::UnknownVariant(s.to_string()))
    }
}
