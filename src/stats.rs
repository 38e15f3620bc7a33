//! Helpers for collecting statistics.

use std::collections::*;
use bitvec::prelude::*;
use itertools::*;

use crate::bit::*;
use crate::branch::*;

/// Container for recording prediction accuracy while evaluating some
/// predictor.
#[derive(Clone, Debug, Default)]
pub struct BranchStats {
    /// Per-branch statistics (indexed by the full branch address).
    pub data: BTreeMap<Bits, BranchData>,

    /// Number of correct predictions
    pub global_hits: usize,

    /// Number of times any branch instruction was executed
    pub global_brns: usize,
}
impl BranchStats {
    pub fn new() -> Self { Self::default() }

    /// Return the global hit rate.
    pub fn hit_rate(&self) -> f64 {
        if self.global_brns == 0 { return 0.0; }
        self.global_hits as f64 / self.global_brns as f64
    }

    /// Return the global hit count.
    pub fn global_hits(&self) -> usize { self.global_hits }

    /// Return the global miss count.
    pub fn global_miss(&self) -> usize { self.global_brns - self.global_hits }

    /// Return the total branch count.
    pub fn global_brns(&self) -> usize { self.global_brns }

    /// Record a prediction for some branch along with its actual outcome.
    pub fn record(&mut self,
        inst: &BranchInstruction, prediction: Outcome, outcome: Outcome)
    {
        let hit = prediction == outcome;
        self.global_brns += 1;
        if hit { self.global_hits += 1; }

        let data = self.get_mut(inst.address());
        data.occ += 1;
        data.pat.push(outcome.into());
        if hit { data.hits += 1; }
    }

    /// Returns a reference to data collected for a particular branch.
    pub fn get(&self, addr: &BitStr) -> Option<&BranchData> {
        self.data.get(addr)
    }

    /// Returns a mutable reference to data collected for a particular branch.
    /// Creates a new entry if one doesn't already exist.
    pub fn get_mut(&mut self, addr: &BitStr) -> &mut BranchData {
        self.data.entry(addr.to_bitvec()).or_default()
    }

    /// Returns the number of unique observed branch instructions.
    pub fn num_unique_branches(&self) -> usize {
        self.data.len()
    }

    /// Returns the `n` branches with the lowest hit rate (ties broken by
    /// the number of occurrences, most frequent first).
    pub fn get_low_rate_branches(&self, n: usize)
        -> Vec<(&BitStr, &BranchData)>
    {
        self.data.iter()
            .sorted_by(|x, y| {
                x.1.hit_rate().total_cmp(&y.1.hit_rate())
                    .then(y.1.occ.cmp(&x.1.occ))
            })
            .take(n)
            .map(|(addr, s)| (addr.as_bitslice(), s))
            .collect()
    }
}

/// Container for per-branch statistics.
#[derive(Clone, Debug, Default)]
pub struct BranchData {
    /// Number of times this branch was encountered.
    pub occ: usize,

    /// Number of correct predictions for this branch.
    pub hits: usize,

    /// Record of all observed outcomes for this branch.
    pub pat: BitVec,
}
impl BranchData {
    /// Return the hit rate for this branch.
    pub fn hit_rate(&self) -> f64 {
        if self.occ == 0 { return 0.0; }
        self.hits as f64 / self.occ as f64
    }

    pub fn times_taken(&self) -> usize {
        self.pat.count_ones()
    }
}
