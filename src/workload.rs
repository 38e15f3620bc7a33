//! Synthetic streams of branch outcomes.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::branch::*;

/// A pre-determined pattern of outcomes associated with a conditional branch.
#[derive(Clone, Debug, PartialEq)]
pub enum BranchPattern {
    /// A branch whose outcome is always 'taken'.
    AlwaysTaken,

    /// A branch whose outcome is always 'not-taken'.
    NeverTaken,

    /// A branch whose outcome is only periodically "taken".
    /// Otherwise, the branch is "not-taken" by default.
    TakenPeriodic(usize),

    /// A branch whose outcome is only periodically "not-taken".
    /// Otherwise, the branch is "taken" by default.
    NotTakenPeriodic(usize),

    /// A branch with an arbitrary repeating pattern of outcomes.
    Pattern(Vec<Outcome>),

    /// A branch which is taken with some probability.
    Random(f64),
}
impl BranchPattern {
    /// Given the number of times this branch has executed, generate an
    /// outcome.
    fn outcome(&self, ctr: usize, rng: &mut StdRng) -> Outcome {
        match self {
            Self::AlwaysTaken => Outcome::T,
            Self::NeverTaken => Outcome::N,
            Self::TakenPeriodic(p) => {
                let p = (*p).max(1);
                if ctr % p == (p - 1) { Outcome::T } else { Outcome::N }
            },
            Self::NotTakenPeriodic(p) => {
                let p = (*p).max(1);
                if ctr % p == (p - 1) { Outcome::N } else { Outcome::T }
            },
            Self::Pattern(pat) => {
                if pat.is_empty() { Outcome::N } else { pat[ctr % pat.len()] }
            },
            Self::Random(prob) => {
                // Non-finite probabilities behave as "never taken"
                let prob = if prob.is_finite() {
                    prob.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                rng.gen_bool(prob).into()
            },
        }
    }
}

/// A static branch in a [Workload].
#[derive(Clone, Debug)]
struct BranchSite {
    pc: usize,
    pattern: BranchPattern,
    ctr: usize,
}

/// A deterministic stream of `(instruction, outcome)` pairs.
///
/// Branches are visited round-robin in the order they were added. The
/// stream never ends (unless there are no branches); use
/// [Iterator::take] to bound it. The same seed always produces the same
/// stream.
#[derive(Clone, Debug)]
pub struct Workload {
    sites: Vec<BranchSite>,
    address_bits: usize,
    cursor: usize,
    rng: StdRng,
}
impl Workload {
    pub fn new(address_bits: usize, seed: u64) -> Self {
        Self {
            sites: Vec::new(),
            address_bits,
            cursor: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Add a branch at `pc` with the given behavior.
    pub fn add_branch(&mut self, pc: usize, pattern: BranchPattern) {
        self.sites.push(BranchSite { pc, pattern, ctr: 0 });
    }

    pub fn with_branch(mut self, pc: usize, pattern: BranchPattern) -> Self {
        self.add_branch(pc, pattern);
        self
    }

    pub fn num_branches(&self) -> usize { self.sites.len() }

    /// A mix of loop-like, biased, correlated and noisy branches.
    pub fn mixed(address_bits: usize, seed: u64) -> Self {
        use BranchPattern::*;
        Self::new(address_bits, seed)
            .with_branch(0x04, NotTakenPeriodic(4))
            .with_branch(0x0c, AlwaysTaken)
            .with_branch(0x13, TakenPeriodic(3))
            .with_branch(0x28, Pattern(vec![Outcome::T, Outcome::T, Outcome::N]))
            .with_branch(0x31, NeverTaken)
            .with_branch(0x4a, NotTakenPeriodic(8))
            .with_branch(0x57, Random(0.9))
            .with_branch(0x6e, Random(0.5))
    }
}

impl Iterator for Workload {
    type Item = (BranchInstruction, Outcome);
    fn next(&mut self) -> Option<Self::Item> {
        if self.sites.is_empty() {
            return None;
        }
        let site = &mut self.sites[self.cursor];
        let outcome = site.pattern.outcome(site.ctr, &mut self.rng);
        let inst = BranchInstruction::new(site.pc, self.address_bits);
        site.ctr += 1;
        self.cursor = (self.cursor + 1) % self.sites.len();
        Some((inst, outcome))
    }
}
