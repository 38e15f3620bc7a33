//! Combinational logic: saturating counters and address hashing.

use crate::bit::*;
use crate::config::{ CountMode, HashMode };
use crate::error::PredictorError;

/// Move an N-bit counter one step toward `taken`.
///
/// In [CountMode::Saturating], the counter is incremented when `taken` is
/// true and decremented otherwise, clamping at `2^N - 1` and at zero.
/// The arithmetic is done bit-by-bit, so counters of any width work.
pub fn count(counter: &BitStr, taken: bool, mode: CountMode)
    -> Result<Bits, PredictorError>
{
    if mode != CountMode::Saturating {
        return Err(PredictorError::UnsupportedCountMode(mode));
    }

    let mut res = counter.to_bitvec();

    // Saturated in the requested direction
    if (taken && res.all()) || (!taken && res.not_any()) {
        return Ok(res);
    }

    // Ripple a carry (or borrow) up from the least-significant bit: flip
    // bits until one flips to the value that absorbs it.
    for idx in (0..res.len()).rev() {
        let old = res[idx];
        res.set(idx, !old);
        if old != taken {
            break;
        }
    }
    Ok(res)
}

/// The direction predicted by a counter: the most-significant bit.
pub fn counter_direction(counter: &BitStr) -> bool {
    counter.first().map(|b| *b).unwrap_or(false)
}

/// Fold an address into a `k`-bit digest.
///
/// In [HashMode::Xor], address bit `i` (counting from the most-significant
/// end) is XOR'ed into output bit `i mod k`.
pub fn hash(address: &BitStr, k: usize, mode: HashMode)
    -> Result<Bits, PredictorError>
{
    if mode != HashMode::Xor {
        return Err(PredictorError::UnsupportedHashMode(mode));
    }
    if k == 0 {
        return Err(PredictorError::ZeroWidth { field: "set_bits" });
    }
    if k > address.len() {
        return Err(PredictorError::SelectorTooWide {
            selector: k, address: address.len()
        });
    }

    let mut res = vec![Bit::Zero; k];
    for (i, b) in address.iter().by_vals().enumerate() {
        res[i % k] = res[i % k] ^ Bit::from(b);
    }
    Ok(res.into_iter().map(bool::from).collect())
}
