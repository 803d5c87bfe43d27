// In: src/codec/planner.rs

//! The encoding selector for intmap segments.
//!
//! This module is the "smart" engine responsible for picking the cheapest
//! wire encoding for one sequence. It operates by:
//! 1. Profiling the sequence (sign handling, bit widths, per-scheme stats).
//! 2. Computing the exact byte cost of every applicable scheme.
//! 3. Returning the single best `EncodingChoice` for the segment writer.
//!
//! Costs are exact encoded lengths, not estimates: whatever this module
//! reports is the number of bytes the segment writer will emit. Ties are
//! broken by a fixed evaluation order (bitpack, then varint, then delta);
//! the order is deterministic but carries no semantic meaning.

use crate::config::{CodecConfig, EncodingPolicy};
use crate::kernels::{bitpack, delta, varint, zigzag};
use crate::types::EncodingChoice;

//==================================================================================
// 1. Sequence Profile
//==================================================================================

/// Everything the cost model needs to know about one sequence, gathered in a
/// single pass over the values plus one over their consecutive differences.
#[derive(Debug)]
struct SequenceProfile {
    /// Any value is negative, so varint/bitpack operate on zig-zag magnitudes.
    use_zigzag: bool,
    /// Bits needed for the largest (mapped) magnitude.
    num_bits: u8,
    /// Exact total varint bytes over the (mapped) values.
    varint_cost: usize,
    /// The first element, zig-zag-mapped iff it is negative.
    mapped_base: u64,
    base_zigzag: bool,
    /// Sign of the differences is evaluated independently of the values.
    delta_signed: bool,
    /// Bits needed for the largest (mapped) difference.
    delta_num_bits: u8,
}

fn bit_width(n: u64) -> u8 {
    if n == 0 {
        0
    } else {
        64 - n.leading_zeros() as u8
    }
}

fn profile(values: &[i64]) -> SequenceProfile {
    let use_zigzag = values.iter().any(|&v| v < 0);

    let mut max_mapped: u64 = 0;
    let mut varint_cost = 0usize;
    for &val in values {
        let mapped = if use_zigzag {
            zigzag::encode_val(val)
        } else {
            val as u64
        };
        max_mapped = max_mapped.max(mapped);
        varint_cost += varint::encoded_len(mapped);
    }

    let diffs = delta::deltas(values);
    let delta_signed = diffs.iter().any(|&d| d < 0);
    let mut max_delta: u64 = 0;
    for &d in &diffs {
        let mapped = if delta_signed {
            zigzag::encode_val(d)
        } else {
            d as u64
        };
        max_delta = max_delta.max(mapped);
    }

    let base = values[0];
    let base_zigzag = base < 0;
    let mapped_base = if base_zigzag {
        zigzag::encode_val(base)
    } else {
        base as u64
    };

    SequenceProfile {
        use_zigzag,
        num_bits: bit_width(max_mapped),
        varint_cost,
        mapped_base,
        base_zigzag,
        delta_signed,
        delta_num_bits: bit_width(max_delta),
    }
}

//==================================================================================
// 2. Candidate Costs
//==================================================================================

/// All candidate choices for a non-empty sequence, in tie-break priority
/// order: bitpack, varint, delta.
pub(crate) fn candidates(values: &[i64]) -> Vec<EncodingChoice> {
    debug_assert!(!values.is_empty());
    let p = profile(values);
    let n = values.len();

    vec![
        EncodingChoice::Bitpack {
            use_zigzag: p.use_zigzag,
            num_bits: p.num_bits,
            // One width byte plus the packed payload.
            cost: bitpack::packed_len(n, p.num_bits) + 1,
        },
        EncodingChoice::Varint {
            use_zigzag: p.use_zigzag,
            cost: p.varint_cost,
        },
        EncodingChoice::Delta {
            base_zigzag: p.base_zigzag,
            delta_num_bits: p.delta_num_bits,
            delta_signed: p.delta_signed,
            cost: varint::encoded_len(p.mapped_base) + 1 + bitpack::packed_len(n - 1, p.delta_num_bits),
        },
    ]
}

//==================================================================================
// 3. Top-Level Public API
//==================================================================================

/// Analyzes one sequence and produces the `EncodingChoice` the segment writer
/// will execute.
pub fn choose_encoding(values: &[i64], config: &CodecConfig) -> EncodingChoice {
    if values.is_empty() {
        return EncodingChoice::Empty;
    }

    let candidates = candidates(values);

    let chosen = match config.policy {
        EncodingPolicy::Force(scheme) => candidates
            .iter()
            .copied()
            .find(|c| c.scheme() == Some(scheme))
            // `candidates` always yields one entry per scheme.
            .unwrap_or(candidates[0]),
        EncodingPolicy::Auto => {
            let mut best = candidates[0];
            for &candidate in &candidates[1..] {
                if candidate.cost() < best.cost() {
                    best = candidate;
                }
            }
            best
        }
    };

    log::debug!(
        "planner: n={} candidates={:?} -> {:?}",
        values.len(),
        candidates
            .iter()
            .map(|c| (c.scheme(), c.cost()))
            .collect::<Vec<_>>(),
        chosen.scheme(),
    );

    chosen
}
