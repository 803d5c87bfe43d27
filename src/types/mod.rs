//! This module defines the core, strongly-typed data representations used
//! throughout the intmap codec.
//!
//! It includes the canonical `Scheme` enum naming the three wire encodings,
//! and `EncodingChoice`, the selector's per-sequence verdict that drives both
//! the segment writer and the container header tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical, internal representation of a segment encoding scheme.
///
/// This enum replaces the raw tag bytes of the wire format with a safe,
/// serializable enum; conversion to and from the 4-bit wire tags lives in the
/// `container` module.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Varint,
    Bitpack,
    Delta,
}

/// Provides the canonical string representation for a `Scheme`.
impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // These string representations are part of the public contract; they
        // appear in diagnostic summaries.
        match self {
            Self::Varint => write!(f, "varint"),
            Self::Bitpack => write!(f, "bitpack"),
            Self::Delta => write!(f, "delta"),
        }
    }
}

/// The selector's verdict for one sequence: which scheme to use, the exact
/// parameters the segment writer needs, and the byte cost of the encoded
/// segment.
///
/// Computed once per sequence, immutable afterwards. `cost` is the exact
/// encoded segment length in bytes, including the bitpack/delta width byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingChoice {
    /// The sequence is empty; no scheme computation was performed and no
    /// segment is written.
    Empty,
    /// One varint per value, values zig-zag-mapped first iff `use_zigzag`.
    Varint { use_zigzag: bool, cost: usize },
    /// A width byte followed by values packed at `num_bits` bits each,
    /// zig-zag-mapped first iff `use_zigzag`. `num_bits` lies in [0, 64].
    Bitpack {
        use_zigzag: bool,
        num_bits: u8,
        cost: usize,
    },
    /// A varint base (zig-zag-mapped iff `base_zigzag`), a width byte, then
    /// the n-1 consecutive differences packed at `delta_num_bits` bits each,
    /// zig-zag-mapped iff `delta_signed`.
    Delta {
        base_zigzag: bool,
        delta_num_bits: u8,
        delta_signed: bool,
        cost: usize,
    },
}

impl EncodingChoice {
    /// The wire scheme this choice maps to. `None` for the empty sequence.
    pub fn scheme(&self) -> Option<Scheme> {
        match self {
            Self::Empty => None,
            Self::Varint { .. } => Some(Scheme::Varint),
            Self::Bitpack { .. } => Some(Scheme::Bitpack),
            Self::Delta { .. } => Some(Scheme::Delta),
        }
    }

    /// Exact byte length of the segment this choice encodes to.
    pub fn cost(&self) -> usize {
        match *self {
            Self::Empty => 0,
            Self::Varint { cost, .. } | Self::Bitpack { cost, .. } | Self::Delta { cost, .. } => {
                cost
            }
        }
    }

    /// Whether the segment's tag nibble carries the sign flag. For varint and
    /// bitpack this marks the whole sequence as zig-zag-mapped; for delta it
    /// covers the base only.
    pub fn sign_flag(&self) -> bool {
        match *self {
            Self::Empty => false,
            Self::Varint { use_zigzag, .. } | Self::Bitpack { use_zigzag, .. } => use_zigzag,
            Self::Delta { base_zigzag, .. } => base_zigzag,
        }
    }
}
