// In: src/container/mod.rs

//! Defines the self-describing wire format for encoded sequences.
//! This module is the single source of truth for the format constants, the
//! 4-bit encoding tags shared by both container shapes, and the segment
//! writer that turns an `EncodingChoice` into bytes.
//!
//! Two container shapes exist: an array container holding one sequence
//! ([`array`]) and a map container holding a key sequence and a value
//! sequence ([`map`]). Unknown versions and unknown encoding tags are decode
//! errors; they are never reinterpreted.

use serde::{Deserialize, Serialize};

use crate::error::IntMapError;
use crate::kernels::{bitpack, delta, varint, zigzag};
use crate::types::{EncodingChoice, Scheme};

pub mod array;
pub mod map;

//==================================================================================
// Format Constants
//==================================================================================

/// Array container version, stored in the high nibble of the header byte.
pub const ARRAY_FORMAT_VERSION: u8 = 1;

/// Map container version, stored in the top three bits of the header byte.
pub const MAP_FORMAT_VERSION: u8 = 1;

/// Scheme ids occupy the low three bits of a tag nibble.
const TAG_SCHEME_MASK: u8 = 0x7;
const TAG_SCHEME_VARINT: u8 = 1;
const TAG_SCHEME_BITPACK: u8 = 2;
const TAG_SCHEME_DELTA: u8 = 3;

/// Bit 3 of a tag nibble: the segment's values (or the delta base) are
/// zig-zag-mapped.
const TAG_ZIGZAG_FLAG: u8 = 0x8;

/// Cap on the up-front allocation when materializing a decode; a corrupt
/// item count cannot force a huge reservation. The decoded count itself is
/// still honored.
pub(crate) const MAX_PREALLOC_ITEMS: usize = 1 << 20;

//==================================================================================
// Encoding Tags
//==================================================================================

/// One segment's 4-bit wire tag: the scheme plus the sign flag. For varint
/// and bitpack the flag covers every value; for delta it covers the base
/// only (the differences carry their own flag inside the segment).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingTag {
    pub scheme: Scheme,
    pub zigzag: bool,
}

impl EncodingTag {
    pub(crate) fn to_nibble(self) -> u8 {
        let scheme = match self.scheme {
            Scheme::Varint => TAG_SCHEME_VARINT,
            Scheme::Bitpack => TAG_SCHEME_BITPACK,
            Scheme::Delta => TAG_SCHEME_DELTA,
        };
        if self.zigzag {
            TAG_ZIGZAG_FLAG | scheme
        } else {
            scheme
        }
    }

    pub(crate) fn from_nibble(raw: u8) -> Result<Self, IntMapError> {
        let scheme = match raw & TAG_SCHEME_MASK {
            TAG_SCHEME_VARINT => Scheme::Varint,
            TAG_SCHEME_BITPACK => Scheme::Bitpack,
            TAG_SCHEME_DELTA => Scheme::Delta,
            _ => return Err(IntMapError::UnsupportedEncoding(raw)),
        };
        Ok(Self {
            scheme,
            zigzag: raw & TAG_ZIGZAG_FLAG != 0,
        })
    }

    /// The tag a choice encodes under. Empty sequences are written with a
    /// varint tag, which decode ignores.
    pub(crate) fn from_choice(choice: &EncodingChoice) -> Self {
        Self {
            scheme: choice.scheme().unwrap_or(Scheme::Varint),
            zigzag: choice.sign_flag(),
        }
    }
}

//==================================================================================
// Segment Writer
//==================================================================================

/// Appends the encoded segment for `values` under `choice` to `out`.
///
/// The number of bytes written always equals `choice.cost()`.
pub(crate) fn encode_segment(
    values: &[i64],
    choice: &EncodingChoice,
    out: &mut Vec<u8>,
) -> Result<(), IntMapError> {
    match *choice {
        EncodingChoice::Empty => Ok(()),
        EncodingChoice::Varint { use_zigzag, .. } => {
            for &val in values {
                let mapped = if use_zigzag {
                    zigzag::encode_val(val)
                } else {
                    val as u64
                };
                varint::encode_into(mapped, out);
            }
            Ok(())
        }
        EncodingChoice::Bitpack {
            use_zigzag,
            num_bits,
            ..
        } => {
            out.push(num_bits);
            let mapped: Vec<u64> = values
                .iter()
                .map(|&val| {
                    if use_zigzag {
                        zigzag::encode_val(val)
                    } else {
                        val as u64
                    }
                })
                .collect();
            bitpack::encode_into(&mapped, num_bits, out)
        }
        EncodingChoice::Delta {
            base_zigzag,
            delta_num_bits,
            delta_signed,
            ..
        } => delta::encode_into(values, delta_num_bits, delta_signed, base_zigzag, out),
    }
}
