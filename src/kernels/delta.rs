//! This module contains the pure, stateless kernels for delta encoding and
//! decoding.
//!
//! A delta segment stores the first element as a varint followed by the n-1
//! consecutive differences, bit-packed at a fixed width. Differences use
//! wrapping arithmetic so sequences touching `i64::MIN`/`i64::MAX` still
//! round-trip exactly. The transform is pure: callers keep their original
//! sequence, nothing is overwritten in place.

use crate::error::IntMapError;
use crate::kernels::{bitpack, varint, zigzag};

/// Bit 7 of the width byte: the packed differences are zig-zag-mapped.
const DELTA_SIGNED_FLAG: u8 = 0x80;

//==================================================================================
// 1. Public API
//==================================================================================

/// Pure consecutive-difference transform: `out[i] = v[i+1] - v[i]` (wrapping).
///
/// Returns n-1 differences for an n-element input, an empty vector for inputs
/// shorter than two elements.
pub fn deltas(values: &[i64]) -> Vec<i64> {
    values.windows(2).map(|w| w[1].wrapping_sub(w[0])).collect()
}

/// Appends a delta segment for `values` to `out`: varint base, width byte,
/// bit-packed differences.
///
/// `base_zigzag` maps the base through zig-zag before the varint (the flag is
/// recorded in the container tag, not in the segment); `delta_signed` maps
/// every difference and is recorded in the segment's own width byte.
pub fn encode_into(
    values: &[i64],
    delta_num_bits: u8,
    delta_signed: bool,
    base_zigzag: bool,
    out: &mut Vec<u8>,
) -> Result<(), IntMapError> {
    if delta_num_bits > 64 {
        return Err(IntMapError::InvalidBitWidth(delta_num_bits));
    }
    let Some(&base) = values.first() else {
        return Ok(());
    };

    let mapped_base = if base_zigzag {
        zigzag::encode_val(base)
    } else {
        base as u64
    };
    varint::encode_into(mapped_base, out);
    out.push(if delta_signed {
        DELTA_SIGNED_FLAG | delta_num_bits
    } else {
        delta_num_bits
    });

    let mapped: Vec<u64> = deltas(values)
        .into_iter()
        .map(|d| {
            if delta_signed {
                zigzag::encode_val(d)
            } else {
                d as u64
            }
        })
        .collect();
    bitpack::encode_into(&mapped, delta_num_bits, out)
}

/// Decodes `n` values from a delta segment.
pub fn decode(seg: &[u8], n: usize, base_zigzag: bool) -> Result<Vec<i64>, IntMapError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut cursor = DeltaCursor::new(seg, base_zigzag)?;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(cursor.next()?);
    }
    Ok(out)
}

//==================================================================================
// 2. Streaming Cursor
//==================================================================================

/// A forward-only cursor yielding the reconstructed running sum one value at
/// a time.
///
/// The first call to [`next`](Self::next) yields the base unchanged; each
/// later call decodes one difference and adds it to the running value.
/// Zig-zag unmapping of the differences happens internally, driven by the
/// segment's width byte.
#[derive(Debug)]
pub struct DeltaCursor<'a> {
    bits: bitpack::BitpackCursor<'a>,
    delta_signed: bool,
    current: i64,
    started: bool,
    /// Bytes occupied by the varint base and the width byte.
    header_len: usize,
}

impl<'a> DeltaCursor<'a> {
    /// Parses the base varint and the width byte; `base_zigzag` comes from
    /// the container's encoding tag.
    pub fn new(seg: &'a [u8], base_zigzag: bool) -> Result<Self, IntMapError> {
        let mut pos = 0usize;
        let raw_base = varint::decode(seg, &mut pos)?;
        let base = if base_zigzag {
            zigzag::decode_val(raw_base)
        } else {
            raw_base as i64
        };

        let width_byte = *seg.get(pos).ok_or(IntMapError::UnexpectedEof {
            requested: 1,
            available: 0,
        })?;
        pos += 1;

        let delta_signed = width_byte & DELTA_SIGNED_FLAG != 0;
        let num_bits = width_byte & !DELTA_SIGNED_FLAG;
        let bits = bitpack::BitpackCursor::new(&seg[pos..], num_bits)?;

        Ok(Self {
            bits,
            delta_signed,
            current: base,
            started: false,
            header_len: pos,
        })
    }

    /// Yields the next reconstructed value.
    pub fn next(&mut self) -> Result<i64, IntMapError> {
        if !self.started {
            self.started = true;
            return Ok(self.current);
        }
        let raw = self.bits.next()?;
        let delta = if self.delta_signed {
            zigzag::decode_val(raw)
        } else {
            raw as i64
        };
        self.current = self.current.wrapping_add(delta);
        Ok(self.current)
    }

    /// Logical byte length of the segment consumed so far.
    pub fn bytes_consumed(&self) -> usize {
        self.header_len + self.bits.bytes_consumed()
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
