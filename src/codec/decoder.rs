// In: src/codec/decoder.rs

//! The polymorphic decoder cursor over one encoded segment.
//!
//! `ValueDecoder` wraps whichever underlying cursor the segment's encoding
//! tag calls for (a raw varint position, a `BitpackCursor`, or a
//! `DeltaCursor`) behind a single `next()` that always yields canonical
//! signed values. Zig-zag unmapping happens at the point of yielding; for
//! delta segments it is internal to the delta cursor. The sign flag is an
//! explicit field on the varint and bitpack variants, not a bit buried in a
//! shared tag byte.

use crate::error::IntMapError;
use crate::kernels::bitpack::BitpackCursor;
use crate::kernels::delta::DeltaCursor;
use crate::kernels::{varint, zigzag};
use crate::types::Scheme;

/// A forward-only, single-pass cursor yielding decoded values from one
/// segment, independent of the scheme that produced it.
#[derive(Debug)]
pub enum ValueDecoder<'a> {
    Varint {
        seg: &'a [u8],
        pos: usize,
        signed: bool,
    },
    Bitpack {
        cursor: BitpackCursor<'a>,
        signed: bool,
    },
    Delta {
        cursor: DeltaCursor<'a>,
    },
}

impl<'a> ValueDecoder<'a> {
    /// Opens a cursor at the start of `seg`. For bitpack this consumes the
    /// width byte; for delta, the varint base and the delta width byte.
    pub fn new(seg: &'a [u8], scheme: Scheme, signed: bool) -> Result<Self, IntMapError> {
        match scheme {
            Scheme::Varint => Ok(Self::Varint {
                seg,
                pos: 0,
                signed,
            }),
            Scheme::Bitpack => {
                let num_bits = *seg.first().ok_or(IntMapError::UnexpectedEof {
                    requested: 1,
                    available: 0,
                })?;
                let cursor = BitpackCursor::new(&seg[1..], num_bits)?;
                Ok(Self::Bitpack { cursor, signed })
            }
            Scheme::Delta => Ok(Self::Delta {
                cursor: DeltaCursor::new(seg, signed)?,
            }),
        }
    }

    /// Yields the next decoded value.
    pub fn next(&mut self) -> Result<i64, IntMapError> {
        match self {
            Self::Varint { seg, pos, signed } => {
                let raw = varint::decode(seg, pos)?;
                Ok(if *signed {
                    zigzag::decode_val(raw)
                } else {
                    raw as i64
                })
            }
            Self::Bitpack { cursor, signed } => {
                let raw = cursor.next()?;
                Ok(if *signed {
                    zigzag::decode_val(raw)
                } else {
                    raw as i64
                })
            }
            Self::Delta { cursor } => cursor.next(),
        }
    }

    /// Consumes the cursor and returns the byte offset immediately after the
    /// values yielded so far, which is the start of whatever follows the
    /// segment once every value has been read.
    pub fn finish(self) -> usize {
        match self {
            Self::Varint { pos, .. } => pos,
            Self::Bitpack { cursor, .. } => 1 + cursor.bytes_consumed(),
            Self::Delta { cursor } => cursor.bytes_consumed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::delta;

    #[test]
    fn test_varint_cursor_with_sign_flag() {
        let mut seg = Vec::new();
        for v in [0i64, -1, 1, -300] {
            varint::encode_into(zigzag::encode_val(v), &mut seg);
        }

        let mut dec = ValueDecoder::new(&seg, Scheme::Varint, true).unwrap();
        assert_eq!(dec.next().unwrap(), 0);
        assert_eq!(dec.next().unwrap(), -1);
        assert_eq!(dec.next().unwrap(), 1);
        assert_eq!(dec.next().unwrap(), -300);
        assert_eq!(dec.finish(), seg.len());
    }

    #[test]
    fn test_bitpack_cursor_reads_width_byte() {
        let mut seg = vec![4u8];
        crate::kernels::bitpack::encode_into(&[3, 9, 15], 4, &mut seg).unwrap();

        let mut dec = ValueDecoder::new(&seg, Scheme::Bitpack, false).unwrap();
        assert_eq!(dec.next().unwrap(), 3);
        assert_eq!(dec.next().unwrap(), 9);
        assert_eq!(dec.next().unwrap(), 15);
        assert_eq!(dec.finish(), seg.len());
    }

    #[test]
    fn test_delta_cursor_dispatch() {
        let values = vec![-10i64, -5, 0, 5];
        let mut seg = Vec::new();
        delta::encode_into(&values, 4, false, true, &mut seg).unwrap();

        let mut dec = ValueDecoder::new(&seg, Scheme::Delta, true).unwrap();
        for &v in &values {
            assert_eq!(dec.next().unwrap(), v);
        }
        assert_eq!(dec.finish(), seg.len());
    }

    #[test]
    fn test_empty_bitpack_segment_is_rejected() {
        let result = ValueDecoder::new(&[], Scheme::Bitpack, false).map(|_| ());
        assert!(matches!(result, Err(IntMapError::UnexpectedEof { .. })));
    }
}
