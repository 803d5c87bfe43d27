//! This module contains the pure, stateless kernels for fixed-width
//! bit-packing and unpacking.
//!
//! Values are truncated to their low `num_bits` bits and packed contiguously,
//! LSB first, with no padding between values. Encoding accumulates bits in a
//! 64-bit register that is flushed to the output whenever it fills, with the
//! overflow portion carried into the next register. Decoding mirrors this
//! with a sliding register, refilled with only as many bytes as the buffer
//! still holds; a truncated buffer is a typed error, never an over-read.

use crate::error::IntMapError;

//==================================================================================
// 1. Public API
//==================================================================================

/// Exact payload length in bytes for `n` values packed at `num_bits`.
pub fn packed_len(n: usize, num_bits: u8) -> usize {
    (n * num_bits as usize + 7) / 8
}

/// Appends `vals` packed at `num_bits` bits each to `out`.
///
/// Values wider than `num_bits` are truncated to their low bits. A width of 0
/// emits nothing (every value degenerates to zero).
pub fn encode_into(vals: &[u64], num_bits: u8, out: &mut Vec<u8>) -> Result<(), IntMapError> {
    if num_bits > 64 {
        return Err(IntMapError::InvalidBitWidth(num_bits));
    }
    if num_bits == 0 || vals.is_empty() {
        return Ok(());
    }

    let width = u32::from(num_bits);
    let mask = width_mask(num_bits);
    let mut reg: u64 = 0;
    let mut bits_used: u32 = 0;

    for &val in vals {
        let val = val & mask;
        reg |= val << bits_used;
        bits_used += width;

        if bits_used >= 64 {
            out.extend_from_slice(&reg.to_le_bytes());
            bits_used -= 64;
            // The bits that did not fit carry over into the next register.
            reg = if bits_used == 0 {
                0
            } else {
                val >> (width - bits_used)
            };
        }
    }

    if bits_used > 0 {
        let tail = reg.to_le_bytes();
        out.extend_from_slice(&tail[..(bits_used as usize + 7) / 8]);
    }
    Ok(())
}

/// Unpacks `n` values of `num_bits` bits each from `buf`.
pub fn decode(buf: &[u8], n: usize, num_bits: u8) -> Result<Vec<u64>, IntMapError> {
    let mut cursor = BitpackCursor::new(buf, num_bits)?;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(cursor.next()?);
    }
    Ok(out)
}

//==================================================================================
// 2. Streaming Cursor
//==================================================================================

/// A forward-only cursor yielding one unpacked value per call, without
/// materializing the whole sequence.
///
/// The cursor is single-pass and not rewindable. It tracks the logical number
/// of bits consumed so a caller can recover the byte position immediately
/// after the values it has read, independent of how many bytes the register
/// has buffered ahead.
#[derive(Debug)]
pub struct BitpackCursor<'a> {
    buf: &'a [u8],
    /// Next byte to load into the register.
    pos: usize,
    /// Holds `bits_avail` valid low-order bits; higher bits are always zero.
    reg: u64,
    bits_avail: u32,
    num_bits: u32,
    mask: u64,
    /// Total logical bits yielded so far.
    bits_read: u64,
}

impl<'a> BitpackCursor<'a> {
    pub fn new(buf: &'a [u8], num_bits: u8) -> Result<Self, IntMapError> {
        if num_bits > 64 {
            return Err(IntMapError::InvalidBitWidth(num_bits));
        }
        Ok(Self {
            buf,
            pos: 0,
            reg: 0,
            bits_avail: 0,
            num_bits: u32::from(num_bits),
            mask: width_mask(num_bits),
            bits_read: 0,
        })
    }

    /// Yields the next value.
    pub fn next(&mut self) -> Result<u64, IntMapError> {
        if self.num_bits == 0 {
            return Ok(0);
        }

        let out = if self.bits_avail >= self.num_bits {
            let val = self.reg & self.mask;
            self.reg = shr64(self.reg, self.num_bits);
            self.bits_avail -= self.num_bits;
            val
        } else {
            // The register holds only the low part of the value; capture it,
            // refill, and splice the high part on top.
            let low_bits = self.bits_avail;
            let low = self.reg;
            self.refill()?;

            let need = self.num_bits - low_bits;
            if self.bits_avail < need {
                return Err(IntMapError::UnexpectedEof {
                    requested: ((need - self.bits_avail) as usize + 7) / 8,
                    available: 0,
                });
            }
            let high = self.reg & width_mask(need as u8);
            self.reg = shr64(self.reg, need);
            self.bits_avail -= need;
            low | (high << low_bits)
        };

        self.bits_read += u64::from(self.num_bits);
        Ok(out & self.mask)
    }

    /// Logical number of payload bytes consumed by the values yielded so far.
    pub fn bytes_consumed(&self) -> usize {
        ((self.bits_read + 7) / 8) as usize
    }

    fn refill(&mut self) -> Result<(), IntMapError> {
        let remaining = self.buf.len() - self.pos;
        if remaining == 0 {
            return Err(IntMapError::UnexpectedEof {
                requested: 1,
                available: 0,
            });
        }
        let take = remaining.min(8);
        let mut chunk = [0u8; 8];
        chunk[..take].copy_from_slice(&self.buf[self.pos..self.pos + take]);
        self.pos += take;
        self.reg = u64::from_le_bytes(chunk);
        self.bits_avail = (take * 8) as u32;
        Ok(())
    }
}

fn width_mask(num_bits: u8) -> u64 {
    if num_bits >= 64 {
        u64::MAX
    } else {
        (1u64 << num_bits) - 1
    }
}

/// Right shift that tolerates a full-width shift amount.
fn shr64(value: u64, shift: u32) -> u64 {
    if shift >= 64 {
        0
    } else {
        value >> shift
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_layout_three_bits() {
        // 5=101, 6=110, 7=111, 1=001 packed LSB-first: 0b1111110101 | 1<<9.
        let mut buf = Vec::new();
        encode_into(&[5, 6, 7, 1], 3, &mut buf).unwrap();
        assert_eq!(buf, vec![0xf5, 0x03]);

        let decoded = decode(&buf, 4, 3).unwrap();
        assert_eq!(decoded, vec![5, 6, 7, 1]);
    }

    #[test]
    fn test_roundtrip_across_register_boundary() {
        // 20-bit values: the fourth value straddles the first 64-bit register.
        let vals: Vec<u64> = vec![0xfffff, 0x12345, 0x00001, 0xabcde, 0x54321];
        let mut buf = Vec::new();
        encode_into(&vals, 20, &mut buf).unwrap();
        assert_eq!(buf.len(), packed_len(vals.len(), 20));

        let decoded = decode(&buf, vals.len(), 20).unwrap();
        assert_eq!(decoded, vals);
    }

    #[test]
    fn test_roundtrip_all_widths() {
        for num_bits in 1..=64u8 {
            let mask = width_mask(num_bits);
            let vals: Vec<u64> = (0..17u64)
                .map(|i| (i.wrapping_mul(0x9e37_79b9_7f4a_7c15)) & mask)
                .collect();
            let mut buf = Vec::new();
            encode_into(&vals, num_bits, &mut buf).unwrap();
            assert_eq!(buf.len(), packed_len(vals.len(), num_bits));

            let decoded = decode(&buf, vals.len(), num_bits).unwrap();
            assert_eq!(decoded, vals, "width {num_bits}");
        }
    }

    #[test]
    fn test_width_zero_degenerates_to_empty_payload() {
        let mut buf = Vec::new();
        encode_into(&[0, 0, 0, 0], 0, &mut buf).unwrap();
        assert!(buf.is_empty());

        let decoded = decode(&buf, 4, 0).unwrap();
        assert_eq!(decoded, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_width_64_roundtrip() {
        let vals = vec![u64::MAX, 0, 42, u64::MAX - 1];
        let mut buf = Vec::new();
        encode_into(&vals, 64, &mut buf).unwrap();
        assert_eq!(buf.len(), 32);
        assert_eq!(decode(&buf, 4, 64).unwrap(), vals);
    }

    #[test]
    fn test_values_are_truncated_to_width() {
        let mut buf = Vec::new();
        encode_into(&[0xff, 0x05], 3, &mut buf).unwrap();
        assert_eq!(decode(&buf, 2, 3).unwrap(), vec![0x07, 0x05]);
    }

    #[test]
    fn test_decode_truncated_buffer_error() {
        let mut buf = Vec::new();
        encode_into(&[10, 20, 30], 5, &mut buf).unwrap();
        buf.pop();

        let result = decode(&buf, 3, 5);
        assert!(matches!(result, Err(IntMapError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_invalid_width_is_rejected() {
        let mut buf = Vec::new();
        assert!(matches!(
            encode_into(&[1], 65, &mut buf),
            Err(IntMapError::InvalidBitWidth(65))
        ));
        assert!(matches!(
            BitpackCursor::new(&[], 65),
            Err(IntMapError::InvalidBitWidth(65))
        ));
    }

    #[test]
    fn test_cursor_tracks_logical_consumption() {
        let mut buf = Vec::new();
        encode_into(&[1, 2, 3, 4], 3, &mut buf).unwrap();

        let mut cursor = BitpackCursor::new(&buf, 3).unwrap();
        assert_eq!(cursor.bytes_consumed(), 0);
        cursor.next().unwrap();
        assert_eq!(cursor.bytes_consumed(), 1); // ceil(3/8)
        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.bytes_consumed(), 2); // ceil(9/8)
        cursor.next().unwrap();
        assert_eq!(cursor.bytes_consumed(), 2); // ceil(12/8)
    }
}
