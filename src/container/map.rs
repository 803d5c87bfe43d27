// In: src/container/map.rs

//! The map container: a key sequence and a value sequence encoded as two
//! independent segments behind a compact header.
//!
//! Layout of byte 0: `version << 5 | continuation << 4 | count & 0xF`. When
//! the continuation bit is set, a varint carrying `count >> 4` follows, so
//! the common small-map case fits the count into the single header byte. A
//! count of zero ends the container there. Otherwise one byte pairs the key
//! and value tag nibbles (keys high), and a varint gives the byte length of
//! the key segment, which is the offset at which the value segment starts.
//!
//! Construction sorts keys ascending with values permuted in lockstep; the
//! sort is stable, so duplicate keys keep their input order.

use crate::codec::decoder::ValueDecoder;
use crate::codec::planner;
use crate::config::CodecConfig;
use crate::container::{encode_segment, EncodingTag, MAP_FORMAT_VERSION, MAX_PREALLOC_ITEMS};
use crate::error::IntMapError;
use crate::kernels::varint;

/// Bit 4 of the header byte: the count continues in a varint.
const COUNT_CONTINUATION: u8 = 0x10;
const COUNT_LOW_MASK: u8 = 0x0f;

//==================================================================================
// Encoding
//==================================================================================

/// Encodes a key/value pairing into a fresh map container.
pub fn encode(keys: &[i64], values: &[i64], config: &CodecConfig) -> Result<Vec<u8>, IntMapError> {
    if keys.len() != values.len() {
        return Err(IntMapError::ArrayLengthMismatch(keys.len(), values.len()));
    }
    let n = keys.len();

    // Stored sorted by key, values riding along.
    let mut pairs: Vec<(i64, i64)> = keys.iter().copied().zip(values.iter().copied()).collect();
    pairs.sort_by_key(|&(key, _)| key);
    let (keys, values): (Vec<i64>, Vec<i64>) = pairs.into_iter().unzip();

    let mut out = Vec::new();
    write_count(&mut out, n);
    if n == 0 {
        return Ok(out);
    }

    let key_choice = planner::choose_encoding(&keys, config);
    let val_choice = planner::choose_encoding(&values, config);
    let key_tag = EncodingTag::from_choice(&key_choice);
    let val_tag = EncodingTag::from_choice(&val_choice);

    out.push(key_tag.to_nibble() << 4 | val_tag.to_nibble());

    // The planner's cost is the exact key segment length, which makes it the
    // value-segment offset.
    varint::encode_into(key_choice.cost() as u64, &mut out);

    let key_start = out.len();
    encode_segment(&keys, &key_choice, &mut out)?;
    debug_assert_eq!(out.len() - key_start, key_choice.cost());

    encode_segment(&values, &val_choice, &mut out)?;
    Ok(out)
}

/// Fully materializes the container back into its key and value sequences.
pub fn decode(bytes: &[u8]) -> Result<(Vec<i64>, Vec<i64>), IntMapError> {
    let reader = MapReader::open(bytes)?;
    let n = reader.len as usize;
    let mut keys = Vec::with_capacity(n.min(MAX_PREALLOC_ITEMS));
    let mut values = Vec::with_capacity(n.min(MAX_PREALLOC_ITEMS));

    if n > 0 {
        let mut kd = reader.key_decoder()?;
        let mut vd = reader.value_decoder()?;
        for _ in 0..n {
            keys.push(kd.next()?);
            values.push(vd.next()?);
        }
    }
    Ok((keys, values))
}

fn write_count(out: &mut Vec<u8>, n: usize) {
    let low = n as u8 & COUNT_LOW_MASK;
    if n < 16 {
        out.push(MAP_FORMAT_VERSION << 5 | low);
    } else {
        out.push(MAP_FORMAT_VERSION << 5 | COUNT_CONTINUATION | low);
        varint::encode_into((n >> 4) as u64, out);
    }
}

//==================================================================================
// Reader
//==================================================================================

/// Parsed header plus the two segment slices. Key and value cursors are
/// created independently: the value segment is located through the header
/// offset, never by exhausting the key cursor.
#[derive(Debug)]
pub struct MapReader<'a> {
    pub len: u64,
    /// `None` for the empty container, which carries no tag byte at all.
    pub key_tag: Option<EncodingTag>,
    pub val_tag: Option<EncodingTag>,
    key_seg: &'a [u8],
    val_seg: &'a [u8],
}

impl<'a> MapReader<'a> {
    /// Validates the header and slices out the two segments.
    pub fn open(bytes: &'a [u8]) -> Result<Self, IntMapError> {
        let header = *bytes.first().ok_or(IntMapError::UnexpectedEof {
            requested: 1,
            available: 0,
        })?;
        let version = header >> 5;
        if version != MAP_FORMAT_VERSION {
            return Err(IntMapError::UnsupportedVersion {
                container: "map",
                version,
            });
        }

        let mut pos = 1usize;
        let mut len = u64::from(header & COUNT_LOW_MASK);
        if header & COUNT_CONTINUATION != 0 {
            let high = varint::decode(bytes, &mut pos)?;
            len |= high
                .checked_mul(16)
                .ok_or(IntMapError::VarintDecodeError("item count overflows u64"))?;
        }

        if len == 0 {
            return Ok(Self {
                len,
                key_tag: None,
                val_tag: None,
                key_seg: &[],
                val_seg: &[],
            });
        }

        let tag_byte = *bytes.get(pos).ok_or(IntMapError::UnexpectedEof {
            requested: 1,
            available: 0,
        })?;
        pos += 1;
        let key_tag = EncodingTag::from_nibble(tag_byte >> 4)?;
        let val_tag = EncodingTag::from_nibble(tag_byte & 0xf)?;

        let key_len = varint::decode(bytes, &mut pos)? as usize;
        let remaining = bytes.len() - pos;
        // The declared key segment must fit in the buffer.
        if key_len > remaining {
            return Err(IntMapError::UnexpectedEof {
                requested: key_len - remaining,
                available: remaining,
            });
        }

        Ok(Self {
            len,
            key_tag: Some(key_tag),
            val_tag: Some(val_tag),
            key_seg: &bytes[pos..pos + key_len],
            val_seg: &bytes[pos + key_len..],
        })
    }

    /// Byte length of the key segment, i.e. the value-segment offset.
    pub fn key_segment_len(&self) -> usize {
        self.key_seg.len()
    }

    /// A fresh cursor over the key segment.
    pub fn key_decoder(&self) -> Result<ValueDecoder<'a>, IntMapError> {
        let tag = self.key_tag.ok_or(IntMapError::UnexpectedEof {
            requested: 1,
            available: 0,
        })?;
        ValueDecoder::new(self.key_seg, tag.scheme, tag.zigzag)
    }

    /// A fresh cursor over the value segment, positioned via the header
    /// offset.
    pub fn value_decoder(&self) -> Result<ValueDecoder<'a>, IntMapError> {
        let tag = self.val_tag.ok_or(IntMapError::UnexpectedEof {
            requested: 1,
            available: 0,
        })?;
        ValueDecoder::new(self.val_seg, tag.scheme, tag.zigzag)
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
