// In: src/container/array.rs

//! The array container: one encoded sequence behind a one-byte header.
//!
//! Layout: `version << 4 | tag` in byte 0, a varint item count, then the
//! segment. A count of zero ends the container right after the count; the
//! tag nibble is still present (written as varint) but carries no meaning.

use crate::codec::decoder::ValueDecoder;
use crate::codec::planner;
use crate::config::CodecConfig;
use crate::container::{encode_segment, EncodingTag, ARRAY_FORMAT_VERSION, MAX_PREALLOC_ITEMS};
use crate::error::IntMapError;
use crate::kernels::varint;

//==================================================================================
// Encoding
//==================================================================================

/// Encodes `values` into a fresh array container.
pub fn encode(values: &[i64], config: &CodecConfig) -> Result<Vec<u8>, IntMapError> {
    let choice = planner::choose_encoding(values, config);
    let tag = EncodingTag::from_choice(&choice);

    let expected_len = 1 + varint::encoded_len(values.len() as u64) + choice.cost();
    let mut out = Vec::with_capacity(expected_len);
    out.push(ARRAY_FORMAT_VERSION << 4 | tag.to_nibble());
    varint::encode_into(values.len() as u64, &mut out);
    encode_segment(values, &choice, &mut out)?;

    debug_assert_eq!(out.len(), expected_len);
    Ok(out)
}

/// Fully materializes the container back into its sequence.
pub fn decode(bytes: &[u8]) -> Result<Vec<i64>, IntMapError> {
    let mut reader = ArrayReader::open(bytes)?;
    let n = reader.len as usize;
    let mut out = Vec::with_capacity(n.min(MAX_PREALLOC_ITEMS));
    for _ in 0..n {
        out.push(reader.next_value()?);
    }
    Ok(out)
}

//==================================================================================
// Reader
//==================================================================================

/// Parsed header plus a lazy cursor over the segment. Single-pass: callers
/// pull at most `len` values.
#[derive(Debug)]
pub struct ArrayReader<'a> {
    pub len: u64,
    /// `None` for the empty container, whose tag nibble is ignored.
    pub tag: Option<EncodingTag>,
    decoder: Option<ValueDecoder<'a>>,
}

impl<'a> ArrayReader<'a> {
    /// Validates the header and positions a cursor at the segment start.
    pub fn open(bytes: &'a [u8]) -> Result<Self, IntMapError> {
        let header = *bytes.first().ok_or(IntMapError::UnexpectedEof {
            requested: 1,
            available: 0,
        })?;
        let version = header >> 4;
        if version != ARRAY_FORMAT_VERSION {
            return Err(IntMapError::UnsupportedVersion {
                container: "array",
                version,
            });
        }

        let mut pos = 1usize;
        let len = varint::decode(bytes, &mut pos)?;
        if len == 0 {
            return Ok(Self {
                len,
                tag: None,
                decoder: None,
            });
        }

        let tag = EncodingTag::from_nibble(header & 0xf)?;
        let decoder = ValueDecoder::new(&bytes[pos..], tag.scheme, tag.zigzag)?;
        Ok(Self {
            len,
            tag: Some(tag),
            decoder: Some(decoder),
        })
    }

    /// Yields the next value. Callers must not pull more than `len` values.
    pub fn next_value(&mut self) -> Result<i64, IntMapError> {
        match self.decoder.as_mut() {
            Some(decoder) => decoder.next(),
            None => Err(IntMapError::UnexpectedEof {
                requested: 1,
                available: 0,
            }),
        }
    }
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scheme;

    fn auto() -> CodecConfig {
        CodecConfig::default()
    }

    #[test]
    fn test_roundtrip_simple() {
        let values = vec![1i64, 2, 3];
        let bytes = encode(&values, &auto()).unwrap();
        assert_eq!(decode(&bytes).unwrap(), values);
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode(&[1, 2, 3], &auto()).unwrap();
        // [1,2,3] bitpacks: version 1, tag 0x2, count 3.
        assert_eq!(bytes[0], 0x12);
        assert_eq!(bytes[1], 3);
    }

    #[test]
    fn test_empty_container() {
        let bytes = encode(&[], &auto()).unwrap();
        // Version nibble + varint tag, then a zero count.
        assert_eq!(bytes, vec![0x11, 0x00]);

        let reader = ArrayReader::open(&bytes).unwrap();
        assert_eq!(reader.len, 0);
        assert!(reader.tag.is_none());
        assert_eq!(decode(&bytes).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_roundtrip_every_scheme() {
        let fixtures: Vec<Vec<i64>> = vec![
            vec![42],
            vec![0; 9],
            vec![-1, 0, 1, i64::MIN, i64::MAX],
            vec![-80, -75, -64, -63, -50],
            (0..100).map(|i| i * i).collect(),
            vec![1 << 62, (1 << 62) + 1],
        ];
        for values in fixtures {
            for scheme in [Scheme::Varint, Scheme::Bitpack, Scheme::Delta] {
                let bytes = encode(&values, &CodecConfig::forcing(scheme)).unwrap();
                assert_eq!(decode(&bytes).unwrap(), values, "scheme {scheme}");
            }
        }
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let mut bytes = encode(&[1, 2, 3], &auto()).unwrap();
        bytes[0] = 0x32 | (bytes[0] & 0x0f);
        let result = decode(&bytes);
        assert!(matches!(
            result,
            Err(IntMapError::UnsupportedVersion {
                container: "array",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_encoding_tag_is_rejected() {
        // Version 1, scheme bits 7, one item.
        let bytes = [0x17u8, 0x01, 0x00];
        let result = decode(&bytes);
        assert!(matches!(result, Err(IntMapError::UnsupportedEncoding(_))));
    }

    #[test]
    fn test_truncated_segment_is_rejected() {
        let values: Vec<i64> = (0..20).map(|i| 1000 * i).collect();
        let mut bytes = encode(&values, &auto()).unwrap();
        bytes.truncate(bytes.len() - 3);
        let result = decode(&bytes);
        assert!(matches!(result, Err(IntMapError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_single_negative_value() {
        let bytes = encode(&[-42], &auto()).unwrap();
        assert_eq!(decode(&bytes).unwrap(), vec![-42]);

        let reader = ArrayReader::open(&bytes).unwrap();
        assert!(reader.tag.unwrap().zigzag);
    }
}
