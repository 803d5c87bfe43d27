// In: src/bridge/mod.rs

//! The host-facing boundary of the intmap codec.
//!
//! The host registers a handful of operations against its catalog: construct
//! from literal text, construct from native arrays, stringify, point lookup,
//! and a diagnostic summary. This module implements that contract as thin,
//! stateless functions over caller-owned buffers; all real work happens in
//! the pure `parser`, `codec`, and `container` layers.
//!
//! Lookup misses are `Ok(None)`, never errors; errors are reserved for
//! malformed literals, invalid native arrays, and corrupt buffers.

use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::container::array::{self, ArrayReader};
use crate::container::map::{self, MapReader};
use crate::container::EncodingTag;
use crate::error::IntMapError;
use crate::parser;


//==================================================================================
// 1. Construction
//==================================================================================

/// Parses a map literal (`"1=>10, 3=>30"`) and encodes it.
pub fn map_from_text(text: &str) -> Result<Vec<u8>, IntMapError> {
    let (keys, values) = parser::parse_map_literal(text)?;
    map::encode(&keys, &values, &CodecConfig::default())
}

/// Parses an array literal (`"{1,2,3}"`) and encodes it.
pub fn array_from_text(text: &str) -> Result<Vec<u8>, IntMapError> {
    let values = parser::parse_array_literal(text)?;
    array::encode(&values, &CodecConfig::default())
}

/// Encodes two parallel native arrays as a map. The arrays must be of equal
/// length.
pub fn map_from_arrays(keys: &[i64], values: &[i64]) -> Result<Vec<u8>, IntMapError> {
    map::encode(keys, values, &CodecConfig::default())
}

/// Encodes a native array as an array container.
pub fn array_from_values(values: &[i64]) -> Result<Vec<u8>, IntMapError> {
    array::encode(values, &CodecConfig::default())
}

/// Like [`map_from_arrays`], for hosts whose arrays carry null slots; any
/// null entry is rejected.
pub fn map_from_nullable_arrays(
    keys: &[Option<i64>],
    values: &[Option<i64>],
) -> Result<Vec<u8>, IntMapError> {
    if keys.len() != values.len() {
        return Err(IntMapError::ArrayLengthMismatch(keys.len(), values.len()));
    }
    let keys = collect_non_null(keys)?;
    let values = collect_non_null(values)?;
    map::encode(&keys, &values, &CodecConfig::default())
}

/// Like [`array_from_values`], rejecting null entries.
pub fn array_from_nullable_values(values: &[Option<i64>]) -> Result<Vec<u8>, IntMapError> {
    let values = collect_non_null(values)?;
    array::encode(&values, &CodecConfig::default())
}

fn collect_non_null(items: &[Option<i64>]) -> Result<Vec<i64>, IntMapError> {
    items
        .iter()
        .map(|item| item.ok_or(IntMapError::NullElement))
        .collect()
}

//==================================================================================
// 2. Stringification
//==================================================================================

/// Renders a map container back to literal text, `"k1=>v1, k2=>v2"`. The
/// empty map renders as the empty string.
pub fn map_to_text(bytes: &[u8]) -> Result<String, IntMapError> {
    let reader = MapReader::open(bytes)?;
    let mut out = String::new();
    if reader.len > 0 {
        let mut kd = reader.key_decoder()?;
        let mut vd = reader.value_decoder()?;
        for i in 0..reader.len {
            if i > 0 {
                out.push_str(", ");
            }
            let key = kd.next()?;
            let value = vd.next()?;
            out.push_str(&format!("{key}=>{value}"));
        }
    }
    Ok(out)
}

/// Renders an array container back to literal text, `"{v1,v2}"`.
pub fn array_to_text(bytes: &[u8]) -> Result<String, IntMapError> {
    let mut reader = ArrayReader::open(bytes)?;
    let mut out = String::from("{");
    for i in 0..reader.len {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&reader.next_value()?.to_string());
    }
    out.push('}');
    Ok(out)
}

//==================================================================================
// 3. Point Lookup
//==================================================================================

/// Looks a key up in a map container. Returns `Ok(None)` when the key is
/// absent.
///
/// Keys are scanned linearly even though the container stores them sorted;
/// on duplicate keys the last occurrence wins. The value cursor starts at
/// the header's value-segment offset and advances only to the hit index.
pub fn map_get(bytes: &[u8], key: i64) -> Result<Option<i64>, IntMapError> {
    let reader = MapReader::open(bytes)?;
    if reader.len == 0 {
        return Ok(None);
    }

    let mut kd = reader.key_decoder()?;
    let mut found: Option<u64> = None;
    for i in 0..reader.len {
        if kd.next()? == key {
            found = Some(i);
        }
    }
    let Some(index) = found else {
        return Ok(None);
    };

    let mut vd = reader.value_decoder()?;
    let mut value = 0;
    for _ in 0..=index {
        value = vd.next()?;
    }
    Ok(Some(value))
}

/// Looks up the element at a 1-based `index` in an array container. Indexes
/// outside `1..=count` return `Ok(None)`.
pub fn array_get(bytes: &[u8], index: i64) -> Result<Option<i64>, IntMapError> {
    let mut reader = ArrayReader::open(bytes)?;
    if index < 1 || index as u64 > reader.len {
        return Ok(None);
    }

    let mut value = 0;
    for _ in 0..index {
        value = reader.next_value()?;
    }
    Ok(Some(value))
}

//==================================================================================
// 4. Diagnostics
//==================================================================================

/// The diagnostic summary of a map container: item count and the chosen
/// per-array encodings. Empty containers carry no encodings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapInfo {
    pub num_items: u64,
    pub key_encoding: Option<EncodingTag>,
    pub value_encoding: Option<EncodingTag>,
}

/// The diagnostic summary of an array container.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayInfo {
    pub num_items: u64,
    pub encoding: Option<EncodingTag>,
}

/// Summarizes a map container without materializing its sequences.
pub fn map_describe(bytes: &[u8]) -> Result<MapInfo, IntMapError> {
    let reader = MapReader::open(bytes)?;
    Ok(MapInfo {
        num_items: reader.len,
        key_encoding: reader.key_tag,
        value_encoding: reader.val_tag,
    })
}

/// Summarizes an array container without materializing its sequence.
pub fn array_describe(bytes: &[u8]) -> Result<ArrayInfo, IntMapError> {
    let reader = ArrayReader::open(bytes)?;
    Ok(ArrayInfo {
        num_items: reader.len,
        encoding: reader.tag,
    })
}
