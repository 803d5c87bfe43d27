// In: src/error.rs

//! This module defines the single, unified error type for the entire intmap library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntMapError {
    // =========================================================================
    // === Parser boundary
    // =========================================================================
    #[error("invalid integer at '{0}'")]
    MalformedInteger(String),

    #[error("integer out of range: '{0}'")]
    IntegerOutOfRange(String),

    #[error("expected {expected}, but found '{found}'")]
    UnexpectedToken { expected: &'static str, found: String },

    #[error("unexpected end of literal: {0}")]
    UnterminatedLiteral(String),

    // =========================================================================
    // === Array-interop boundary
    // =========================================================================
    #[error("the keys array size ({0}) does not match the values array size ({1})")]
    ArrayLengthMismatch(usize, usize),

    #[error("input arrays must not contain NULLs")]
    NullElement,

    // =========================================================================
    // === Decoder boundary (fatal, detected at header/tag read time)
    // =========================================================================
    #[error("unsupported {container} format version: {version}")]
    UnsupportedVersion {
        container: &'static str,
        version: u8,
    },

    #[error("unsupported encoding tag: {0:#x}")]
    UnsupportedEncoding(u8),

    #[error("invalid bit width {0}, must be at most 64")]
    InvalidBitWidth(u8),

    #[error("truncated buffer: needed {requested} more byte(s), {available} available")]
    UnexpectedEof { requested: usize, available: usize },

    #[error("varint decoding error: {0}")]
    VarintDecodeError(&'static str),
}
