// In: src/config.rs

//! The single source of truth for intmap codec configuration.
//!
//! This module defines the `CodecConfig` struct, created once at the
//! application boundary and passed by reference into every encode call. The
//! default configuration lets the planner pick the cheapest scheme; forcing a
//! scheme exists for diagnostics and for driving every encoding through the
//! full container paths in tests.

use serde::{Deserialize, Serialize};

use crate::types::Scheme;

/// Controls how the planner selects a segment encoding.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EncodingPolicy {
    /// **Default:** compute the byte cost of every applicable scheme and pick
    /// the cheapest.
    #[default]
    Auto,

    /// Bypass cost comparison and encode with the given scheme. The scheme's
    /// parameters (bit widths, sign flags) are still derived from the data.
    Force(Scheme),
}

/// The unified configuration for an encode operation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// The scheme-selection policy guiding the planner.
    #[serde(default)]
    pub policy: EncodingPolicy,
}

impl CodecConfig {
    /// A configuration that always encodes with `scheme`.
    pub fn forcing(scheme: Scheme) -> Self {
        Self {
            policy: EncodingPolicy::Force(scheme),
        }
    }
}
