//! This file is the root of the `intmap` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`kernels`,
//!     `codec`, `container`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the small host-facing surface: the error type, the core
//!     vocabulary types, and the configuration.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod bridge;
pub mod codec;
pub mod config;
pub mod container;
pub mod kernels;
pub mod types;

mod error;
mod parser;

//==================================================================================
// 2. Public Re-exports
//==================================================================================

pub use config::{CodecConfig, EncodingPolicy};
pub use error::IntMapError;
pub use types::{EncodingChoice, Scheme};
