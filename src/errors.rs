// src/errors.rs

//! Failure types of the crate's own machinery.
//!
//! These describe why the codec stopped parsing or why the `errchain`
//! binary failed. They are ordinary `thiserror` enums; the [`crate::Error`]
//! handle is what the library hands to its users.

use thiserror::Error;

/// Why decoding stopped before the declared number of layers was read.
///
/// Decoding never fails outright: these are reported next to whatever was
/// parsed up to that point (see [`crate::codec::Decoded`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("input of {len} bytes is shorter than the 4-byte layer count")]
    TooShort { len: usize },

    #[error("truncated length prefix: need 4 bytes, {available} available")]
    TruncatedPrefix { available: usize },

    #[error("field length {len} exceeds the {available} remaining bytes")]
    LengthOutOfRange { len: u32, available: usize },

    #[error("declared {declared} layers but the input only holds {parsed}")]
    CountExceedsInput { declared: u32, parsed: usize },

    #[error("layer limit of {limit} reached")]
    LayerLimit { limit: usize },
}

/// Failures of the `errchain` binary.
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML rendering error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("nothing to encode: at least one message is required")]
    NoMessages,
}

pub type InspectResult<T> = std::result::Result<T, InspectError>;
