//! Error types for bitpress

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("unknown engine \"{0}\"")]
    UnknownEngine(String),

    #[error("malformed model header: {0}")]
    ModelParse(String),

    #[error("compressed payload ended before all symbols were decoded")]
    TruncatedStream,

    #[error("unsupported alphabet: {0}")]
    UnsupportedAlphabet(String),

    #[error("block of {len} bytes exceeds configured maximum {max}")]
    BlockTooLarge { len: usize, max: usize },

    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
