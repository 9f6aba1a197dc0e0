//! Error types for PNG card parsing.

use thiserror::Error;

use crate::ChunkType;

/// Errors that can occur when reading card metadata from a PNG.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] cardmeta_common::Error),

    /// Not enough bytes for the 8-byte signature.
    #[error("format error: too small for PNG signature at offset {offset} ({available} bytes available)")]
    TooSmall { offset: usize, available: usize },

    /// The signature differs from the PNG magic.
    #[error("format error: signature mismatch at byte {index}: expected {expected:#04x}, got {actual:#04x}")]
    SignatureMismatch { index: usize, expected: u8, actual: u8 },

    /// Fewer than 8 bytes left where a chunk header should start.
    #[error("truncated: insufficient data for chunk header at offset {offset} ({available} bytes available)")]
    TruncatedHeader { offset: usize, available: usize },

    /// The declared payload plus CRC runs past the end of the buffer.
    #[error("truncated: insufficient data for chunk content of {chunk_type} at offset {offset}: declared {length} bytes, {available} available")]
    TruncatedContent {
        offset: usize,
        chunk_type: ChunkType,
        length: u32,
        available: usize,
    },

    /// Stored CRC-32 disagrees with the computed one.
    #[error("integrity error: CRC mismatch in {chunk_type} chunk at offset {offset}: expected {expected:#010x}, computed {computed:#010x}")]
    CrcMismatch {
        chunk_type: ChunkType,
        offset: usize,
        expected: u32,
        computed: u32,
    },

    /// A structured metadata chunk does not hold valid UTF-8 JSON.
    #[error("failed to parse {chunk_type} chunk: {reason}")]
    Decode { chunk_type: ChunkType, reason: String },

    /// `IEND` carries a payload while strict terminator checking is on.
    #[error("format error: IEND chunk at offset {offset} has {length} payload bytes")]
    InvalidTerminator { offset: usize, length: u32 },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload too large to fit a chunk's 32-bit length field.
    #[error("chunk payload of {0} bytes does not fit a 32-bit length")]
    PayloadTooLarge(usize),

    /// Input exceeds the configured size cap.
    #[error("input of {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed signature or container structure.
    Format,
    /// A header or chunk body extends past the end of the data.
    Truncated,
    /// Checksum failure.
    Integrity,
    /// Unparsable structured metadata.
    Decode,
    /// Input rejected by a configured limit.
    Limit,
    /// Underlying I/O failure.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Common(common) => match common {
                cardmeta_common::Error::Io(_) => ErrorKind::Io,
                cardmeta_common::Error::UnexpectedEof { .. } => ErrorKind::Truncated,
                cardmeta_common::Error::Utf8(_) => ErrorKind::Decode,
                cardmeta_common::Error::MissingNullTerminator => ErrorKind::Format,
            },
            Error::TooSmall { .. }
            | Error::SignatureMismatch { .. }
            | Error::InvalidTerminator { .. } => ErrorKind::Format,
            Error::TruncatedHeader { .. } | Error::TruncatedContent { .. } => ErrorKind::Truncated,
            Error::CrcMismatch { .. } => ErrorKind::Integrity,
            Error::Decode { .. } | Error::Json(_) => ErrorKind::Decode,
            Error::InputTooLarge { .. } | Error::PayloadTooLarge(_) => ErrorKind::Limit,
        }
    }
}

/// Result type for PNG card operations.
pub type Result<T> = std::result::Result<T, Error>;
