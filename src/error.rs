use crate::tag::ChunkTag;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for building, writing and reading wav containers
#[derive(Debug, Error)]
pub enum Error {
    /// Format parameters that can't describe a PCM stream
    #[error("invalid format: {reason}")]
    InvalidFormat {
        /// What is wrong with the parameters.
        reason: String,
    },

    /// Chunk length is not a whole number of sample frames
    #[error("chunk of {len} bytes is not a multiple of the block align ({block_align})")]
    MisalignedChunk {
        /// Length of the rejected chunk.
        len: usize,
        /// Block align of the target format.
        block_align: u16,
    },

    /// Accumulated data no longer fits the 32 bit size fields of the header
    #[error("{size} bytes of sample data do not fit in a wav container")]
    DataTooLarge {
        /// Data size the rejected chunk would have produced.
        size: u64,
    },

    /// Decoded source has a different frame layout than the target format
    #[error("source frame size is {found} bytes, expected {expected}")]
    FormatMismatch {
        /// Block align of the target format.
        expected: u16,
        /// Frame size reported by the decoded source.
        found: usize,
    },

    /// Decoding an input source failed
    #[error("failed to ingest audio source: {0}")]
    Ingestion(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Refusing to overwrite an existing destination
    #[error("destination {} already exists", .0.display())]
    DestinationExists(PathBuf),

    /// Underlying sink or source failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes than a full header
    #[error("header needs 44 bytes, got {0}")]
    HeaderTooShort(usize),

    /// Tag at a fixed header offset is not the expected one
    #[error("expected {expected:?} tag at offset {offset}, found {found:?}")]
    UnexpectedTag {
        /// Byte offset of the tag.
        offset: usize,
        /// Tag the canonical layout requires.
        expected: ChunkTag,
        /// Tag actually read.
        found: ChunkTag,
    },

    /// Extended fmt chunks are not supported
    #[error("unsupported fmt chunk size {0}, only 16 is supported")]
    UnsupportedFmtSize(u32),
}

impl Error {
    pub(crate) fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    pub(crate) fn ingestion(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Ingestion(err.into())
    }
}
