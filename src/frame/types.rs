//! Snappy framing format types, constants, and error handling.
//!
//! Covers:
//! - `ChunkType`: the chunk type tag and its reserved ranges
//! - `VerifyMode`: reader-side checksum policy
//! - `WriterOptions`: writer-side chunk size and checksum policy
//! - `FrameError` with `Display` + `Error` impls and conversion into `io::Error`

use core::fmt;
use std::io;

use crate::config::{DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};

// ─────────────────────────────────────────────────────────────────────────────
// Chunk type tags
// ─────────────────────────────────────────────────────────────────────────────

/// Chunk type byte: compressed data.
pub const CHUNK_TYPE_COMPRESSED: u8 = 0x00;
/// Chunk type byte: uncompressed (stored) data.
pub const CHUNK_TYPE_UNCOMPRESSED: u8 = 0x01;
/// Chunk type byte: padding.
pub const CHUNK_TYPE_PADDING: u8 = 0xfe;
/// Chunk type byte: stream identifier.
pub const CHUNK_TYPE_STREAM_IDENTIFIER: u8 = 0xff;

/// Decoded chunk type tag.
///
/// Reserved tags are kept with their raw value so that diagnostics can name
/// the offending byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    Compressed,
    Uncompressed,
    Padding,
    StreamIdentifier,
    /// `0x02..=0x7f`: a decoder that does not understand these must fail.
    ReservedUnskippable(u8),
    /// `0x80..=0xfd`: a decoder that does not understand these must skip them.
    ReservedSkippable(u8),
}

impl ChunkType {
    pub fn from_byte(b: u8) -> ChunkType {
        match b {
            CHUNK_TYPE_COMPRESSED => ChunkType::Compressed,
            CHUNK_TYPE_UNCOMPRESSED => ChunkType::Uncompressed,
            CHUNK_TYPE_PADDING => ChunkType::Padding,
            CHUNK_TYPE_STREAM_IDENTIFIER => ChunkType::StreamIdentifier,
            0x02..=0x7f => ChunkType::ReservedUnskippable(b),
            _ => ChunkType::ReservedSkippable(b),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            ChunkType::Compressed => CHUNK_TYPE_COMPRESSED,
            ChunkType::Uncompressed => CHUNK_TYPE_UNCOMPRESSED,
            ChunkType::Padding => CHUNK_TYPE_PADDING,
            ChunkType::StreamIdentifier => CHUNK_TYPE_STREAM_IDENTIFIER,
            ChunkType::ReservedUnskippable(b) | ChunkType::ReservedSkippable(b) => b,
        }
    }

    /// `true` for the two chunk types that carry stream data.
    #[inline]
    pub fn is_data(self) -> bool {
        matches!(self, ChunkType::Compressed | ChunkType::Uncompressed)
    }

    /// `true` for chunk types a decoder silently skips.
    #[inline]
    pub fn is_skippable(self) -> bool {
        matches!(self, ChunkType::Padding | ChunkType::ReservedSkippable(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reader / writer configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Whether a reader recomputes and compares each data chunk's checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    /// Stored checksums are read but never compared.
    #[default]
    Ignore,
    /// A checksum that disagrees with the decoded data fails the read.
    VerifyChecksum,
}

impl VerifyMode {
    #[inline]
    pub fn verifies(self) -> bool {
        self == VerifyMode::VerifyChecksum
    }
}

impl From<bool> for VerifyMode {
    fn from(verify: bool) -> Self {
        if verify {
            VerifyMode::VerifyChecksum
        } else {
            VerifyMode::Ignore
        }
    }
}

/// Writer-side options shared by [`Writer`](crate::stream::Writer) and
/// [`BufferedWriter`](crate::stream::BufferedWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Maximum number of uncompressed bytes per data chunk.
    /// Clamped to `1..=MAX_BLOCK_SIZE` by [`WriterOptions::block_size`].
    pub block_size: usize,
    /// When `false`, the checksum field is written as zero.
    pub checksum: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            block_size: DEFAULT_BLOCK_SIZE,
            checksum: true,
        }
    }
}

impl WriterOptions {
    /// Set the chunk size, clamped to the range the format allows.
    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = size.clamp(1, MAX_BLOCK_SIZE);
        self
    }

    pub fn checksum(mut self, enabled: bool) -> Self {
        self.checksum = enabled;
        self
    }

    /// Chunk size actually used, whatever was stored in the public field.
    #[inline]
    pub(crate) fn effective_block_size(&self) -> usize {
        self.block_size.clamp(1, MAX_BLOCK_SIZE)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while encoding or decoding framed data.
///
/// I/O failures of the underlying sink or source are not represented here;
/// they travel as `std::io::Error` unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A non-identifier chunk appeared before the first stream identifier.
    MissingStreamIdentifier { chunk_type: u8 },
    /// Stream identifier chunk with the wrong length or magic.
    StreamIdentifierInvalid,
    /// Reserved unskippable chunk type (`0x02..=0x7f`).
    UnskippableChunk { chunk_type: u8 },
    /// A non-data chunk was handed to the data chunk decoder.
    NotDataChunk { chunk_type: u8 },
    /// Data chunk body too short to hold its checksum.
    ChunkTooShort { len: usize },
    /// Chunk body longer than the format allows for its type.
    ChunkTooLarge { len: usize, max: usize },
    /// Compressed payload announces more than `MAX_BLOCK_SIZE` bytes.
    DecompressedTooLarge { len: usize, max: usize },
    /// The block codec rejected the payload.
    DecompressionFailed(String),
    /// The block codec failed to compress a chunk.
    CompressionFailed(String),
    /// Stored checksum disagrees with the decoded data.
    ChecksumMismatch { expected: u32, actual: u32 },
    /// The stream ended inside a chunk header or body.
    Truncated { needed: usize, got: usize },
}

impl FrameError {
    /// Stable short name, one per variant.
    pub fn error_name(&self) -> &'static str {
        match self {
            FrameError::MissingStreamIdentifier { .. } => "ERROR_streamIdentifier_missing",
            FrameError::StreamIdentifierInvalid => "ERROR_streamIdentifier_invalid",
            FrameError::UnskippableChunk { .. } => "ERROR_chunkType_unskippable",
            FrameError::NotDataChunk { .. } => "ERROR_chunkType_notData",
            FrameError::ChunkTooShort { .. } => "ERROR_chunkSize_tooShort",
            FrameError::ChunkTooLarge { .. } => "ERROR_chunkSize_tooLarge",
            FrameError::DecompressedTooLarge { .. } => "ERROR_decompressedSize_tooLarge",
            FrameError::DecompressionFailed(_) => "ERROR_decompressionFailed",
            FrameError::CompressionFailed(_) => "ERROR_compressionFailed",
            FrameError::ChecksumMismatch { .. } => "ERROR_checksum_invalid",
            FrameError::Truncated { .. } => "ERROR_frame_truncated",
        }
    }

    /// `true` for a checksum mismatch.
    #[inline]
    pub fn is_checksum_error(&self) -> bool {
        matches!(self, FrameError::ChecksumMismatch { .. })
    }

    /// `true` for structural problems with the stream (anything a decoder
    /// rejects other than a checksum mismatch).
    pub fn is_malformed(&self) -> bool {
        !matches!(
            self,
            FrameError::ChecksumMismatch { .. } | FrameError::CompressionFailed(_)
        )
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_name())?;
        match self {
            FrameError::MissingStreamIdentifier { chunk_type } => write!(
                f,
                ": chunk type {chunk_type:#04x} found before stream identifier"
            ),
            FrameError::UnskippableChunk { chunk_type } => {
                write!(f, ": reserved chunk type {chunk_type:#04x}")
            }
            FrameError::NotDataChunk { chunk_type } => {
                write!(f, ": chunk type {chunk_type:#04x} carries no data")
            }
            FrameError::ChunkTooShort { len } => write!(f, ": body of {len} bytes"),
            FrameError::ChunkTooLarge { len, max } | FrameError::DecompressedTooLarge { len, max } => {
                write!(f, ": {len} bytes > {max}")
            }
            FrameError::DecompressionFailed(msg) | FrameError::CompressionFailed(msg) => {
                write!(f, ": {msg}")
            }
            FrameError::ChecksumMismatch { expected, actual } => {
                write!(f, ": expected {expected:#010x}, got {actual:#010x}")
            }
            FrameError::Truncated { needed, got } => {
                write!(f, ": needed {needed} bytes, got {got}")
            }
            FrameError::StreamIdentifierInvalid => Ok(()),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<FrameError> for io::Error {
    fn from(e: FrameError) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

/// Recover the [`FrameError`] carried by an `io::Error`, if any.
pub fn frame_error(e: &io::Error) -> Option<&FrameError> {
    e.get_ref().and_then(|inner| inner.downcast_ref::<FrameError>())
}
