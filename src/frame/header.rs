//! Chunk header encoding/decoding and stream identifier validation.
//!
//! A chunk header is 4 bytes: the type tag followed by the body length as a
//! 24-bit little-endian integer.

use crate::config::{CHECKSUM_SIZE, CHUNK_HEADER_SIZE, MAX_BLOCK_SIZE, MAX_CHUNK_LEN, STREAM_IDENTIFIER_BODY};
use crate::codec::compress_bound;
use crate::frame::types::{ChunkType, FrameError};

/// Parsed chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub chunk_type: ChunkType,
    /// Body length in bytes, excluding the header itself.
    pub len: usize,
}

impl ChunkHeader {
    pub fn new(chunk_type: ChunkType, len: usize) -> Self {
        debug_assert!(len <= MAX_CHUNK_LEN);
        ChunkHeader { chunk_type, len }
    }

    pub fn parse(bytes: [u8; CHUNK_HEADER_SIZE]) -> Self {
        let len = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], 0]) as usize;
        ChunkHeader {
            chunk_type: ChunkType::from_byte(bytes[0]),
            len,
        }
    }

    pub fn to_bytes(self) -> [u8; CHUNK_HEADER_SIZE] {
        let len = (self.len as u32).to_le_bytes();
        [self.chunk_type.as_byte(), len[0], len[1], len[2]]
    }

    /// Reject data chunks whose body length cannot be valid, before any of
    /// the body is read.
    pub fn check_data_len(&self) -> Result<(), FrameError> {
        if self.len < CHECKSUM_SIZE {
            return Err(FrameError::ChunkTooShort { len: self.len });
        }
        let max = max_body_len(self.chunk_type);
        if self.len > max {
            return Err(FrameError::ChunkTooLarge { len: self.len, max });
        }
        Ok(())
    }
}

/// Largest legal body length for a chunk of the given type.
pub fn max_body_len(chunk_type: ChunkType) -> usize {
    match chunk_type {
        ChunkType::Compressed => CHECKSUM_SIZE + compress_bound(MAX_BLOCK_SIZE),
        ChunkType::Uncompressed => CHECKSUM_SIZE + MAX_BLOCK_SIZE,
        ChunkType::StreamIdentifier => STREAM_IDENTIFIER_BODY.len(),
        _ => MAX_CHUNK_LEN,
    }
}

/// Validate the body of a stream identifier chunk.
pub fn check_stream_identifier(body: &[u8]) -> Result<(), FrameError> {
    if body != STREAM_IDENTIFIER_BODY {
        return Err(FrameError::StreamIdentifierInvalid);
    }
    Ok(())
}
