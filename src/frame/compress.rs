//! Chunk encoder: turns one block of uncompressed bytes into one complete
//! data chunk (header, masked checksum, payload).
//!
//! The encoder always builds a whole chunk in an in-memory buffer; callers
//! hand that buffer to their sink in a single `write_all`, so a chunk is
//! either produced entirely or not at all.

use crate::checksum::masked_crc32c;
use crate::codec::{compress_bound, BlockEncoder};
use crate::config::{CHECKSUM_SIZE, CHUNK_HEADER_SIZE, MAX_BLOCK_SIZE, STREAM_IDENTIFIER};
use crate::frame::header::ChunkHeader;
use crate::frame::types::{ChunkType, FrameError, WriterOptions};

/// Worst-case size of one encoded data chunk holding `len` bytes.
pub fn compress_chunk_bound(len: usize) -> usize {
    CHUNK_HEADER_SIZE + CHECKSUM_SIZE + compress_bound(len).max(len)
}

/// Worst-case size of a complete stream encoding `len` bytes in chunks of
/// `block_size` (stream identifier included).
pub fn compress_stream_bound(len: usize, block_size: usize) -> usize {
    let block_size = block_size.clamp(1, MAX_BLOCK_SIZE);
    if len == 0 {
        return 0;
    }
    let full = len / block_size;
    let rest = len % block_size;
    let mut bound = STREAM_IDENTIFIER.len() + full * compress_chunk_bound(block_size);
    if rest > 0 {
        bound += compress_chunk_bound(rest);
    }
    bound
}

/// Compressed output is kept only when it saves at least 1/8 of the input;
/// otherwise the chunk is stored uncompressed.
#[inline]
fn worth_compressing(src_len: usize, compressed_len: usize) -> bool {
    compressed_len < src_len - src_len / 8
}

/// Stateful chunk encoder shared by both writers.
pub struct FrameEncoder {
    codec: BlockEncoder,
    checksum: bool,
    /// Scratch space for the compressed payload.
    scratch: Vec<u8>,
    /// Whether the stream identifier has been produced yet.
    wrote_stream_id: bool,
}

impl FrameEncoder {
    pub fn new(opts: &WriterOptions) -> Self {
        FrameEncoder {
            codec: BlockEncoder::new(),
            checksum: opts.checksum,
            scratch: Vec::new(),
            wrote_stream_id: false,
        }
    }

    /// Whether the stream identifier has already been emitted.
    pub fn started(&self) -> bool {
        self.wrote_stream_id
    }

    /// Forget that the stream identifier was produced, after the sink
    /// rejected the chunk that carried it.
    pub fn rewind_stream_identifier(&mut self) {
        self.wrote_stream_id = false;
    }

    /// Append one data chunk for `src` to `out`, preceded by the stream
    /// identifier if this is the first chunk of the stream.
    ///
    /// `src` must not exceed `MAX_BLOCK_SIZE`. On error `out` is restored to
    /// its original length.
    pub fn encode_chunk(&mut self, src: &[u8], out: &mut Vec<u8>) -> Result<(), FrameError> {
        let mark = out.len();
        let res = self.encode_chunk_inner(src, out);
        if res.is_err() {
            out.truncate(mark);
        }
        res
    }

    fn encode_chunk_inner(&mut self, src: &[u8], out: &mut Vec<u8>) -> Result<(), FrameError> {
        if src.len() > MAX_BLOCK_SIZE {
            return Err(FrameError::ChunkTooLarge {
                len: src.len(),
                max: MAX_BLOCK_SIZE,
            });
        }

        let needs_id = !self.wrote_stream_id;
        if needs_id {
            out.extend_from_slice(&STREAM_IDENTIFIER);
        }

        let crc = if self.checksum { masked_crc32c(src) } else { 0 };

        let bound = compress_bound(src.len());
        if self.scratch.len() < bound {
            self.scratch.resize(bound, 0);
        }
        let n = self.codec.compress(src, &mut self.scratch[..bound])?;

        let (chunk_type, payload) = if worth_compressing(src.len(), n) {
            (ChunkType::Compressed, &self.scratch[..n])
        } else {
            (ChunkType::Uncompressed, src)
        };

        let header = ChunkHeader::new(chunk_type, CHECKSUM_SIZE + payload.len());
        out.reserve(CHUNK_HEADER_SIZE + header.len);
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(payload);

        if needs_id {
            self.wrote_stream_id = true;
        }
        Ok(())
    }

    /// Append chunks for all of `src`, split at `block_size`.
    pub fn encode_all(
        &mut self,
        src: &[u8],
        block_size: usize,
        out: &mut Vec<u8>,
    ) -> Result<(), FrameError> {
        for block in src.chunks(block_size.clamp(1, MAX_BLOCK_SIZE)) {
            self.encode_chunk(block, out)?;
        }
        Ok(())
    }
}

/// Compress `src` as a complete framed stream held in memory.
///
/// An empty input produces an empty stream.
pub fn compress_stream(src: &[u8], opts: &WriterOptions) -> Result<Vec<u8>, FrameError> {
    let block_size = opts.effective_block_size();
    let mut out = Vec::with_capacity(compress_stream_bound(src.len(), block_size));
    FrameEncoder::new(opts).encode_all(src, block_size, &mut out)?;
    Ok(out)
}
