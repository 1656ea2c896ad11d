//! Raw Snappy block codec used by the framing layer.
//!
//! The block format itself comes from the `snap` crate; this module only
//! narrows its API to what a chunk encoder/decoder needs and maps its errors
//! onto [`FrameError`].

use crate::frame::types::FrameError;

/// Worst-case compressed size of a block of `len` uncompressed bytes.
///
/// Returns `0` when `len` is too large to be compressed as a single block.
#[inline]
pub fn compress_bound(len: usize) -> usize {
    snap::raw::max_compress_len(len)
}

/// Decompressed length announced by the preamble of a compressed block.
pub fn decompressed_len(block: &[u8]) -> Result<usize, FrameError> {
    snap::raw::decompress_len(block).map_err(|e| FrameError::DecompressionFailed(e.to_string()))
}

/// Reusable block compressor.
///
/// Wraps a `snap::raw::Encoder`, which keeps its hash table allocated between
/// calls.
pub struct BlockEncoder {
    inner: snap::raw::Encoder,
}

impl BlockEncoder {
    pub fn new() -> Self {
        BlockEncoder {
            inner: snap::raw::Encoder::new(),
        }
    }

    /// Compress `src` into `dst`, returning the number of bytes written.
    ///
    /// `dst` must hold at least [`compress_bound`]`(src.len())` bytes.
    pub fn compress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, FrameError> {
        self.inner
            .compress(src, dst)
            .map_err(|e| FrameError::CompressionFailed(e.to_string()))
    }
}

impl Default for BlockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reusable block decompressor.
pub struct BlockDecoder {
    inner: snap::raw::Decoder,
}

impl BlockDecoder {
    pub fn new() -> Self {
        BlockDecoder {
            inner: snap::raw::Decoder::new(),
        }
    }

    /// Decompress `src` into `dst`, returning the number of bytes written.
    ///
    /// `dst` must be at least [`decompressed_len`]`(src)` bytes long.
    pub fn decompress(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, FrameError> {
        self.inner
            .decompress(src, dst)
            .map_err(|e| FrameError::DecompressionFailed(e.to_string()))
    }
}

impl Default for BlockDecoder {
    fn default() -> Self {
        Self::new()
    }
}
