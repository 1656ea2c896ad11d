//! Chunk decoder: validates and decodes the body of one data chunk, plus a
//! one-shot decoder for complete streams held in memory.

use crate::checksum::masked_crc32c;
use crate::codec::{decompressed_len, BlockDecoder};
use crate::config::{CHECKSUM_SIZE, CHUNK_HEADER_SIZE, MAX_BLOCK_SIZE};
use crate::frame::header::{check_stream_identifier, ChunkHeader};
use crate::frame::types::{ChunkType, FrameError, VerifyMode};

/// Stateful data-chunk decoder used by [`Reader`](crate::stream::Reader).
pub struct FrameDecoder {
    codec: BlockDecoder,
    verify: VerifyMode,
}

impl FrameDecoder {
    pub fn new(verify: VerifyMode) -> Self {
        FrameDecoder {
            codec: BlockDecoder::new(),
            verify,
        }
    }

    pub fn verify_mode(&self) -> VerifyMode {
        self.verify
    }

    /// Decode the body of a data chunk into `dst`, replacing its contents.
    ///
    /// `body` is everything after the chunk header: the masked checksum
    /// followed by the payload. Returns the number of decoded bytes.
    /// Any `chunk_type` other than compressed or uncompressed is rejected
    /// with [`FrameError::NotDataChunk`].
    pub fn decode_chunk(
        &mut self,
        chunk_type: ChunkType,
        body: &[u8],
        dst: &mut Vec<u8>,
    ) -> Result<usize, FrameError> {
        if !chunk_type.is_data() {
            dst.clear();
            return Err(FrameError::NotDataChunk {
                chunk_type: chunk_type.as_byte(),
            });
        }
        ChunkHeader::new(chunk_type, body.len()).check_data_len()?;
        let (crc_bytes, payload) = body.split_at(CHECKSUM_SIZE);
        let expected = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

        dst.clear();
        match chunk_type {
            ChunkType::Compressed => {
                let len = decompressed_len(payload)?;
                if len > MAX_BLOCK_SIZE {
                    return Err(FrameError::DecompressedTooLarge {
                        len,
                        max: MAX_BLOCK_SIZE,
                    });
                }
                dst.resize(len, 0);
                let n = match self.codec.decompress(payload, dst) {
                    Ok(n) => n,
                    Err(e) => {
                        dst.clear();
                        return Err(e);
                    }
                };
                dst.truncate(n);
            }
            // Uncompressed.
            _ => dst.extend_from_slice(payload),
        }

        if self.verify.verifies() {
            let actual = masked_crc32c(dst);
            if actual != expected {
                dst.clear();
                return Err(FrameError::ChecksumMismatch { expected, actual });
            }
        }
        Ok(dst.len())
    }
}

/// Decode a complete framed stream held in memory.
///
/// The input must end on a chunk boundary; an empty input decodes to an
/// empty output.
pub fn decompress_stream(src: &[u8], verify: VerifyMode) -> Result<Vec<u8>, FrameError> {
    let mut decoder = FrameDecoder::new(verify);
    let mut out = Vec::new();
    let mut chunk = Vec::new();
    let mut seen_stream_id = false;
    let mut pos = 0usize;

    while pos < src.len() {
        let avail = src.len() - pos;
        if avail < CHUNK_HEADER_SIZE {
            return Err(FrameError::Truncated {
                needed: CHUNK_HEADER_SIZE,
                got: avail,
            });
        }
        let mut hdr = [0u8; CHUNK_HEADER_SIZE];
        hdr.copy_from_slice(&src[pos..pos + CHUNK_HEADER_SIZE]);
        let header = ChunkHeader::parse(hdr);
        pos += CHUNK_HEADER_SIZE;

        if header.chunk_type != ChunkType::StreamIdentifier && !seen_stream_id {
            return Err(FrameError::MissingStreamIdentifier {
                chunk_type: header.chunk_type.as_byte(),
            });
        }
        if header.chunk_type.is_data() {
            header.check_data_len()?;
        }

        let avail = src.len() - pos;
        if avail < header.len {
            return Err(FrameError::Truncated {
                needed: header.len,
                got: avail,
            });
        }
        let body = &src[pos..pos + header.len];
        pos += header.len;

        match header.chunk_type {
            ChunkType::StreamIdentifier => {
                check_stream_identifier(body)?;
                seen_stream_id = true;
            }
            ChunkType::Compressed | ChunkType::Uncompressed => {
                decoder.decode_chunk(header.chunk_type, body, &mut chunk)?;
                out.extend_from_slice(&chunk);
            }
            ChunkType::Padding | ChunkType::ReservedSkippable(_) => {}
            ChunkType::ReservedUnskippable(b) => {
                return Err(FrameError::UnskippableChunk { chunk_type: b });
            }
        }
    }
    Ok(out)
}
