//! Snappy framing format: chunk layout, encoding and decoding.
//!
//! The streaming `Read` / `Write` adapters built on top of these pieces live
//! in [`crate::stream`].

pub mod compress;
pub mod decompress;
pub mod header;
pub mod types;

// Re-export key public API items at the module level.
pub use compress::{compress_chunk_bound, compress_stream, compress_stream_bound, FrameEncoder};
pub use decompress::{decompress_stream, FrameDecoder};
pub use header::{check_stream_identifier, ChunkHeader};
pub use types::{frame_error, ChunkType, FrameError, VerifyMode, WriterOptions};
