// snappystream: Snappy framing format over std::io streams

pub mod config;
pub mod checksum;
pub mod codec;
pub mod frame;
pub mod stream;
pub mod io;
pub mod cli;

// ── Version constants ─────────────────────────────────────────────────────────
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use config::MAX_BLOCK_SIZE;
pub use frame::{compress_stream, decompress_stream, FrameError, VerifyMode, WriterOptions};
pub use stream::{BufferedWriter, Reader, Writer};
