// config.rs: Compile-time configuration constants for the Snappy framing format.
//
// Runtime configuration is carried by explicit values instead of globals:
// `frame::WriterOptions` for writers, `frame::VerifyMode` for readers and
// `io::Prefs` for the file-level operations used by the binary.

// Size multiplier.
pub const KB: usize = 1 << 10;

// Maximum number of uncompressed bytes carried by one data chunk.
// Writers never exceed it; readers reject chunks that decode past it.
pub const MAX_BLOCK_SIZE: usize = 64 * KB;

// Default chunk size used by the writers when no option overrides it.
pub const DEFAULT_BLOCK_SIZE: usize = MAX_BLOCK_SIZE;

// Every chunk starts with a 1-byte type tag followed by a 24-bit
// little-endian body length.
pub const CHUNK_HEADER_SIZE: usize = 4;

// Largest body length representable in the 24-bit length field.
pub const MAX_CHUNK_LEN: usize = 0x00ff_ffff;

// Data chunks carry a masked CRC-32C of the uncompressed bytes ahead of the payload.
pub const CHECKSUM_SIZE: usize = 4;

// Body of the stream identifier chunk.
pub const STREAM_IDENTIFIER_BODY: &[u8; 6] = b"sNaPpY";

// Complete stream identifier chunk as it appears on the wire.
pub const STREAM_IDENTIFIER: [u8; 10] = [
    0xff, 0x06, 0x00, 0x00, b's', b'N', b'a', b'P', b'p', b'Y',
];

// Conventional file extension for framed Snappy streams.
pub const SZ_EXTENSION: &str = ".sz";

// Size of the copy buffer used by the file-level helpers.
pub const IO_BUFFER_SIZE: usize = MAX_BLOCK_SIZE;
