// Integration tests for src/frame/header.rs: chunk header layout
//
//   - ChunkHeader::parse / to_bytes: 1-byte type + 24-bit little-endian length
//   - max_body_len: per-type body limits
//   - check_stream_identifier: "sNaPpY" body validation

use snappystream::codec::compress_bound;
use snappystream::config::{CHECKSUM_SIZE, MAX_BLOCK_SIZE, MAX_CHUNK_LEN, STREAM_IDENTIFIER};
use snappystream::frame::header::{check_stream_identifier, max_body_len, ChunkHeader};
use snappystream::frame::types::{ChunkType, FrameError};

#[test]
fn parse_max_length() {
    let h = ChunkHeader::parse([0xfe, 0xff, 0xff, 0xff]);
    assert_eq!(h.chunk_type, ChunkType::Padding);
    assert_eq!(h.len, MAX_CHUNK_LEN);
}

#[test]
fn parse_reserved_types_keep_raw_byte() {
    let h = ChunkHeader::parse([0x42, 0x01, 0x00, 0x00]);
    assert_eq!(h.chunk_type, ChunkType::ReservedUnskippable(0x42));
    assert_eq!(h.len, 1);
    let h = ChunkHeader::parse([0x99, 0x00, 0x01, 0x00]);
    assert_eq!(h.chunk_type, ChunkType::ReservedSkippable(0x99));
    assert_eq!(h.len, 256);
}

#[test]
fn to_bytes_is_little_endian() {
    let h = ChunkHeader::new(ChunkType::Uncompressed, CHECKSUM_SIZE + MAX_BLOCK_SIZE);
    assert_eq!(h.to_bytes(), [0x01, 0x04, 0x00, 0x01]);
}

#[test]
fn stream_identifier_wire_bytes() {
    assert_eq!(&STREAM_IDENTIFIER[..4], &[0xff, 0x06, 0x00, 0x00]);
    assert_eq!(&STREAM_IDENTIFIER[4..], b"sNaPpY");
    assert!(check_stream_identifier(&STREAM_IDENTIFIER[4..]).is_ok());
    assert_eq!(
        check_stream_identifier(b"SNAPPY"),
        Err(FrameError::StreamIdentifierInvalid)
    );
}

#[test]
fn body_limits_per_type() {
    assert_eq!(
        max_body_len(ChunkType::Compressed),
        CHECKSUM_SIZE + compress_bound(MAX_BLOCK_SIZE)
    );
    assert_eq!(max_body_len(ChunkType::Uncompressed), CHECKSUM_SIZE + MAX_BLOCK_SIZE);
    assert_eq!(max_body_len(ChunkType::StreamIdentifier), 6);
    assert_eq!(max_body_len(ChunkType::Padding), MAX_CHUNK_LEN);
}

#[test]
fn compressed_body_limit_enforced() {
    let max = max_body_len(ChunkType::Compressed);
    assert!(ChunkHeader::new(ChunkType::Compressed, max).check_data_len().is_ok());
    assert_eq!(
        ChunkHeader::new(ChunkType::Compressed, max + 1).check_data_len(),
        Err(FrameError::ChunkTooLarge { len: max + 1, max })
    );
}
