// Integration tests for src/frame/decompress.rs: one-shot stream decoder
//
//   - decompress_stream: skippable / padding chunks, concatenated streams
//   - malformed input: missing identifier, reserved unskippable type,
//     corrupt payload, short bodies
//   - FrameDecoder::decode_chunk checksum policy

use snappystream::checksum::masked_crc32c;
use snappystream::config::STREAM_IDENTIFIER;
use snappystream::frame::compress::compress_stream;
use snappystream::frame::decompress::{decompress_stream, FrameDecoder};
use snappystream::frame::types::{ChunkType, FrameError, VerifyMode, WriterOptions};

fn framed(data: &[u8]) -> Vec<u8> {
    compress_stream(data, &WriterOptions::default()).unwrap()
}

fn chunk(kind: u8, body: &[u8]) -> Vec<u8> {
    let len = (body.len() as u32).to_le_bytes();
    let mut out = vec![kind, len[0], len[1], len[2]];
    out.extend_from_slice(body);
    out
}

#[test]
fn skippable_and_padding_chunks_ignored() {
    let mut s = STREAM_IDENTIFIER.to_vec();
    s.extend(chunk(0xfe, &[0u8; 32]));
    s.extend(chunk(0x80, b"metadata"));
    s.extend(chunk(0xfd, &[]));
    s.extend_from_slice(&framed(b"payload")[STREAM_IDENTIFIER.len()..]);
    assert_eq!(decompress_stream(&s, VerifyMode::VerifyChecksum).unwrap(), b"payload");
}

#[test]
fn concatenated_streams_decode() {
    let mut s = framed(b"first ");
    s.extend(framed(b"second"));
    assert_eq!(
        decompress_stream(&s, VerifyMode::VerifyChecksum).unwrap(),
        b"first second"
    );
}

#[test]
fn data_before_identifier_rejected() {
    let s = framed(b"abc");
    let err = decompress_stream(&s[STREAM_IDENTIFIER.len()..], VerifyMode::Ignore).unwrap_err();
    assert_eq!(err, FrameError::MissingStreamIdentifier { chunk_type: 0x01 });
}

#[test]
fn padding_before_identifier_rejected() {
    let mut s = chunk(0xfe, &[0; 4]);
    s.extend(framed(b"abc"));
    let err = decompress_stream(&s, VerifyMode::Ignore).unwrap_err();
    assert_eq!(err, FrameError::MissingStreamIdentifier { chunk_type: 0xfe });
}

#[test]
fn unskippable_chunk_rejected() {
    let mut s = STREAM_IDENTIFIER.to_vec();
    s.extend(chunk(0x7f, b"?"));
    let err = decompress_stream(&s, VerifyMode::Ignore).unwrap_err();
    assert_eq!(err, FrameError::UnskippableChunk { chunk_type: 0x7f });
    assert!(err.is_malformed());
}

#[test]
fn corrupt_compressed_payload_rejected() {
    let mut s = STREAM_IDENTIFIER.to_vec();
    // Announces 10 bytes, then a 1-byte literal with no literal byte.
    let mut body = 0u32.to_le_bytes().to_vec();
    body.extend_from_slice(&[0x0a, 0x00]);
    s.extend(chunk(0x00, &body));
    let err = decompress_stream(&s, VerifyMode::Ignore).unwrap_err();
    assert!(matches!(err, FrameError::DecompressionFailed(_)));
}

#[test]
fn short_data_body_rejected() {
    let mut s = STREAM_IDENTIFIER.to_vec();
    s.extend(chunk(0x01, &[1, 2, 3]));
    let err = decompress_stream(&s, VerifyMode::Ignore).unwrap_err();
    assert_eq!(err, FrameError::ChunkTooShort { len: 3 });
}

#[test]
fn bad_identifier_body_rejected() {
    let s = chunk(0xff, b"sNaPpZ");
    assert_eq!(
        decompress_stream(&s, VerifyMode::Ignore).unwrap_err(),
        FrameError::StreamIdentifierInvalid
    );
}

#[test]
fn truncated_header_rejected() {
    let s = framed(b"abc");
    let err = decompress_stream(&s[..STREAM_IDENTIFIER.len() + 2], VerifyMode::Ignore).unwrap_err();
    assert_eq!(err, FrameError::Truncated { needed: 4, got: 2 });
}

#[test]
fn decoder_reports_checksum_values() {
    let mut body = 0x1234_5678u32.to_le_bytes().to_vec();
    body.extend_from_slice(b"data");
    let mut dst = Vec::new();
    let err = FrameDecoder::new(VerifyMode::VerifyChecksum)
        .decode_chunk(ChunkType::Uncompressed, &body, &mut dst)
        .unwrap_err();
    assert_eq!(
        err,
        FrameError::ChecksumMismatch {
            expected: 0x1234_5678,
            actual: masked_crc32c(b"data"),
        }
    );
}

#[test]
fn decoder_replaces_previous_output() {
    let mut dec = FrameDecoder::new(VerifyMode::VerifyChecksum);
    let mut dst = b"stale".to_vec();
    let mut body = masked_crc32c(b"new").to_le_bytes().to_vec();
    body.extend_from_slice(b"new");
    dec.decode_chunk(ChunkType::Uncompressed, &body, &mut dst).unwrap();
    assert_eq!(dst, b"new");
}

#[test]
fn decoder_rejects_non_data_chunk_types() {
    let mut dec = FrameDecoder::new(VerifyMode::Ignore);
    let mut dst = b"stale".to_vec();
    for t in [
        ChunkType::StreamIdentifier,
        ChunkType::Padding,
        ChunkType::ReservedSkippable(0x80),
        ChunkType::ReservedUnskippable(0x02),
    ] {
        let err = dec.decode_chunk(t, &[0u8; 8], &mut dst).unwrap_err();
        assert_eq!(err, FrameError::NotDataChunk { chunk_type: t.as_byte() });
        assert!(dst.is_empty());
    }
}
