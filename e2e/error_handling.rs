//! E2E Test Suite 02: Error Handling
//!
//! Feeds damaged or hostile streams to the public `Reader` and the one-shot
//! `decompress_stream` and checks that both reject them with the same
//! `FrameError`, never panic, and never hand out corrupt data.

use std::io::{self, Read};

use snappystream::frame::frame_error;
use snappystream::{compress_stream, decompress_stream, FrameError, Reader, VerifyMode, WriterOptions};

const STREAM_ID: [u8; 10] = [0xff, 0x06, 0x00, 0x00, b's', b'N', b'a', b'P', b'p', b'Y'];

fn chunk(kind: u8, body: &[u8]) -> Vec<u8> {
    let len = (body.len() as u32).to_le_bytes();
    let mut out = vec![kind, len[0], len[1], len[2]];
    out.extend_from_slice(body);
    out
}

/// Decode `framed` through both APIs and return the streaming error, after
/// checking the one-shot decoder agrees.
fn reject(framed: &[u8], verify: VerifyMode) -> FrameError {
    let one_shot = decompress_stream(framed, verify).expect_err("one-shot decode should fail");

    let mut r = Reader::new(framed, verify);
    let err = r.read_to_end(&mut Vec::new()).expect_err("streaming decode should fail");
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    let streamed = frame_error(&err).expect("error should carry a FrameError").clone();

    assert_eq!(streamed, one_shot);
    streamed
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: stream must open with the identifier
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_stream_identifier() {
    let framed = compress_stream(b"headless", &WriterOptions::default()).unwrap();
    let err = reject(&framed[STREAM_ID.len()..], VerifyMode::Ignore);
    assert_eq!(err, FrameError::MissingStreamIdentifier { chunk_type: 0x01 });
    assert_eq!(err.error_name(), "ERROR_streamIdentifier_missing");
}

#[test]
fn test_wrong_identifier_length() {
    let mut framed = chunk(0xff, b"sNaPpYx");
    framed.extend(chunk(0x01, &[0; 5]));
    assert_eq!(reject(&framed, VerifyMode::Ignore), FrameError::StreamIdentifierInvalid);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: every reserved unskippable type is fatal
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reserved_unskippable_types() {
    for kind in 0x02u8..=0x7f {
        let mut framed = STREAM_ID.to_vec();
        framed.extend(chunk(kind, b""));
        assert_eq!(
            reject(&framed, VerifyMode::Ignore),
            FrameError::UnskippableChunk { chunk_type: kind }
        );
    }
}

#[test]
fn test_reserved_skippable_types_are_ignored() {
    let mut framed = STREAM_ID.to_vec();
    for kind in 0x80u8..=0xfd {
        framed.extend(chunk(kind, &[kind; 3]));
    }
    framed.extend_from_slice(
        &compress_stream(b"survivor", &WriterOptions::default()).unwrap()[STREAM_ID.len()..],
    );
    let mut out = Vec::new();
    Reader::new(&framed[..], VerifyMode::VerifyChecksum)
        .read_to_end(&mut out)
        .unwrap();
    assert_eq!(out, b"survivor");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: truncation at every offset
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_truncation_at_every_offset() {
    let framed = compress_stream(&b"truncate me ".repeat(30), &WriterOptions::default()).unwrap();
    for cut in 1..framed.len() {
        if cut == STREAM_ID.len() {
            // Identifier alone is a complete, empty stream.
            continue;
        }
        let err = reject(&framed[..cut], VerifyMode::VerifyChecksum);
        assert!(err.is_malformed(), "cut {cut}: {err}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: size limits
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_oversized_uncompressed_chunk() {
    let mut framed = STREAM_ID.to_vec();
    framed.extend(chunk(0x01, &vec![0u8; 4 + 65_537]));
    assert!(matches!(
        reject(&framed, VerifyMode::Ignore),
        FrameError::ChunkTooLarge { .. }
    ));
}

#[test]
fn test_compressed_chunk_claiming_huge_output() {
    let mut body = vec![0u8; 4];
    // Varint 1 << 20: decompressed length far beyond one block.
    body.extend_from_slice(&[0x80, 0x80, 0x40]);
    let mut framed = STREAM_ID.to_vec();
    framed.extend(chunk(0x00, &body));
    assert!(matches!(
        reject(&framed, VerifyMode::Ignore),
        FrameError::DecompressedTooLarge { .. }
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: checksum verification follows the reader's mode
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_corrupted_payload_byte() {
    // Too short to compress, so the chunk is stored verbatim.
    let data = b"checksummed payload";
    let mut framed = compress_stream(data, &WriterOptions::default()).unwrap();
    assert_eq!(framed[STREAM_ID.len()], 0x01);
    let last = framed.len() - 1;
    framed[last] ^= 0x20;

    let err = reject(&framed, VerifyMode::VerifyChecksum);
    assert!(err.is_checksum_error());

    let decoded = decompress_stream(&framed, VerifyMode::Ignore).unwrap();
    assert_eq!(decoded.len(), data.len());
    assert_ne!(&decoded[..], &data[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: source failures are passed through, not turned into frame errors
// ─────────────────────────────────────────────────────────────────────────────

struct Flaky {
    data: Vec<u8>,
    pos: usize,
    fail_at: usize,
    failed: bool,
}

impl Read for Flaky {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.fail_at && !self.failed {
            self.failed = true;
            return Err(io::Error::new(io::ErrorKind::TimedOut, "slow disk"));
        }
        let end = self.data.len().min(self.pos + buf.len());
        let end = if self.pos < self.fail_at { end.min(self.fail_at) } else { end };
        let n = end - self.pos;
        buf[..n].copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(n)
    }
}

/// Drain `r`, retrying after every source error. Returns the decoded bytes and
/// the number of errors seen.
fn read_with_retries<R: Read>(r: &mut Reader<R>) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let mut errors = 0;
    let mut buf = [0u8; 7];
    loop {
        match r.read(&mut buf) {
            Ok(0) => return (out, errors),
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) => {
                assert_eq!(e.kind(), io::ErrorKind::TimedOut, "{e}");
                errors += 1;
                assert!(errors <= 1, "source error repeated");
            }
        }
    }
}

#[test]
fn test_source_error_at_every_offset_resumes() {
    let data: Vec<u8> = b"resume after a hiccup; "
        .iter()
        .copied()
        .cycle()
        .take(300)
        .collect();
    let mut framed = compress_stream(&data[..100], &WriterOptions::default()).unwrap();
    // Padding and a skippable chunk so the failure also lands inside skipped bodies.
    framed.extend(chunk(0xfe, &[0u8; 9]));
    framed.extend(chunk(0x99, b"metadata"));
    framed.extend_from_slice(
        &compress_stream(&data[100..], &WriterOptions::default().block_size(64)).unwrap()
            [STREAM_ID.len()..],
    );

    for fail_at in 0..=framed.len() {
        let mut r = Reader::new(
            Flaky {
                data: framed.clone(),
                pos: 0,
                fail_at,
                failed: false,
            },
            VerifyMode::VerifyChecksum,
        );
        let (out, errors) = read_with_retries(&mut r);
        assert_eq!(errors, 1, "fail_at {fail_at}");
        assert_eq!(out, data, "fail_at {fail_at}");
    }
}

#[test]
fn test_source_error_is_not_sticky() {
    let data = b"0123456789".repeat(10);
    let framed = compress_stream(&data, &WriterOptions::default().block_size(10)).unwrap();
    // Fail between the first and second data chunk.
    let fail_at = STREAM_ID.len() + 4 + 4 + 10;
    let mut r = Reader::new(
        Flaky {
            data: framed,
            pos: 0,
            fail_at,
            failed: false,
        },
        VerifyMode::VerifyChecksum,
    );

    let mut first = [0u8; 10];
    r.read_exact(&mut first).unwrap();
    assert_eq!(&first, b"0123456789");

    let err = r.read(&mut [0u8; 10]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);

    let mut rest = Vec::new();
    r.read_to_end(&mut rest).unwrap();
    assert_eq!(rest.len(), 90);
}
