//! E2E Test Suite 01: Stream Round Trip
//!
//! Drives the public `Writer` / `BufferedWriter` / `Reader` trio end to end:
//! - single and multi-chunk payloads through both writers
//! - interleaved writes of awkward sizes
//! - checksum-disabled streams read with and without verification
//! - agreement between the streaming and one-shot slice APIs

use std::io::{Cursor, Read, Write};

use snappystream::{
    compress_stream, decompress_stream, BufferedWriter, Reader, VerifyMode, Writer,
    WriterOptions, MAX_BLOCK_SIZE,
};

/// Deterministic pseudo-random bytes (xorshift), mostly incompressible.
fn noise(len: usize, mut seed: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        out.extend_from_slice(&seed.to_le_bytes());
    }
    out.truncate(len);
    out
}

/// Text that compresses well.
fn prose(len: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn read_all(framed: &[u8], verify: VerifyMode) -> Vec<u8> {
    let mut out = Vec::new();
    Reader::new(Cursor::new(framed), verify)
        .read_to_end(&mut out)
        .expect("stream should decode");
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: unbuffered writer, sizes around the chunk boundary
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_writer_roundtrip_boundary_sizes() {
    for len in [1, MAX_BLOCK_SIZE - 1, MAX_BLOCK_SIZE, MAX_BLOCK_SIZE + 1, 3 * MAX_BLOCK_SIZE] {
        for data in [prose(len), noise(len, 0x9e37_79b9)] {
            let mut w = Writer::new(Vec::new());
            w.write_all(&data).unwrap();
            let framed = w.into_inner();
            assert_eq!(read_all(&framed, VerifyMode::VerifyChecksum), data, "len {len}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: buffered writer, irregular write sizes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_buffered_writer_irregular_writes() {
    let data = prose(300_000);
    let mut w = BufferedWriter::with_options(Vec::new(), WriterOptions::default().block_size(10_000));
    let mut rest = &data[..];
    let mut step = 1usize;
    while !rest.is_empty() {
        let n = step.min(rest.len());
        w.write_all(&rest[..n]).unwrap();
        rest = &rest[n..];
        step = step * 7 % 23_456 + 1;
    }
    let framed = w.into_inner().unwrap();
    assert_eq!(read_all(&framed, VerifyMode::VerifyChecksum), data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: compressible input actually shrinks, incompressible input is stored
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compression_ratio_by_content() {
    let text = prose(MAX_BLOCK_SIZE);
    let framed = compress_stream(&text, &WriterOptions::default()).unwrap();
    assert!(framed.len() < text.len() / 4);

    let random = noise(MAX_BLOCK_SIZE, 7);
    let framed = compress_stream(&random, &WriterOptions::default()).unwrap();
    // Identifier + header + checksum around the stored bytes.
    assert_eq!(framed.len(), 10 + 4 + 4 + random.len());
    assert_eq!(framed[10], 0x01);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: streams without checksums
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_checksum_disabled_stream() {
    let data = prose(5000);
    let framed = compress_stream(&data, &WriterOptions::default().checksum(false)).unwrap();
    assert_eq!(&framed[14..18], &[0, 0, 0, 0]);

    assert_eq!(read_all(&framed, VerifyMode::Ignore), data);

    let mut r = Reader::new(&framed[..], VerifyMode::VerifyChecksum);
    let err = r.read_to_end(&mut Vec::new()).unwrap_err();
    assert!(snappystream::frame::frame_error(&err)
        .unwrap()
        .is_checksum_error());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: streaming and one-shot APIs agree
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_streaming_matches_one_shot() {
    let data = [prose(100_000), noise(50_000, 42)].concat();
    let opts = WriterOptions::default().block_size(8192);

    let one_shot = compress_stream(&data, &opts).unwrap();

    let mut w = Writer::with_options(Vec::new(), opts);
    w.write_all(&data).unwrap();
    assert_eq!(w.into_inner(), one_shot);

    assert_eq!(
        decompress_stream(&one_shot, VerifyMode::VerifyChecksum).unwrap(),
        read_all(&one_shot, VerifyMode::VerifyChecksum)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: writer into a reader through a pipe-like buffer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_writer_output_is_decodable_between_calls() {
    let mut w = Writer::new(Vec::new());
    let mut expected = Vec::new();
    for i in 0..20u8 {
        let piece = vec![i; 1000 + i as usize];
        w.write_all(&piece).unwrap();
        expected.extend_from_slice(&piece);
        // Every prefix the writer has produced is itself a complete stream.
        assert_eq!(read_all(w.get_ref(), VerifyMode::VerifyChecksum), expected);
    }
}
