// Integration tests for src/stream/reader.rs: streaming decoder
//
//   - Read: leftover retention across calls, end-of-stream signalling
//   - BufRead: fill_buf / consume / read_line over decoded data
//   - copy_to
//   - Error surfaces: truncation, source I/O errors, sticky frame errors

use std::io::{self, BufRead, Read};

use snappystream::config::STREAM_IDENTIFIER;
use snappystream::frame::{compress_stream, frame_error, FrameError, VerifyMode, WriterOptions};
use snappystream::stream::Reader;

fn framed(data: &[u8]) -> Vec<u8> {
    compress_stream(data, &WriterOptions::default()).unwrap()
}

/// Source that serves `data` and then fails instead of reporting EOF.
struct FailingSource<'a> {
    data: &'a [u8],
}

impl Read for FailingSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "source gone"));
        }
        let n = self.data.len().min(buf.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[test]
fn leftovers_served_before_next_chunk() {
    let s = framed(b"0123456789");
    let mut r = Reader::new(&s[..], VerifyMode::VerifyChecksum);
    let mut buf = [0u8; 4];
    assert_eq!(r.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"0123");
    assert_eq!(r.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"4567");
    assert_eq!(r.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"89");
    assert_eq!(r.read(&mut buf).unwrap(), 0);
}

#[test]
fn empty_caller_buffer_reads_nothing() {
    let s = framed(b"data");
    let mut r = Reader::new(&s[..], VerifyMode::VerifyChecksum);
    assert_eq!(r.read(&mut []).unwrap(), 0);
    let mut out = Vec::new();
    r.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"data");
}

#[test]
fn buf_read_lines() {
    let text = "alpha\nbeta\ngamma\n".repeat(5000);
    let s = compress_stream(text.as_bytes(), &WriterOptions::default().block_size(1000)).unwrap();
    let r = Reader::new(&s[..], VerifyMode::VerifyChecksum);
    let lines: Vec<String> = r.lines().map(|l| l.unwrap()).collect();
    assert_eq!(lines.len(), 15_000);
    assert_eq!(lines[0], "alpha");
    assert_eq!(lines[14_999], "gamma");
}

#[test]
fn fill_buf_exposes_one_chunk() {
    let src = vec![3u8; 5000];
    let s = compress_stream(&src, &WriterOptions::default().block_size(2048)).unwrap();
    let mut r = Reader::new(&s[..], VerifyMode::VerifyChecksum);
    assert_eq!(r.fill_buf().unwrap().len(), 2048);
    r.consume(2000);
    assert_eq!(r.fill_buf().unwrap().len(), 48);
    r.consume(48);
    assert_eq!(r.fill_buf().unwrap().len(), 2048);
}

#[test]
fn copy_to_counts_bytes() {
    let src = b"xyz".repeat(50_000);
    let s = framed(&src);
    let mut out = Vec::new();
    let n = Reader::new(&s[..], VerifyMode::VerifyChecksum)
        .copy_to(&mut out)
        .unwrap();
    assert_eq!(n, src.len() as u64);
    assert_eq!(out, src);
}

#[test]
fn truncated_body_is_malformed() {
    let s = framed(b"some bytes");
    let mut r = Reader::new(&s[..s.len() - 3], VerifyMode::Ignore);
    let err = r.read_to_end(&mut Vec::new()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(matches!(frame_error(&err), Some(FrameError::Truncated { .. })));
}

#[test]
fn truncated_skippable_chunk_is_malformed() {
    let mut s = STREAM_IDENTIFIER.to_vec();
    s.extend_from_slice(&[0xfe, 0x10, 0x00, 0x00, 0, 0, 0]);
    let mut r = Reader::new(&s[..], VerifyMode::Ignore);
    let err = r.read(&mut [0u8; 8]).unwrap_err();
    assert_eq!(
        frame_error(&err),
        Some(&FrameError::Truncated { needed: 16, got: 3 })
    );
}

#[test]
fn source_io_error_propagates_unchanged() {
    let s = framed(b"before failure");
    let mut r = Reader::new(FailingSource { data: &s }, VerifyMode::VerifyChecksum);
    let mut out = [0u8; 14];
    r.read_exact(&mut out).unwrap();
    assert_eq!(&out, b"before failure");

    let err = r.read(&mut out).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    assert!(frame_error(&err).is_none());
}

/// Source that fails once with `kind` when it reaches `fail_at`.
struct Hiccup {
    data: Vec<u8>,
    pos: usize,
    fail_at: usize,
    kind: io::ErrorKind,
    fired: bool,
}

impl Hiccup {
    fn new(data: Vec<u8>, fail_at: usize, kind: io::ErrorKind) -> Self {
        Hiccup {
            data,
            pos: 0,
            fail_at,
            kind,
            fired: false,
        }
    }
}

impl Read for Hiccup {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.fail_at && !self.fired {
            self.fired = true;
            return Err(io::Error::new(self.kind, "not ready"));
        }
        let limit = if self.pos < self.fail_at {
            self.fail_at
        } else {
            self.data.len()
        };
        let end = limit.min(self.pos + buf.len());
        let n = end - self.pos;
        buf[..n].copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(n)
    }
}

#[test]
fn retry_after_error_inside_body_resumes() {
    // Payload that itself looks like a chunk header plus data.
    let payload = [1u8, 9, 0, 0, 0, 0, 0, 0, b'E', b'V', b'I', b'L', b'!'];
    let s = framed(&payload);
    assert_eq!(s[STREAM_IDENTIFIER.len()], 0x01);
    // Right after the checksum, before the payload.
    let fail_at = STREAM_IDENTIFIER.len() + 4 + 4;

    let mut r = Reader::new(
        Hiccup::new(s, fail_at, io::ErrorKind::WouldBlock),
        VerifyMode::Ignore,
    );
    let err = r.read(&mut [0u8; 32]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

    let mut out = Vec::new();
    r.read_to_end(&mut out).unwrap();
    assert_eq!(out, payload);
}

#[test]
fn retry_after_error_inside_header_resumes() {
    let mut s = framed(b"first");
    s.extend(framed(b"second"));
    let second_chunk = s.len() - (4 + 4 + 6);
    // Two bytes into the second data chunk's header.
    let fail_at = second_chunk + 2;

    let mut r = Reader::new(
        Hiccup::new(s, fail_at, io::ErrorKind::TimedOut),
        VerifyMode::VerifyChecksum,
    );
    let mut out = [0u8; 5];
    r.read_exact(&mut out).unwrap();
    assert_eq!(&out, b"first");

    let err = r.read(&mut [0u8; 16]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    assert!(frame_error(&err).is_none());

    let mut rest = String::new();
    r.read_to_string(&mut rest).unwrap();
    assert_eq!(rest, "second");
}

#[test]
fn retry_after_error_inside_identifier_resumes() {
    let s = framed(b"payload");
    let mut r = Reader::new(
        Hiccup::new(s, 7, io::ErrorKind::Interrupted),
        VerifyMode::VerifyChecksum,
    );
    // Interrupted is retried internally.
    let mut out = Vec::new();
    r.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"payload");
}

#[test]
fn checksum_error_is_sticky() {
    let mut s = framed(b"tamper");
    let crc_at = STREAM_IDENTIFIER.len() + 4;
    s[crc_at] ^= 1;
    s.extend(framed(b"valid tail"));

    let mut r = Reader::new(&s[..], VerifyMode::VerifyChecksum);
    let mut buf = [0u8; 64];
    for _ in 0..3 {
        let err = r.read(&mut buf).unwrap_err();
        assert!(frame_error(&err).unwrap().is_checksum_error());
    }
}

#[test]
fn accessors() {
    let s = framed(b"abc");
    let mut r = Reader::new(&s[..], VerifyMode::VerifyChecksum);
    assert_eq!(r.verify_mode(), VerifyMode::VerifyChecksum);
    assert_eq!(r.get_ref().len(), s.len());
    let _ = r.get_mut();
    let rest = r.into_inner();
    assert_eq!(rest.len(), s.len());
}
