// Integration tests for src/stream/writer.rs: streaming encoders
//
//   - Writer: byte-count fidelity, block size option, sink error propagation
//   - BufferedWriter: pending bytes, flush / into_inner, direct full-chunk path

use std::io::{self, Write};

use snappystream::frame::{decompress_stream, VerifyMode, WriterOptions};
use snappystream::stream::{BufferedWriter, Writer};
use snappystream::MAX_BLOCK_SIZE;

/// Sink that rejects every write.
struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that records the size of every `write` call.
#[derive(Default)]
struct RecordingSink {
    data: Vec<u8>,
    calls: Vec<usize>,
}

impl Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls.push(buf.len());
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_reports_full_length() {
    for len in [0usize, 1, 4, 1000, MAX_BLOCK_SIZE, MAX_BLOCK_SIZE + 1, 128_000] {
        let data = vec![0x5a; len];
        let mut w = Writer::new(Vec::new());
        assert_eq!(w.write(&data).unwrap(), len);
        let back = decompress_stream(&w.into_inner(), VerifyMode::VerifyChecksum).unwrap();
        assert_eq!(back.len(), len);
    }
}

#[test]
fn one_sink_write_per_chunk() {
    let data = vec![1u8; 3 * 1024];
    let opts = WriterOptions::default().block_size(1024);
    let mut w = Writer::with_options(RecordingSink::default(), opts);
    w.write_all(&data).unwrap();
    let sink = w.into_inner();
    assert_eq!(sink.calls.len(), 3);
    assert_eq!(
        decompress_stream(&sink.data, VerifyMode::VerifyChecksum).unwrap(),
        data
    );
}

#[test]
fn sink_error_propagates() {
    let mut w = Writer::new(ClosedSink);
    let err = w.write(b"data").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

    let mut w = BufferedWriter::new(ClosedSink);
    w.write_all(b"data").unwrap();
    let err = w.flush().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert_eq!(w.buffered(), 4);
    assert!(w.into_inner().is_err());
}

/// Sink whose availability the test switches on and off.
struct Switchable {
    open: bool,
    data: Vec<u8>,
}

impl Write for Switchable {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.open {
            return Err(io::Error::new(io::ErrorKind::WouldBlock, "sink busy"));
        }
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn buffered_deferred_emit_error_surfaces_on_flush() {
    let sink = Switchable {
        open: false,
        data: Vec::new(),
    };
    let mut w = BufferedWriter::with_options(sink, WriterOptions::default().block_size(8));
    assert_eq!(w.write(b"0123").unwrap(), 4);
    // Fills the buffer exactly; the eager emit fails but the bytes were taken.
    assert_eq!(w.write(b"4567").unwrap(), 4);
    assert_eq!(w.buffered(), 8);

    let err = w.flush().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    assert_eq!(w.buffered(), 8);

    w.get_mut().open = true;
    w.flush().unwrap();
    assert_eq!(w.buffered(), 0);
    let sink = w.into_inner().unwrap();
    assert_eq!(
        decompress_stream(&sink.data, VerifyMode::VerifyChecksum).unwrap(),
        b"01234567"
    );
}

#[test]
fn buffered_small_writes_coalesce() {
    let opts = WriterOptions::default().block_size(1000);
    let mut w = BufferedWriter::with_options(RecordingSink::default(), opts);
    for _ in 0..250 {
        w.write_all(b"abcd").unwrap();
    }
    // Exactly one full chunk reached; emitted eagerly.
    assert_eq!(w.buffered(), 0);
    assert_eq!(w.get_ref().calls.len(), 1);

    w.write_all(b"tail").unwrap();
    let sink = w.into_inner().unwrap();
    assert_eq!(sink.calls.len(), 2);
    let back = decompress_stream(&sink.data, VerifyMode::VerifyChecksum).unwrap();
    assert_eq!(back.len(), 1004);
}

#[test]
fn buffered_flush_twice_is_harmless() {
    let mut w = BufferedWriter::new(RecordingSink::default());
    w.write_all(b"x").unwrap();
    w.flush().unwrap();
    w.flush().unwrap();
    assert_eq!(w.get_ref().calls.len(), 1);
}

#[test]
fn block_size_is_clamped() {
    let mut w = Writer::with_options(Vec::new(), WriterOptions::default().block_size(usize::MAX));
    w.write_all(&vec![0u8; MAX_BLOCK_SIZE * 2]).unwrap();
    let back = decompress_stream(&w.into_inner(), VerifyMode::VerifyChecksum).unwrap();
    assert_eq!(back.len(), MAX_BLOCK_SIZE * 2);
}
