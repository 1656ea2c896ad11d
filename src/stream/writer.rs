//! Streaming chunk writers.
//!
//! - [`Writer`] frames every `write` call immediately, so the sink always
//!   holds a complete, decodable stream between calls.
//! - [`BufferedWriter`] accumulates input until a full chunk is available and
//!   only then emits it; the remainder waits for the next write, `flush`,
//!   `into_inner` or drop.
//!
//! Both hand each chunk to the sink with one `write_all` call.

use std::io::{self, Write};

use crate::frame::compress::FrameEncoder;
use crate::frame::types::WriterOptions;

/// Encode `block` as one chunk and write it to `inner`.
///
/// If the sink rejects the very first chunk, the encoder is told that the
/// stream identifier never went out so the next chunk carries it again.
fn emit_chunk<W: Write>(
    inner: &mut W,
    encoder: &mut FrameEncoder,
    dst: &mut Vec<u8>,
    block: &[u8],
) -> io::Result<()> {
    let was_started = encoder.started();
    dst.clear();
    encoder.encode_chunk(block, dst)?;
    if let Err(e) = inner.write_all(dst) {
        if !was_started {
            encoder.rewind_stream_identifier();
        }
        return Err(e);
    }
    Ok(())
}

/// Report progress made before an error, the way `Write::write` expects.
#[inline]
fn partial(consumed: usize, e: io::Error) -> io::Result<usize> {
    if consumed == 0 {
        Err(e)
    } else {
        Ok(consumed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Writer<W>
// ─────────────────────────────────────────────────────────────────────────────

/// Unbuffered Snappy frame writer backed by any `W: Write`.
///
/// # Usage
/// ```
/// use snappystream::stream::{Reader, Writer};
/// use snappystream::frame::VerifyMode;
/// use std::io::{Read, Write};
///
/// let mut w = Writer::new(Vec::new());
/// w.write_all(b"test").unwrap();
/// let framed = w.into_inner();
///
/// let mut r = Reader::new(&framed[..], VerifyMode::VerifyChecksum);
/// let mut out = [0u8; 4];
/// r.read_exact(&mut out).unwrap();
/// assert_eq!(&out, b"test");
/// ```
pub struct Writer<W: Write> {
    inner: W,
    encoder: FrameEncoder,
    block_size: usize,
    /// Staging buffer holding the chunk being written.
    dst: Vec<u8>,
}

impl<W: Write> Writer<W> {
    pub fn new(inner: W) -> Self {
        Self::with_options(inner, WriterOptions::default())
    }

    pub fn with_options(inner: W, opts: WriterOptions) -> Self {
        Writer {
            inner,
            encoder: FrameEncoder::new(&opts),
            block_size: opts.effective_block_size(),
            dst: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Nothing is ever pending, so this cannot lose data.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for Writer<W> {
    /// Compress all of `buf` into chunks of at most `block_size` bytes and
    /// write them to the sink.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut consumed = 0usize;
        for block in buf.chunks(self.block_size) {
            if let Err(e) = emit_chunk(&mut self.inner, &mut self.encoder, &mut self.dst, block) {
                return partial(consumed, e);
            }
            consumed += block.len();
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BufferedWriter<W>
// ─────────────────────────────────────────────────────────────────────────────

/// Buffered Snappy frame writer backed by any `W: Write`.
///
/// Pending bytes are flushed as a final (possibly short) chunk by
/// [`flush`](Write::flush), [`into_inner`](BufferedWriter::into_inner) or
/// drop. Errors during drop are silently discarded; call `into_inner` to
/// observe them.
pub struct BufferedWriter<W: Write> {
    /// Wrapped in `Option` so `into_inner()` can take ownership.
    inner: Option<W>,
    encoder: FrameEncoder,
    block_size: usize,
    /// Input not yet emitted; never longer than `block_size`.
    buf: Vec<u8>,
    dst: Vec<u8>,
}

impl<W: Write> BufferedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_options(inner, WriterOptions::default())
    }

    pub fn with_options(inner: W, opts: WriterOptions) -> Self {
        let block_size = opts.effective_block_size();
        BufferedWriter {
            inner: Some(inner),
            encoder: FrameEncoder::new(&opts),
            block_size,
            buf: Vec::with_capacity(block_size),
            dst: Vec::new(),
        }
    }

    /// Number of bytes accepted but not yet emitted.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn get_ref(&self) -> &W {
        self.inner.as_ref().expect("inner writer already taken")
    }

    pub fn get_mut(&mut self) -> &mut W {
        self.inner.as_mut().expect("inner writer already taken")
    }

    /// Emit pending bytes and return the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush_buf()?;
        Ok(self.inner.take().expect("inner writer already taken"))
    }

    /// Emit the pending bytes as one chunk.
    fn flush_buf(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let inner = self.inner.as_mut().expect("inner writer already taken");
        emit_chunk(inner, &mut self.encoder, &mut self.dst, &self.buf)?;
        self.buf.clear();
        Ok(())
    }

    /// Emit one full chunk taken directly from caller input.
    fn write_block(&mut self, block: &[u8]) -> io::Result<()> {
        let inner = self.inner.as_mut().expect("inner writer already taken");
        emit_chunk(inner, &mut self.encoder, &mut self.dst, block)
    }
}

impl<W: Write> Write for BufferedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let bs = self.block_size;
        let mut consumed = 0usize;

        while consumed < buf.len() {
            // A full buffer left over from a failed emit goes out first.
            if self.buf.len() >= bs {
                if let Err(e) = self.flush_buf() {
                    return partial(consumed, e);
                }
            }

            let rest = &buf[consumed..];
            if self.buf.is_empty() && rest.len() >= bs {
                if let Err(e) = self.write_block(&rest[..bs]) {
                    return partial(consumed, e);
                }
                consumed += bs;
                continue;
            }

            let take = (bs - self.buf.len()).min(rest.len());
            self.buf.extend_from_slice(&rest[..take]);
            consumed += take;
        }

        // Every byte of `buf` has been accepted, so this call reports
        // success even if the eager emit fails. The full chunk then stays
        // buffered and the next `write`, `flush` or `into_inner` emits it
        // first and returns the sink error there.
        if self.buf.len() >= bs {
            if let Err(_deferred) = self.flush_buf() {
                debug_assert_eq!(self.buf.len(), bs);
            }
        }
        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_buf()?;
        self.get_mut().flush()
    }
}

impl<W: Write> Drop for BufferedWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.flush_buf();
        }
    }
}
