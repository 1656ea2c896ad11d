//! Streaming chunk reader.
//!
//! [`Reader`] pulls chunks from any `R: Read`, decodes data chunks one at a
//! time and serves the decoded bytes through [`Read`] and [`BufRead`].
//! At most one decoded chunk is held in memory.

use std::io::{self, BufRead, Read, Write};

use crate::config::{CHUNK_HEADER_SIZE, STREAM_IDENTIFIER_BODY};
use crate::frame::decompress::FrameDecoder;
use crate::frame::header::{check_stream_identifier, ChunkHeader};
use crate::frame::types::{frame_error, ChunkType, FrameError, VerifyMode};

/// Read into `buf[*filled..]` until it is full or the source reports EOF.
///
/// `filled` is advanced as bytes arrive, so progress made before an error
/// survives and a later call continues from there.
fn fill_from<R: Read>(r: &mut R, buf: &mut [u8], filled: &mut usize) -> io::Result<()> {
    while *filled < buf.len() {
        match r.read(&mut buf[*filled..]) {
            Ok(0) => break,
            Ok(n) => *filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Streaming Snappy frame decoder backed by any `R: Read`.
///
/// `read` returns `Ok(0)` only at the end of the stream (EOF on a chunk
/// boundary). A malformed chunk or a checksum mismatch is reported as an
/// `io::Error` of kind `InvalidData` wrapping a [`FrameError`]; the reader
/// then keeps returning that error.
///
/// An I/O error from the source is returned as is. Header and body bytes
/// already taken from the source are kept, so calling again after a
/// transient error (`WouldBlock`, `TimedOut`, ...) resumes mid-chunk.
pub struct Reader<R> {
    inner: R,
    decoder: FrameDecoder,
    /// Header bytes of the next chunk received so far.
    hdr: [u8; CHUNK_HEADER_SIZE],
    hdr_filled: usize,
    /// Validated header whose body is still being read or skipped.
    pending: Option<ChunkHeader>,
    /// Body of the pending chunk.
    src: Vec<u8>,
    /// Body bytes of the pending chunk received (or skipped) so far.
    body_filled: usize,
    /// Decoded bytes of the current data chunk.
    dst: Vec<u8>,
    /// Read offset within `dst`.
    pos: usize,
    seen_stream_id: bool,
    failed: Option<FrameError>,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R, verify: VerifyMode) -> Self {
        Reader {
            inner,
            decoder: FrameDecoder::new(verify),
            hdr: [0u8; CHUNK_HEADER_SIZE],
            hdr_filled: 0,
            pending: None,
            src: Vec::new(),
            body_filled: 0,
            dst: Vec::new(),
            pos: 0,
            seen_stream_id: false,
            failed: None,
        }
    }

    pub fn verify_mode(&self) -> VerifyMode {
        self.decoder.verify_mode()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Return the underlying reader. Decoded bytes not yet read are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decode the rest of the stream into `w`, one chunk at a time.
    ///
    /// Returns the number of decoded bytes written.
    pub fn copy_to<W: Write + ?Sized>(&mut self, w: &mut W) -> io::Result<u64> {
        let mut total = 0u64;
        loop {
            let chunk = self.fill_buf()?;
            if chunk.is_empty() {
                return Ok(total);
            }
            w.write_all(chunk)?;
            let n = chunk.len();
            self.consume(n);
            total += n as u64;
        }
    }

    /// Load the next data chunk into `dst`.
    ///
    /// Returns `false` at end of stream. Frame errors are remembered and
    /// replayed on every later call.
    fn next_chunk(&mut self) -> io::Result<bool> {
        if let Some(e) = &self.failed {
            return Err(e.clone().into());
        }
        let res = self.read_chunk();
        if let Err(e) = &res {
            if let Some(fe) = frame_error(e) {
                self.failed = Some(fe.clone());
            }
        }
        res
    }

    fn read_chunk(&mut self) -> io::Result<bool> {
        loop {
            let header = match self.pending {
                Some(h) => h,
                None => match self.read_header()? {
                    Some(h) => h,
                    None => return Ok(false),
                },
            };

            match header.chunk_type {
                ChunkType::StreamIdentifier => {
                    self.read_body(header.len)?;
                    self.pending = None;
                    check_stream_identifier(&self.src)?;
                    self.seen_stream_id = true;
                }
                t @ (ChunkType::Compressed | ChunkType::Uncompressed) => {
                    self.read_body(header.len)?;
                    self.pending = None;
                    self.pos = 0;
                    self.decoder.decode_chunk(t, &self.src, &mut self.dst)?;
                    return Ok(true);
                }
                ChunkType::Padding | ChunkType::ReservedSkippable(_) => {
                    self.skip_body(header.len)?;
                    self.pending = None;
                }
                ChunkType::ReservedUnskippable(b) => {
                    return Err(FrameError::UnskippableChunk { chunk_type: b }.into());
                }
            }
        }
    }

    /// Read and validate the next chunk header, making it the pending chunk.
    ///
    /// Returns `None` at a clean end of stream.
    fn read_header(&mut self) -> io::Result<Option<ChunkHeader>> {
        fill_from(&mut self.inner, &mut self.hdr, &mut self.hdr_filled)?;
        let n = self.hdr_filled;
        if n == 0 {
            return Ok(None);
        }
        if n < CHUNK_HEADER_SIZE {
            return Err(FrameError::Truncated {
                needed: CHUNK_HEADER_SIZE,
                got: n,
            }
            .into());
        }
        self.hdr_filled = 0;
        let header = ChunkHeader::parse(self.hdr);

        match header.chunk_type {
            ChunkType::StreamIdentifier => {
                if header.len != STREAM_IDENTIFIER_BODY.len() {
                    return Err(FrameError::StreamIdentifierInvalid.into());
                }
            }
            t if !self.seen_stream_id => {
                return Err(FrameError::MissingStreamIdentifier {
                    chunk_type: t.as_byte(),
                }
                .into());
            }
            t if t.is_data() => header.check_data_len()?,
            _ => {}
        }

        self.pending = Some(header);
        self.body_filled = 0;
        Ok(Some(header))
    }

    /// Read the pending chunk's body into `src`, continuing a partial read.
    fn read_body(&mut self, len: usize) -> io::Result<()> {
        self.src.resize(len, 0);
        fill_from(&mut self.inner, &mut self.src, &mut self.body_filled)?;
        if self.body_filled < len {
            return Err(FrameError::Truncated {
                needed: len,
                got: self.body_filled,
            }
            .into());
        }
        Ok(())
    }

    /// Discard the pending chunk's body, continuing a partial skip.
    fn skip_body(&mut self, len: usize) -> io::Result<()> {
        let mut scratch = [0u8; 4096];
        while self.body_filled < len {
            let want = (len - self.body_filled).min(scratch.len());
            match self.inner.read(&mut scratch[..want]) {
                Ok(0) => {
                    return Err(FrameError::Truncated {
                        needed: len,
                        got: self.body_filled,
                    }
                    .into())
                }
                Ok(n) => self.body_filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for Reader<R> {
    /// Fill `buf` from the current decoded chunk, decoding the next chunk
    /// first when the current one is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let avail = self.fill_buf()?;
        let n = avail.len().min(buf.len());
        buf[..n].copy_from_slice(&avail[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for Reader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        // Data chunks may decode to zero bytes; keep going until one doesn't.
        while self.pos >= self.dst.len() {
            if !self.next_chunk()? {
                return Ok(&[]);
            }
        }
        Ok(&self.dst[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.dst.len());
    }
}
