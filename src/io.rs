//! File-level compression and decompression.
//!
//! Entry points used by the `snappystream` binary:
//!
//! - [`compress_filename`]: frame a file (or stdin) into a `.sz` stream.
//! - [`decompress_filename`]: decode a `.sz` stream back to raw bytes.
//!
//! Both accept the [`STDIN_MARK`] / [`STDOUT_MARK`] sentinels in place of
//! paths and return [`Stats`] describing the bytes moved. Nothing here
//! prints; reporting is left to the caller.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::config::{DEFAULT_BLOCK_SIZE, IO_BUFFER_SIZE, SZ_EXTENSION};
use crate::frame::types::{VerifyMode, WriterOptions};
use crate::stream::{BufferedWriter, Reader};

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "stdin";

/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "stdout";

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Options for the file-level operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefs {
    /// Uncompressed bytes per chunk when compressing.
    pub block_size: usize,
    /// Write real checksums when compressing.
    pub checksum: bool,
    /// Checksum policy when decompressing.
    pub verify: VerifyMode,
    /// Replace an existing destination file.
    pub overwrite: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            block_size: DEFAULT_BLOCK_SIZE,
            checksum: true,
            verify: VerifyMode::VerifyChecksum,
            overwrite: false,
        }
    }
}

impl Prefs {
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions::default()
            .block_size(self.block_size)
            .checksum(self.checksum)
    }
}

/// Byte counts for one completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl Stats {
    /// Output size as a percentage of input size (0 for empty input).
    pub fn ratio_percent(&self) -> f64 {
        if self.bytes_in == 0 {
            0.0
        } else {
            self.bytes_out as f64 * 100.0 / self.bytes_in as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Byte counting
// ---------------------------------------------------------------------------

/// Pass-through wrapper that counts the bytes moved through it.
struct Counted<T> {
    inner: T,
    count: u64,
}

impl<T> Counted<T> {
    fn new(inner: T) -> Self {
        Counted { inner, count: 0 }
    }
}

impl<T: Read> Read for Counted<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

impl<T: Write> Write for Counted<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Source / destination
// ---------------------------------------------------------------------------

/// Open `path` for reading; [`STDIN_MARK`] and `-` mean standard input.
pub fn open_src(path: &str) -> io::Result<Box<dyn Read>> {
    if path == STDIN_MARK || path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    if Path::new(path).is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} is a directory"),
        ));
    }
    Ok(Box::new(BufReader::with_capacity(IO_BUFFER_SIZE, File::open(path)?)))
}

/// Open `path` for writing; [`STDOUT_MARK`] and `-` mean standard output.
///
/// An existing file is refused unless `overwrite` is set.
pub fn open_dst(path: &str, overwrite: bool) -> io::Result<Box<dyn Write>> {
    if path == STDOUT_MARK || path == "-" {
        return Ok(Box::new(io::stdout().lock()));
    }
    let mut opts = OpenOptions::new();
    opts.write(true);
    if overwrite {
        opts.create(true).truncate(true);
    } else {
        opts.create_new(true);
    }
    let file = opts.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            io::Error::new(e.kind(), format!("{path} already exists"))
        } else {
            e
        }
    })?;
    Ok(Box::new(BufWriter::with_capacity(IO_BUFFER_SIZE, file)))
}

/// Derive the default destination name for `input`.
///
/// Compression appends `.sz`; decompression strips it and returns `None`
/// when the input does not carry the extension.
pub fn default_output_name(input: &str, decompress: bool) -> Option<String> {
    if input == STDIN_MARK || input == "-" {
        return Some(STDOUT_MARK.to_string());
    }
    if decompress {
        input
            .strip_suffix(SZ_EXTENSION)
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
    } else {
        Some(format!("{input}{SZ_EXTENSION}"))
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Frame everything read from `src` into `dst`.
pub fn compress_stream_to<R: Read, W: Write>(src: &mut R, dst: W, prefs: &Prefs) -> io::Result<Stats> {
    let mut counted = Counted::new(dst);
    let bytes_in = {
        let mut w = BufferedWriter::with_options(&mut counted, prefs.writer_options());
        let n = io::copy(src, &mut w)?;
        w.into_inner()?.flush()?;
        n
    };
    Ok(Stats {
        bytes_in,
        bytes_out: counted.count,
    })
}

/// Decode a framed stream read from `src` into `dst`.
pub fn decompress_stream_to<R: Read, W: Write>(src: R, mut dst: W, prefs: &Prefs) -> io::Result<Stats> {
    let mut r = Reader::new(Counted::new(src), prefs.verify);
    let bytes_out = r.copy_to(&mut dst)?;
    dst.flush()?;
    Ok(Stats {
        bytes_in: r.get_ref().count,
        bytes_out,
    })
}

/// Compress the file at `src` into `dst`.
pub fn compress_filename(src: &str, dst: &str, prefs: &Prefs) -> io::Result<Stats> {
    let mut input = open_src(src)?;
    let output = open_dst(dst, prefs.overwrite)?;
    compress_stream_to(&mut input, output, prefs)
}

/// Decompress the file at `src` into `dst`.
pub fn decompress_filename(src: &str, dst: &str, prefs: &Prefs) -> io::Result<Stats> {
    let input = open_src(src)?;
    let output = open_dst(dst, prefs.overwrite)?;
    decompress_stream_to(input, output, prefs)
}
