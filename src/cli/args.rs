//! Command-line argument parsing for the `snappystream` binary.
//!
//! [`Args`] is the raw clap surface; [`Args::resolve`] turns it into a
//! [`Job`] with the source, destination and [`Prefs`] filled in.

use anyhow::{anyhow, bail};
use clap::{ArgAction, Parser};

use crate::config::{KB, MAX_BLOCK_SIZE};
use crate::frame::types::VerifyMode;
use crate::io::{default_output_name, Prefs, STDIN_MARK, STDOUT_MARK};

/// Default display level before `-q` / `-v` adjustments.
const DEFAULT_DISPLAY_LEVEL: u32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "snappystream",
    version,
    about = "Compress or decompress the Snappy framing format (.sz)"
)]
pub struct Args {
    /// Decompress INPUT instead of compressing it.
    #[arg(short = 'd', long)]
    pub decompress: bool,

    /// Write to standard output.
    #[arg(short = 'c', long = "stdout")]
    pub to_stdout: bool,

    /// Overwrite an existing OUTPUT.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// More output; repeatable.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less output; repeatable.
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Store zero instead of a checksum in every chunk.
    #[arg(long)]
    pub no_checksum: bool,

    /// Do not verify chunk checksums while decompressing.
    #[arg(long)]
    pub no_verify: bool,

    /// Uncompressed bytes per chunk (e.g. 4096, 16K); at most 64K.
    #[arg(short = 'B', long, default_value = "64K", value_parser = parse_block_size)]
    pub block_size: usize,

    /// Input file; `-` or omitted reads standard input.
    pub input: Option<String>,

    /// Output file; derived from INPUT when omitted.
    pub output: Option<String>,
}

/// Operation selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    Compress,
    Decompress,
}

/// Fully resolved work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub op_mode: OpMode,
    pub input: String,
    pub output: String,
    pub prefs: Prefs,
    pub display_level: u32,
}

/// Parse a block size with an optional `K` suffix.
pub fn parse_block_size(s: &str) -> Result<usize, String> {
    let (digits, mult) = match s.strip_suffix(|c: char| c == 'K' || c == 'k') {
        Some(d) => (d, KB),
        None => (s, 1),
    };
    let n: usize = digits
        .parse()
        .map_err(|_| format!("invalid block size: {s}"))?;
    let size = n
        .checked_mul(mult)
        .ok_or_else(|| format!("invalid block size: {s}"))?;
    if size == 0 || size > MAX_BLOCK_SIZE {
        return Err(format!("block size must be between 1 and {MAX_BLOCK_SIZE}"));
    }
    Ok(size)
}

impl Args {
    pub fn resolve(&self) -> anyhow::Result<Job> {
        let op_mode = if self.decompress {
            OpMode::Decompress
        } else {
            OpMode::Compress
        };

        let input = match self.input.as_deref() {
            None | Some("-") => STDIN_MARK.to_string(),
            Some(p) => p.to_string(),
        };

        let output = if self.to_stdout {
            if self.output.is_some() {
                bail!("bad usage: --stdout conflicts with an explicit OUTPUT");
            }
            STDOUT_MARK.to_string()
        } else {
            match self.output.as_deref() {
                Some("-") => STDOUT_MARK.to_string(),
                Some(p) => p.to_string(),
                None => default_output_name(&input, op_mode == OpMode::Decompress).ok_or_else(
                    || anyhow!("cannot determine an output name for {input} (unknown suffix)"),
                )?,
            }
        };

        if input != STDIN_MARK && input == output {
            bail!("input and output are the same file: {input}");
        }

        let prefs = Prefs {
            block_size: self.block_size,
            checksum: !self.no_checksum,
            verify: VerifyMode::from(!self.no_verify),
            overwrite: self.force,
        };

        let display_level = (DEFAULT_DISPLAY_LEVEL + u32::from(self.verbose))
            .saturating_sub(u32::from(self.quiet));

        Ok(Job {
            op_mode,
            input,
            output,
            prefs,
            display_level,
        })
    }
}
