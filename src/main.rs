//! Binary entry point for the `snappystream` command-line tool.
//!
//! 1. [`Args`] is parsed by clap and resolved into a [`Job`].
//! 2. The display level is applied.
//! 3. [`run`] dispatches to the file-level compress / decompress operation
//!    and reports the result on stderr.

use anyhow::Context;
use clap::Parser;

use snappystream::cli::args::{Args, Job, OpMode};
use snappystream::cli::constants::{set_display_level, PROGRAM_NAME};
use snappystream::io::{compress_filename, decompress_filename, STDOUT_MARK};
use snappystream::{display, displaylevel};

/// Execute one resolved job.
fn run(job: &Job) -> anyhow::Result<()> {
    displaylevel!(4, "*** {} v{} ***\n", PROGRAM_NAME, snappystream::version_string());
    displaylevel!(4, "Blocks size : {} KB\n", job.prefs.block_size >> 10);

    let stats = match job.op_mode {
        OpMode::Compress => compress_filename(&job.input, &job.output, &job.prefs)
            .with_context(|| format!("{}: compression failed", job.input))?,
        OpMode::Decompress => decompress_filename(&job.input, &job.output, &job.prefs)
            .with_context(|| format!("{}: decompression failed", job.input))?,
    };

    // Results share stderr with piped output only at higher verbosity.
    let level = if job.output == STDOUT_MARK { 3 } else { 2 };
    match job.op_mode {
        OpMode::Compress => displaylevel!(
            level,
            "{:<20} : {} -> {} bytes, {:.2}% => {}\n",
            job.input,
            stats.bytes_in,
            stats.bytes_out,
            stats.ratio_percent(),
            job.output
        ),
        OpMode::Decompress => displaylevel!(
            level,
            "{:<20} : decoded {} bytes => {}\n",
            job.input,
            stats.bytes_out,
            job.output
        ),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    let result = args.resolve().and_then(|job| {
        set_display_level(job.display_level);
        run(&job)
    });
    if let Err(e) = result {
        displaylevel!(1, "{}: {:#}\n", PROGRAM_NAME, e);
        std::process::exit(1);
    }
    if snappystream::cli::constants::display_level() >= 4 {
        display!("{}: done\n", PROGRAM_NAME);
    }
}
