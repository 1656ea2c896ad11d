// e2e/file_api.rs: file-level API and CLI integration tests (Suite 03)
//
// Exercises `compress_filename` / `decompress_filename` against real files in
// a temp directory, then drives the `snappystream` binary as a black box with
// std::process::Command: round trips, stdout mode, overwrite protection and
// exit codes on corrupt input.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use snappystream::io::{compress_filename, decompress_filename, Prefs};
use snappystream::{decompress_stream, VerifyMode};
use tempfile::TempDir;

/// Locate the `snappystream` binary produced by Cargo.
fn bin() -> PathBuf {
    if let Some(p) = option_env!("CARGO_BIN_EXE_snappystream") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("snappystream");
    p
}

/// Create a TempDir containing a ~200 KB text file.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    let content = "Snappy framing format, one chunk at a time.\n".repeat(4600);
    fs::write(&input, content).unwrap();
    (dir, input)
}

fn path_str(p: &std::path::Path) -> &str {
    p.to_str().unwrap()
}

// ── 1. Library round trip through files ──────────────────────────────────────

#[test]
fn test_filename_roundtrip() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("input.txt.sz");
    let unpacked = dir.path().join("output.txt");
    let prefs = Prefs::default();

    let c = compress_filename(path_str(&input), path_str(&packed), &prefs).unwrap();
    let original = fs::read(&input).unwrap();
    assert_eq!(c.bytes_in, original.len() as u64);
    assert_eq!(c.bytes_out, fs::metadata(&packed).unwrap().len());

    let d = decompress_filename(path_str(&packed), path_str(&unpacked), &prefs).unwrap();
    assert_eq!(d.bytes_out, original.len() as u64);
    assert_eq!(fs::read(&unpacked).unwrap(), original);
}

#[test]
fn test_filename_respects_block_size() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("small-blocks.sz");
    let prefs = Prefs {
        block_size: 4096,
        ..Prefs::default()
    };
    compress_filename(path_str(&input), path_str(&packed), &prefs).unwrap();

    let framed = fs::read(&packed).unwrap();
    // Walk the chunks after the identifier; none may hold more than 4 KiB.
    let mut rest = &framed[10..];
    let mut chunks = 0;
    while !rest.is_empty() {
        let len = u32::from_le_bytes([rest[1], rest[2], rest[3], 0]) as usize;
        chunks += 1;
        rest = &rest[4 + len..];
    }
    let original_len = fs::metadata(&input).unwrap().len() as usize;
    assert_eq!(chunks, original_len.div_ceil(4096));
    assert_eq!(
        decompress_stream(&framed, VerifyMode::VerifyChecksum).unwrap().len(),
        original_len
    );
}

#[test]
fn test_existing_destination_refused() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("taken.sz");
    fs::write(&packed, b"keep me").unwrap();

    let err = compress_filename(path_str(&input), path_str(&packed), &Prefs::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(fs::read(&packed).unwrap(), b"keep me");

    let prefs = Prefs {
        overwrite: true,
        ..Prefs::default()
    };
    compress_filename(path_str(&input), path_str(&packed), &prefs).unwrap();
    assert_ne!(fs::read(&packed).unwrap(), b"keep me");
}

#[test]
fn test_missing_source() {
    let dir = TempDir::new().unwrap();
    let err = compress_filename(
        path_str(&dir.path().join("absent")),
        path_str(&dir.path().join("absent.sz")),
        &Prefs::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_directory_source_rejected() {
    let dir = TempDir::new().unwrap();
    let err = compress_filename(
        path_str(dir.path()),
        path_str(&dir.path().join("dir.sz")),
        &Prefs::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_decompress_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.sz");
    fs::write(&bogus, b"definitely not snappy").unwrap();
    let err = decompress_filename(
        path_str(&bogus),
        path_str(&dir.path().join("bogus")),
        &Prefs::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

// ── 2. CLI round trip with derived names ─────────────────────────────────────

#[test]
fn test_cli_compress_decompress_roundtrip() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let status = Command::new(bin())
        .args(["-q", "input.txt"])
        .current_dir(dir.path())
        .status()
        .expect("failed to run snappystream");
    assert!(status.success());
    let packed = dir.path().join("input.txt.sz");
    assert!(packed.exists());

    fs::remove_file(&input).unwrap();
    let status = Command::new(bin())
        .args(["-q", "-d", "input.txt.sz"])
        .current_dir(dir.path())
        .status()
        .expect("failed to run snappystream -d");
    assert!(status.success());
    assert_eq!(fs::read(&input).unwrap(), original);
}

// ── 3. stdin / stdout ────────────────────────────────────────────────────────

#[test]
fn test_cli_stdin_to_stdout() {
    let data = b"piped through standard streams\n".repeat(1000);

    let mut child = Command::new(bin())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn snappystream");
    child.stdin.take().unwrap().write_all(&data).unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert_eq!(
        decompress_stream(&out.stdout, VerifyMode::VerifyChecksum).unwrap(),
        data
    );
}

#[test]
fn test_cli_decompress_to_stdout() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();
    let packed = dir.path().join("input.txt.sz");
    compress_filename(path_str(&input), path_str(&packed), &Prefs::default()).unwrap();

    let out = Command::new(bin())
        .args(["-d", "-c", path_str(&packed)])
        .output()
        .expect("failed to run snappystream -dc");
    assert!(out.status.success());
    assert_eq!(out.stdout, original);
}

// ── 4. Overwrite protection and failures ─────────────────────────────────────

#[test]
fn test_cli_refuses_overwrite_without_force() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("input.txt.sz");
    fs::write(&packed, b"existing").unwrap();

    let status = Command::new(bin())
        .args(["-q", path_str(&input)])
        .status()
        .unwrap();
    assert!(!status.success());
    assert_eq!(fs::read(&packed).unwrap(), b"existing");

    let status = Command::new(bin())
        .args(["-q", "-f", path_str(&input)])
        .status()
        .unwrap();
    assert!(status.success());
    assert_ne!(fs::read(&packed).unwrap(), b"existing");
}

#[test]
fn test_cli_corrupt_input_exit_code() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.sz");
    fs::write(&bogus, [0x00, 0x05, 0x00, 0x00, 1, 2, 3, 4, 5]).unwrap();

    let out = Command::new(bin())
        .args(["-d", "-c", path_str(&bogus)])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("decompression failed"), "stderr: {stderr}");
}

#[test]
fn test_cli_bad_block_size() {
    let out = Command::new(bin()).args(["-B", "128K", "x"]).output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_cli_version() {
    let out = Command::new(bin()).arg("--version").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
