#![no_main]
use std::io::{Read, Write};

use libfuzzer_sys::fuzz_target;
use snappystream::{BufferedWriter, Reader, VerifyMode, WriterOptions};

fuzz_target!(|data: &[u8]| {
    // First byte picks the chunk size so short inputs still span several chunks.
    let (block_size, payload) = match data.split_first() {
        Some((&b, rest)) => (usize::from(b) * 257 + 1, rest),
        None => return,
    };

    let mut w = BufferedWriter::with_options(Vec::new(), WriterOptions::default().block_size(block_size));
    // Uneven writes exercise the buffering path.
    for piece in payload.chunks(block_size / 3 + 1) {
        w.write_all(piece).unwrap();
    }
    let framed = w.into_inner().unwrap();

    let mut recovered = Vec::new();
    Reader::new(&framed[..], VerifyMode::VerifyChecksum)
        .read_to_end(&mut recovered)
        .unwrap_or_else(|e| {
            panic!(
                "stream round-trip: decoding self-encoded data failed \
                 (input {} bytes, framed {} bytes): {e}",
                payload.len(),
                framed.len()
            )
        });

    assert_eq!(
        recovered, payload,
        "stream round-trip mismatch: {} bytes in, {} bytes back",
        payload.len(),
        recovered.len()
    );
});
