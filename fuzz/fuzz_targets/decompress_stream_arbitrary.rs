#![no_main]
use std::io::Read;

use libfuzzer_sys::fuzz_target;
use snappystream::{decompress_stream, Reader, VerifyMode};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes: errors are expected, panics are not.
    let one_shot = decompress_stream(data, VerifyMode::VerifyChecksum);

    // The streaming reader must agree with the one-shot decoder.
    let mut streamed = Vec::new();
    let res = Reader::new(data, VerifyMode::VerifyChecksum).read_to_end(&mut streamed);
    match (one_shot, res) {
        (Ok(v), Ok(_)) => assert_eq!(v, streamed),
        (Err(_), Err(_)) => {}
        (a, b) => panic!("decoders disagree: one-shot {:?}, streaming {:?}", a.map(|v| v.len()), b),
    }
});
