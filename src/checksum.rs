//! Thin wrapper around the `crc32c` crate providing the masked CRC-32C
//! checksum carried by every data chunk of a Snappy framed stream.
//!
//! The framing format never stores the raw CRC: it is rotated right by 15
//! bits and offset by a constant so that checksumming data which itself
//! contains embedded CRCs does not degenerate.

/// Constant added to the rotated CRC when masking.
pub const MASK_DELTA: u32 = 0xa282_ead8;

/// One-shot CRC-32C (Castagnoli) over `data`.
///
/// # Parity vectors
/// * `crc32c(b"")` == `0x0000_0000`
/// * `crc32c(b"123456789")` == `0xE306_9283`
#[inline]
pub fn crc32c(data: &[u8]) -> u32 {
    ::crc32c::crc32c(data)
}

/// Apply the framing-format mask to a raw CRC.
#[inline]
pub fn mask(crc: u32) -> u32 {
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Undo [`mask`].
#[inline]
pub fn unmask(masked: u32) -> u32 {
    masked.wrapping_sub(MASK_DELTA).rotate_left(15)
}

/// Masked CRC-32C of `data`, as stored in a chunk body.
#[inline]
pub fn masked_crc32c(data: &[u8]) -> u32 {
    mask(crc32c(data))
}
