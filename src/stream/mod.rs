//! `std::io` adapters over the Snappy framing format.
//!
//! | Type               | Role |
//! |--------------------|------|
//! | [`Writer`]         | Frames every `write` call immediately. |
//! | [`BufferedWriter`] | Accumulates full chunks before framing them. |
//! | [`Reader`]         | Decodes chunks on demand, optionally verifying checksums. |

pub mod reader;
pub mod writer;

pub use reader::Reader;
pub use writer::{BufferedWriter, Writer};
