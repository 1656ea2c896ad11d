//! Command-line interface for the `snappystream` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program name and the shared `DISPLAY_LEVEL` atomic with its print macros. |
//! | [`args`]      | clap argument surface and its resolution into a [`args::Job`]. |

pub mod constants;
pub mod args;
