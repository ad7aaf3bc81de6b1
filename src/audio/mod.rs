//! Audio output module.
//!
//! Joins synthesized MP3 fragments and writes the narration to disk.

pub mod util;

pub use util::{concatenate, write_audio};
