//! Script loading.
//!
//! Reads the narration script from disk and detects whether it is SSML.

mod reader;

pub use reader::{Script, read_script};
