//! Text-to-speech module using Amazon Polly.
//!
//! Provides script segmentation and sequential segment synthesis.

mod polly;
mod segmenter;
mod synthesizer;

pub use polly::PollyBackend;
pub use segmenter::{plan, segment_script};
pub use synthesizer::Synthesizer;
