//! Segment synthesizer with a single engine fallback.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, Engine};
use crate::error::NarrateError;

/// Payload type of a synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextType {
    Text,
    Ssml,
}

/// One synthesis request. Output is always MP3.
#[derive(Debug, Clone)]
pub struct SynthesisRequest<'a> {
    pub text: &'a str,
    pub text_type: TextType,
    pub engine: Engine,
    pub voice: &'a str,
    pub language: &'a str,
}

/// How a backend call failed, as far as the retry policy cares.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The engine cannot handle this voice or markup.
    #[error("{0}")]
    Unsupported(String),
    /// The service could not be reached.
    #[error("{0}")]
    Unreachable(String),
    #[error("{0}")]
    Failed(String),
}

/// A speech API that turns one request into MP3 bytes.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> Result<Vec<u8>, BackendError>;
}

/// Sequential synthesizer over a [`SpeechBackend`].
pub struct Synthesizer<B> {
    backend: B,
    voice: String,
    language: String,
    engine: Engine,
    fallback_engine: Engine,
}

impl<B: SpeechBackend> Synthesizer<B> {
    pub fn new(backend: B, config: &AppConfig) -> Self {
        Self {
            backend,
            voice: config.voice.clone(),
            language: config.language.clone(),
            engine: config.engine,
            fallback_engine: config.fallback_engine,
        }
    }

    /// Synthesize one segment.
    ///
    /// Tries the preferred engine first and retries exactly once with the
    /// fallback engine if the preferred one reports the input as unsupported.
    ///
    /// # Errors
    /// Any backend failure other than the first `Unsupported`, or an empty audio stream.
    pub async fn synthesize_segment(&self, text: &str, is_ssml: bool) -> Result<Vec<u8>, BackendError> {
        let text_type = if is_ssml { TextType::Ssml } else { TextType::Text };

        let audio = match self.request(text, text_type, self.engine).await {
            Err(BackendError::Unsupported(reason)) => {
                warn!("⚠️  {} engine rejected segment ({}), retrying with {}", self.engine, reason, self.fallback_engine);
                self.request(text, text_type, self.fallback_engine).await?
            }
            other => other?,
        };

        if audio.is_empty() {
            return Err(BackendError::Failed("No audio stream in Polly response".into()));
        }
        Ok(audio)
    }

    /// Synthesize all segments in order, stopping at the first failure.
    ///
    /// The returned chunks are in the same order as `segments`.
    pub async fn synthesize_all(&self, segments: &[String], is_ssml: bool) -> Result<Vec<Vec<u8>>, NarrateError> {
        let total = segments.len();
        let mut chunks = Vec::with_capacity(total);

        for (i, segment) in segments.iter().enumerate() {
            let index = i + 1;
            debug!("Segment {}/{}: {} characters", index, total, segment.chars().count());

            let audio = self.synthesize_segment(segment, is_ssml).await.map_err(|e| match e {
                BackendError::Unreachable(reason) => NarrateError::ConnectionFailure(format!("segment {}/{}: {}", index, total, reason)),
                other => NarrateError::SynthesisFailure { index, total, reason: other.to_string() },
            })?;

            info!("   Segment {}/{} ✓ ({} bytes)", index, total, audio.len());
            chunks.push(audio);
        }

        Ok(chunks)
    }

    async fn request(&self, text: &str, text_type: TextType, engine: Engine) -> Result<Vec<u8>, BackendError> {
        let request = SynthesisRequest { text, text_type, engine, voice: &self.voice, language: &self.language };
        self.backend.synthesize(&request).await
    }
}
