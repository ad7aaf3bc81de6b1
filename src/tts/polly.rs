//! Amazon Polly backend built on the AWS SDK.
//!
//! Credentials come from the default AWS chain (environment, shared config
//! files, SSO, instance profile). Region and profile may be overridden from
//! the command line.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_polly::Client;
use aws_sdk_polly::error::{DisplayErrorContext, SdkError};
use aws_sdk_polly::operation::synthesize_speech::SynthesizeSpeechError;
use aws_sdk_polly::types::{Engine as PollyEngine, LanguageCode, OutputFormat, TextType as PollyTextType, VoiceId};
use tracing::{debug, info, warn};

use super::synthesizer::{BackendError, SpeechBackend, SynthesisRequest, TextType};
use crate::config::AppConfig;
use crate::error::NarrateError;

/// Amazon Polly `SynthesizeSpeech` client.
pub struct PollyBackend {
    client: Client,
}

impl PollyBackend {
    /// Build the SDK client and check that Polly answers.
    ///
    /// # Errors
    /// `ConnectionFailure` if no region is configured or the service cannot be reached.
    pub async fn connect(config: &AppConfig) -> Result<Self, NarrateError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(ref region) = config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(ref profile) = config.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let Some(region) = sdk_config.region() else {
            return Err(NarrateError::ConnectionFailure("no AWS region configured".into()));
        };
        info!("Using AWS region {}", region);

        let backend = Self { client: Client::new(&sdk_config) };
        backend.probe(&config.voice, &config.language).await?;
        Ok(backend)
    }

    /// List voices for the language to confirm connectivity and the voice id.
    ///
    /// Only transport and credential problems are fatal. A service-side
    /// rejection (for example a policy without `polly:DescribeVoices`) is
    /// logged and synthesis is attempted anyway.
    async fn probe(&self, voice: &str, language: &str) -> Result<(), NarrateError> {
        let result = self.client.describe_voices().language_code(LanguageCode::from(language)).send().await;

        let output = match result {
            Ok(output) => output,
            Err(SdkError::ServiceError(e)) => {
                warn!("Could not list Polly voices: {}", DisplayErrorContext(e.err()));
                return Ok(());
            }
            Err(e) => return Err(NarrateError::ConnectionFailure(DisplayErrorContext(&e).to_string())),
        };

        let known = output.voices().iter().find(|v| v.id().is_some_and(|id| id.as_str() == voice));
        match known {
            Some(v) => {
                let engines: Vec<&str> = v.supported_engines().iter().map(|e| e.as_str()).collect();
                debug!("Voice {} supports engines: {}", voice, engines.join(", "));
            }
            None => warn!("Voice '{}' was not listed by Polly for {}", voice, language),
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechBackend for PollyBackend {
    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> Result<Vec<u8>, BackendError> {
        debug!(engine = %request.engine, voice = request.voice, chars = request.text.chars().count(), "Calling SynthesizeSpeech");

        let text_type = match request.text_type {
            TextType::Text => PollyTextType::Text,
            TextType::Ssml => PollyTextType::Ssml,
        };

        let output = self
            .client
            .synthesize_speech()
            .engine(PollyEngine::from(request.engine.as_str()))
            .language_code(LanguageCode::from(request.language))
            .output_format(OutputFormat::Mp3)
            .text(request.text)
            .text_type(text_type)
            .voice_id(VoiceId::from(request.voice))
            .send()
            .await
            .map_err(classify)?;

        let audio = output.audio_stream.collect().await.map_err(|e| BackendError::Failed(format!("Failed to read audio stream: {}", e)))?;

        Ok(audio.into_bytes().to_vec())
    }
}

/// Sort an SDK error into the categories the retry policy acts on.
fn classify<R: std::fmt::Debug>(err: SdkError<SynthesizeSpeechError, R>) -> BackendError {
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => BackendError::Unreachable(message),
        SdkError::ServiceError(e) => {
            if matches!(e.err(), SynthesizeSpeechError::EngineNotSupportedException(_)) || is_unsupported_message(&message) {
                BackendError::Unsupported(message)
            } else {
                BackendError::Failed(message)
            }
        }
        _ => BackendError::Failed(message),
    }
}

/// Polly reports engine/markup mismatches with these phrases, often as a
/// plain validation or invalid-SSML error.
fn is_unsupported_message(message: &str) -> bool {
    message.contains("Unsupported") || message.contains("does not support") || message.contains("Neural")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_messages() {
        assert!(is_unsupported_message("InvalidSsmlException: Unsupported Neural feature"));
        assert!(is_unsupported_message("ValidationException: This voice does not support the selected engine: neural"));
        assert!(!is_unsupported_message("ThrottlingException: Rate exceeded"));
        assert!(!is_unsupported_message("TextLengthExceededException: Maximum text length has been exceeded"));
    }
}
