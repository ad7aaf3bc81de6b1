//! Application configuration and CLI argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::voices;

/// Largest request Polly accepts, in billed characters.
pub const POLLY_MAX_CHARS: usize = 6000;

/// Amazon Polly synthesis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    /// Concatenative engine, full SSML support
    Standard,
    /// Neural engine (higher quality, partial SSML support)
    #[default]
    Neural,
    /// Long-form engine for articles and narration
    LongForm,
    /// Generative engine
    Generative,
}

impl Engine {
    /// Polly API name of the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Standard => "standard",
            Engine::Neural => "neural",
            Engine::LongForm => "long-form",
            Engine::Generative => "generative",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrator application configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "polly-narrator")]
#[command(author, version, about = "Narrate a text/SSML script to MP3 with Amazon Polly", long_about = None)]
pub struct AppConfig {
    /// List all catalogued Polly voices and exit
    #[arg(long)]
    pub list_voices: bool,

    /// Show detailed information about a specific voice and exit
    #[arg(long)]
    pub voice_info: Option<String>,

    /// Script to narrate (plain text or SSML, may contain [SECTION: ...] markers)
    #[arg(long, short = 's', env = "NARRATOR_SCRIPT", default_value = "demo_script.txt")]
    pub script: PathBuf,

    /// Output MP3 file (overwritten if it exists)
    #[arg(long, short = 'o', env = "NARRATOR_OUTPUT", default_value = "demo_audio.mp3")]
    pub output: PathBuf,

    /// Polly voice identifier (e.g., Kendra, Joanna, Matthew)
    #[arg(long, env = "POLLY_VOICE", default_value = "Kendra")]
    pub voice: String,

    /// Language code sent with every request
    #[arg(long, default_value = "en-US")]
    pub language: String,

    /// Preferred synthesis engine
    #[arg(long, value_enum, default_value = "neural")]
    pub engine: Engine,

    /// Engine used once when the preferred engine rejects the input as unsupported
    #[arg(long, value_enum, default_value = "standard")]
    pub fallback_engine: Engine,

    /// Maximum characters per request, including the <speak> wrapper
    #[arg(long, default_value = "3000")]
    pub max_chars: usize,

    /// AWS region (falls back to the default AWS configuration chain)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS shared config profile
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Print the segment plan as JSON and exit without calling Polly
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        let config = Self::parse();

        // Handle voice listing commands
        if config.list_voices {
            voices::print_voices();
            std::process::exit(0);
        }

        if let Some(ref voice_name) = config.voice_info {
            match voices::print_voice_info(voice_name) {
                Ok(_) => std::process::exit(0),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 || self.max_chars > POLLY_MAX_CHARS {
            anyhow::bail!("--max-chars must be between 1 and {}, got {}", POLLY_MAX_CHARS, self.max_chars);
        }

        if self.engine == self.fallback_engine {
            anyhow::bail!("Fallback engine must differ from the preferred engine ({})", self.engine);
        }

        if self.voice.trim().is_empty() {
            anyhow::bail!("Voice identifier must not be empty");
        }

        Ok(())
    }

    /// Warn when the catalogue knows the voice cannot use either configured engine.
    pub fn check_voice_engines(&self) {
        let Some(voice) = voices::get_voice(&self.voice) else {
            info!("Voice '{}' is not in the built-in catalog, using it as-is", self.voice);
            return;
        };

        if !voice.supports(self.engine) && !voice.supports(self.fallback_engine) {
            warn!(
                "Voice '{}' supports neither {} nor {} (supported: {})",
                self.voice,
                self.engine,
                self.fallback_engine,
                voice.engine_list()
            );
        } else if !voice.supports(self.engine) {
            info!("Voice '{}' has no {} engine, expect fallback to {}", self.voice, self.engine, self.fallback_engine);
        }
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  Script: {}", self.script.display());
        info!("  Output: {}", self.output.display());
        info!("  Voice: {} ({})", self.voice, self.language);
        info!("  Engine: {} (fallback: {})", self.engine, self.fallback_engine);
        info!("  Max characters per request: {}", self.max_chars);
        if let Some(ref region) = self.region {
            info!("  Region: {}", region);
        }
        if let Some(ref profile) = self.profile {
            info!("  Profile: {}", profile);
        }
    }
}
