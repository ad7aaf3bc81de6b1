//! Polly Narrator - turn a narration script into a single MP3 file.
//!
//! The script (plain text or SSML with optional `[SECTION: ...]` markers) is
//! split into requests that fit Amazon Polly's character limit, each request
//! is synthesized in order, and the MP3 fragments are joined into one file.

mod audio;
mod config;
mod error;
mod script;
mod tts;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use audio::{concatenate, write_audio};
use config::AppConfig;
use error::NarrateError;
use script::read_script;
use tts::{PollyBackend, Synthesizer};

/// Run the pipeline: read, split, synthesize, concatenate, write.
async fn run(config: &AppConfig) -> Result<()> {
    info!("1. Reading script from {}...", config.script.display());
    let script = read_script(&config.script)?;
    info!("   ✓ Script loaded from {} ({} characters)", script.path.display(), script.char_count());

    let is_ssml = script.is_ssml();
    info!("   ✓ SSML detected: {}", is_ssml);

    info!("2. Splitting script for Polly...");
    let segments = tts::segment_script(&script, config.max_chars);
    info!("   ✓ Split into {} segment(s)", segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let chars = segment.chars().count();
        if chars > config.max_chars {
            warn!("⚠️  Segment {} has {} characters, over the {} limit", i + 1, chars, config.max_chars);
        }
    }

    if config.dry_run {
        let json = serde_json::to_string_pretty(&tts::plan(&segments)).context("Failed to serialize segment plan")?;
        println!("{}", json);
        return Ok(());
    }

    config.check_voice_engines();

    info!("3. Connecting to Amazon Polly...");
    let backend = PollyBackend::connect(config).await?;
    info!("   ✓ Connected to Amazon Polly");

    info!("4. Synthesizing speech...");
    let synthesizer = Synthesizer::new(backend, config);
    let chunks = synthesizer.synthesize_all(&segments, is_ssml).await?;

    info!("5. Concatenating audio segments...");
    let audio = concatenate(&chunks);
    info!("   ✓ Combined audio ({} bytes)", audio.len());

    info!("6. Saving to {}...", config.output.display());
    write_audio(&config.output, &audio)?;
    info!("   ✓ Audio saved successfully");

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🎙️  Polly Narrator v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        std::process::exit(1);
    }

    config.log_config();

    if let Err(e) = run(&config).await {
        error!("❌ {:#}", e);
        if let Some(hints) = e.downcast_ref::<NarrateError>().map(NarrateError::hints)
            && !hints.is_empty()
        {
            error!("Please ensure:");
            for hint in hints {
                error!("  • {}", hint);
            }
        }
        std::process::exit(1);
    }

    info!("✅ Narration complete: {}", config.output.display());
    Ok(())
}
