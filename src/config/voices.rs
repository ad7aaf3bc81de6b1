//! Built-in catalog of Amazon Polly US English voices.
//!
//! Only what the narrator needs at runtime: language and the engines each voice
//! can be synthesized with. Voices outside this table are still accepted and
//! passed to Polly untouched.

use super::config::Engine;

/// Essential metadata for a Polly voice.
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    pub language_code: &'static str,
    pub engines: &'static [Engine],
}

impl Voice {
    pub fn supports(&self, engine: Engine) -> bool {
        self.engines.contains(&engine)
    }

    /// Comma separated engine names.
    pub fn engine_list(&self) -> String {
        self.engines.iter().map(Engine::as_str).collect::<Vec<_>>().join(", ")
    }
}

use Engine::{Generative as G, LongForm as L, Neural as N, Standard as S};

/// All voices, sorted by name for binary search.
const VOICES: &[(&str, Voice)] = &[
    ("Danielle", Voice { language_code: "en-US", engines: &[N, L, G] }),
    ("Gregory", Voice { language_code: "en-US", engines: &[N, L] }),
    ("Ivy", Voice { language_code: "en-US", engines: &[S, N] }),
    ("Joanna", Voice { language_code: "en-US", engines: &[S, N, G] }),
    ("Joey", Voice { language_code: "en-US", engines: &[S, N] }),
    ("Justin", Voice { language_code: "en-US", engines: &[S, N] }),
    ("Kendra", Voice { language_code: "en-US", engines: &[S, N] }),
    ("Kevin", Voice { language_code: "en-US", engines: &[N] }),
    ("Kimberly", Voice { language_code: "en-US", engines: &[S, N] }),
    ("Matthew", Voice { language_code: "en-US", engines: &[S, N, G] }),
    ("Patrick", Voice { language_code: "en-US", engines: &[L] }),
    ("Ruth", Voice { language_code: "en-US", engines: &[N, L, G] }),
    ("Salli", Voice { language_code: "en-US", engines: &[S, N] }),
    ("Stephen", Voice { language_code: "en-US", engines: &[N, G] }),
];

/// Get voice metadata by name using binary search O(log n).
pub fn get_voice(name: &str) -> Option<&'static Voice> {
    VOICES.binary_search_by_key(&name, |(n, _)| n).ok().map(|idx| &VOICES[idx].1)
}

/// Print all catalogued voices.
pub fn print_voices() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  Amazon Polly - {} US English Voices", VOICES.len());
    println!("═══════════════════════════════════════════════════════════════════");
    println!();
    println!("{:<12} {:<8} ENGINES", "VOICE", "LANG");
    println!("{}", "─".repeat(50));

    for (name, voice) in VOICES {
        println!("{:<12} {:<8} {}", name, voice.language_code, voice.engine_list());
    }

    println!("\n{}\n", "─".repeat(70));
    println!("Default: Kendra (standard + neural)");
    println!("Neural-only voices (Kevin, Stephen) cannot fall back to the standard engine,");
    println!("which matters when the neural engine rejects parts of your SSML.");
    println!();
    println!("Usage:");
    println!("  ./polly-narrator --voice Joanna");
    println!("  ./polly-narrator --voice Ruth --engine long-form --fallback-engine neural");
}

/// Print detailed information about a specific voice.
pub fn print_voice_info(name: &str) -> anyhow::Result<()> {
    let voice = get_voice(name).ok_or_else(|| anyhow::anyhow!("Voice '{}' not found. Run with --list-voices to see available voices", name))?;

    println!();
    println!("Voice: {}", name);
    println!("{}", "─".repeat(40));
    println!("Language:      {}", voice.language_code);
    println!("Engines:       {}", voice.engine_list());
    println!();
    println!("Usage:");
    println!("  ./polly-narrator --voice {} --language {}", name, voice.language_code);
    println!();

    Ok(())
}
