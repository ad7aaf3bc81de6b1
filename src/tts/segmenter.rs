//! Script segmentation under Polly's per-request character limit.
//!
//! SSML scripts are flattened into a single `<speak>` body and cut at
//! `</prosody>` boundaries, so every segment stays a standalone document.
//! Plain-text scripts are cut at sentence boundaries.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::script::Script;

/// `[SECTION: name]` markers are for the script author only.
static SECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[SECTION: [^\]]+\]\n?").expect("valid regex"));

static SPEAK_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<speak>(.*?)</speak>").expect("valid regex"));

const SPEAK_OPEN: &str = "<speak>";
const SPEAK_CLOSE: &str = "</speak>";
const PROSODY_CLOSE: &str = "</prosody>";

/// Characters added by wrapping content in `<speak>...</speak>`.
const WRAPPER_CHARS: usize = SPEAK_OPEN.len() + SPEAK_CLOSE.len();

/// One planned request, as printed by `--dry-run`.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedSegment {
    pub index: usize,
    pub chars: usize,
    pub text: String,
}

/// Split a script into request payloads, choosing the SSML or plain-text splitter.
pub fn segment_script(script: &Script, max_chars: usize) -> Vec<String> {
    if script.is_ssml() { segment(&script.content, max_chars) } else { segment_plain(&script.content, max_chars) }
}

/// Describe the segments for display.
pub fn plan(segments: &[String]) -> Vec<PlannedSegment> {
    segments
        .iter()
        .enumerate()
        .map(|(i, text)| PlannedSegment { index: i + 1, chars: text.chars().count(), text: text.clone() })
        .collect()
}

/// Remove section markers and join the bodies of all `<speak>` blocks with newlines.
pub fn normalize(text: &str) -> String {
    let without_markers = SECTION_MARKER.replace_all(text, "");
    SPEAK_BLOCK
        .captures_iter(&without_markers)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split SSML into `<speak>` documents of at most `max_chars` characters.
///
/// A single `</prosody>` block longer than the limit becomes its own oversized
/// segment. When nothing but whitespace remains after splitting, the whole
/// wrapped body is returned even if it is over the limit.
pub fn segment(text: &str, max_chars: usize) -> Vec<String> {
    let content = normalize(text);
    let full = wrap(&content);
    if full.chars().count() <= max_chars {
        return vec![full];
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    // split_inclusive keeps each closing tag on the block it ends
    for block in content.split_inclusive(PROSODY_CLOSE) {
        if block.trim().is_empty() {
            continue;
        }

        let block_chars = block.chars().count();
        if !current.is_empty() && current_chars + block_chars + WRAPPER_CHARS > max_chars {
            segments.push(wrap(&current));
            current.clear();
            current_chars = 0;
        }

        current.push_str(block);
        current_chars += block_chars;
    }

    if !current.trim().is_empty() {
        segments.push(wrap(&current));
    }

    if segments.is_empty() { vec![full] } else { segments }
}

/// Split plain text into chunks of at most `max_chars` characters at sentence boundaries.
///
/// Sentences are joined with a single space. A sentence longer than the limit
/// is emitted on its own.
pub fn segment_plain(text: &str, max_chars: usize) -> Vec<String> {
    let cleaned = SECTION_MARKER.replace_all(text, "");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for sentence in split_sentences(&cleaned) {
        let sentence_chars = sentence.chars().count();
        if !current.is_empty() && current_chars + 1 + sentence_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(&sentence);
        current_chars += sentence_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    if chunks.is_empty() {
        chunks.push(cleaned.trim().to_string());
    }
    chunks
}

fn wrap(content: &str) -> String {
    format!("{SPEAK_OPEN}{content}{SPEAK_CLOSE}")
}

/// Split text into trimmed sentences.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        current.push(c);

        if c == '.' || c == '!' || c == '?' || c == '\n' {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    /// 41 characters: 21 opening, 10 text, 10 closing.
    fn block(text: &str) -> String {
        assert_eq!(text.len(), 10);
        format!("<prosody rate=\"slow\">{text}</prosody>")
    }

    fn inner(segment: &str) -> &str {
        segment.strip_prefix(SPEAK_OPEN).and_then(|s| s.strip_suffix(SPEAK_CLOSE)).unwrap()
    }

    fn assert_single_root(segment: &str) {
        assert!(segment.starts_with(SPEAK_OPEN) && segment.ends_with(SPEAK_CLOSE), "not wrapped: {segment}");
        assert_eq!(segment.matches(SPEAK_OPEN).count(), 1);
        assert_eq!(segment.matches(SPEAK_CLOSE).count(), 1);
        assert_eq!(segment.matches("<prosody").count(), segment.matches(PROSODY_CLOSE).count());
    }

    #[test]
    fn test_short_script_is_one_segment() {
        assert_eq!(segment("<speak>hello</speak>", 3000), vec!["<speak>hello</speak>"]);
    }

    #[test]
    fn test_markers_removed_and_blocks_joined() {
        let text = "[SECTION: Intro]\n<speak>Hi there.</speak>\n\n[SECTION: Outro]\n<speak>Bye.</speak>\n";
        let segments = segment(text, 3000);
        assert_eq!(segments, vec!["<speak>Hi there.\nBye.</speak>"]);
        assert!(!segments[0].contains("SECTION"));
    }

    #[test]
    fn test_splits_at_prosody_boundaries() {
        let text = format!("<speak>{}{}</speak>\n<speak>{}</speak>", block("aaaaaaaaaa"), block("bbbbbbbbbb"), block("cccccccccc"));
        let segments = segment(&text, 100);

        assert_eq!(segments.len(), 2);
        for s in &segments {
            assert!(s.chars().count() <= 100);
            assert_single_root(s);
        }
        assert!(segments[0].contains("bbbbbbbbbb"));
        assert!(segments[1].contains("cccccccccc"));

        let rejoined: String = segments.iter().map(|s| inner(s)).collect();
        assert_eq!(rejoined, normalize(&text));
    }

    #[test]
    fn test_trailing_text_stays_in_last_segment() {
        let text = format!("<speak>{}{} The end.</speak>", block("aaaaaaaaaa"), block("bbbbbbbbbb"));
        let segments = segment(&text, 70);

        assert_eq!(segments.len(), 2);
        assert!(segments[1].ends_with(" The end.</speak>"));
        let rejoined: String = segments.iter().map(|s| inner(s)).collect();
        assert_eq!(rejoined, normalize(&text));
    }

    #[test]
    fn test_oversized_block_is_emitted_alone() {
        let text = format!("<speak>{}{}{}</speak>", block("aaaaaaaaaa"), block("bbbbbbbbbb"), block("cccccccccc"));
        let segments = segment(&text, 50);

        assert_eq!(segments.len(), 3);
        for s in &segments {
            assert_eq!(s.chars().count(), 56);
            assert_single_root(s);
        }
    }

    #[test]
    fn test_whitespace_only_content_falls_back_to_full() {
        let text = format!("<speak>{}</speak>", " ".repeat(100));
        let segments = segment(&text, 50);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].chars().count(), 115);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        // 10 characters, 20 bytes
        let text = format!("<speak>{}</speak>", "é".repeat(10));
        assert_eq!(segment(&text, 25).len(), 1);
    }

    #[test]
    fn test_no_speak_blocks_yields_empty_document() {
        assert_eq!(segment("plain words", 3000), vec!["<speak></speak>"]);
    }

    #[test]
    fn test_plain_text_packs_sentences() {
        let text = "[SECTION: One]\nFirst sentence here. Second one!\nThird? Fourth.";
        let chunks = segment_plain(text, 35);

        assert_eq!(chunks, vec!["First sentence here. Second one!", "Third? Fourth."]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 35));
    }

    #[test]
    fn test_plain_text_long_sentence_alone() {
        let long = "x".repeat(30);
        let text = format!("Short. {long}. Tail.");
        let chunks = segment_plain(&text, 20);
        assert_eq!(chunks, vec!["Short.".to_string(), format!("{long}."), "Tail.".to_string()]);
    }

    #[test]
    fn test_segment_script_dispatches_on_ssml() {
        let plain = Script { path: PathBuf::from("s.txt"), content: "Hello there.".into() };
        assert_eq!(segment_script(&plain, 3000), vec!["Hello there."]);

        let ssml = Script { path: PathBuf::from("s.txt"), content: "<speak>Hello there.</speak>".into() };
        assert_eq!(segment_script(&ssml, 3000), vec!["<speak>Hello there.</speak>"]);
    }

    #[test]
    fn test_plan_numbers_from_one() {
        let planned = plan(&["<speak>a</speak>".to_string(), "<speak>bc</speak>".to_string()]);
        assert_eq!(planned[0].index, 1);
        assert_eq!(planned[1].chars, 17);
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(split_sentences("Hi. How are you?\nFine"), vec!["Hi.", "How are you?", "Fine"]);
    }
}
