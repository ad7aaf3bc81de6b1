//! Narration script reader.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::NarrateError;

/// A loaded, non-empty narration script.
#[derive(Debug, Clone)]
pub struct Script {
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    /// Whether the script carries SSML markup.
    ///
    /// Decided on the raw content, before markers are stripped.
    pub fn is_ssml(&self) -> bool {
        self.content.contains("<speak>")
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Read and validate the narration script.
///
/// # Errors
/// - `MissingInput` if the file does not exist
/// - `ReadFailure` if it cannot be read as UTF-8
/// - `EmptyInput` if it contains only whitespace
pub fn read_script(path: &Path) -> Result<Script, NarrateError> {
    if !path.exists() {
        return Err(NarrateError::MissingInput(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| NarrateError::ReadFailure { path: path.to_path_buf(), source })?;

    if content.trim().is_empty() {
        return Err(NarrateError::EmptyInput(path.to_path_buf()));
    }

    debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(Script { path: path.to_path_buf(), content })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn script_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_ssml_script() {
        let file = script_file("[SECTION: Intro]\n<speak>hello</speak>\n");
        let script = read_script(file.path()).unwrap();
        assert!(script.is_ssml());
        assert_eq!(script.char_count(), 38);
    }

    #[test]
    fn test_plain_text_is_not_ssml() {
        let file = script_file("Just words, no markup.");
        assert!(!read_script(file.path()).unwrap().is_ssml());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_script(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, NarrateError::MissingInput(_)));
    }

    #[test]
    fn test_blank_file() {
        let file = script_file("  \n\t\n");
        let err = read_script(file.path()).unwrap_err();
        assert!(matches!(err, NarrateError::EmptyInput(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        let err = read_script(file.path()).unwrap_err();
        assert!(matches!(err, NarrateError::ReadFailure { .. }));
    }
}
