//! MP3 concatenation and output.

use std::path::Path;

use crate::error::NarrateError;

/// Join MP3 fragments into one stream.
///
/// MP3 frames are self-synchronizing, so byte-wise concatenation yields a
/// playable file. This is not valid for containers like WAV or Ogg.
///
/// # Arguments
/// * `chunks` - Fragments in playback order
///
/// # Returns
/// The fragments back to back, in input order.
pub fn concatenate(chunks: &[Vec<u8>]) -> Vec<u8> {
    chunks.concat()
}

/// Write the narration, replacing any existing file.
///
/// Missing parent directories are created.
pub fn write_audio(path: &Path, audio: &[u8]) -> Result<(), NarrateError> {
    let to_error = |source| NarrateError::WriteFailure { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    std::fs::write(path, audio).map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenate_preserves_order_and_length() {
        let chunks = vec![vec![0xff, 0xfb], vec![], vec![1, 2, 3]];
        let joined = concatenate(&chunks);
        assert_eq!(joined.len(), 5);
        assert_eq!(joined, vec![0xff, 0xfb, 1, 2, 3]);
    }

    #[test]
    fn test_concatenate_nothing() {
        assert!(concatenate(&[]).is_empty());
    }

    #[test]
    fn test_write_audio_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("narration.mp3");

        write_audio(&path, &[1, 2, 3, 4]).unwrap();
        write_audio(&path, &[5]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![5]);
    }

    #[test]
    fn test_write_audio_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let err = write_audio(&blocker.join("narration.mp3"), &[1]).unwrap_err();
        assert!(matches!(err, NarrateError::WriteFailure { .. }));
    }
}
