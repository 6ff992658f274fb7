use std::fs;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::encoding::{EncodeError, FileEncoding};
use crate::line_endings::{normalize, LineEnding};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Create the directory chain containing `path` if it is missing.
/// Idempotent: an existing directory is not an error.
pub fn ensure_directory_exists(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write text to `path` under the given encoding and line-ending convention.
///
/// Content is normalized to the target convention, encoded, and written as a
/// whole in one atomic operation; the destination is created or truncated,
/// never left partially written. Targets files small enough for
/// whole-content reads and writes, so there is no streaming path.
pub fn write_text_content(
    path: &Path,
    content: &str,
    encoding: FileEncoding,
    line_ending: LineEnding,
) -> Result<(), WriteError> {
    let final_content = normalize(content, line_ending);
    let bytes = encoding.encode(&final_content)?;
    ensure_directory_exists(path)?;
    atomic_write(path, &bytes)?;
    Ok(())
}

/// Atomic file write: tempfile in the destination directory + fsync + rename,
/// so either the full write lands or nothing changes.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c/file.txt");

        write_text_content(&target, "hello\n", FileEncoding::Utf8, LineEnding::Lf).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"hello\n");
    }

    #[test]
    fn applies_line_ending_convention() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("crlf.txt");

        write_text_content(&target, "a\nb\n", FileEncoding::Utf8, LineEnding::Crlf).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"a\r\nb\r\n");
    }

    #[test]
    fn truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("file.txt");
        fs::write(&target, "a much longer original body\n").unwrap();

        write_text_content(&target, "short\n", FileEncoding::Utf8, LineEnding::Lf).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "short\n");
    }

    #[test]
    fn writes_fallback_encoding_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("legacy.txt");

        write_text_content(&target, "café\n", FileEncoding::Windows1252, LineEnding::Lf).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"caf\xE9\n");
    }

    #[test]
    fn unrepresentable_content_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("legacy.txt");

        let result =
            write_text_content(&target, "日本語", FileEncoding::Windows1252, LineEnding::Lf);
        assert!(matches!(result, Err(WriteError::Encode(_))));
        assert!(!target.exists());
    }
}
