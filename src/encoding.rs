use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};
use thiserror::Error;
use tracing::warn;

/// Byte-to-text decoding scheme for a file's contents.
///
/// A closed set: `Utf8` is the primary tag, `Windows1252` the safe
/// single-byte fallback. The fallback decodes any byte sequence, so probing
/// never loses data; it does not guarantee the interpretation is the one the
/// file's author intended. Recomputed per operation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEncoding {
    Utf8,
    Windows1252,
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("content contains characters not representable in windows-1252")]
    Unrepresentable,
}

impl FileEncoding {
    /// Pure probe over raw bytes: valid UTF-8 keeps the primary tag,
    /// anything else falls back to the single-byte tag.
    pub fn probe(bytes: &[u8]) -> Self {
        if std::str::from_utf8(bytes).is_ok() {
            FileEncoding::Utf8
        } else {
            FileEncoding::Windows1252
        }
    }

    /// Probe an on-disk file for the encoding to read and write it with.
    ///
    /// Missing or unreadable files get the default tag; the caller's own
    /// read will surface the real error. Reads the whole file, which is
    /// acceptable since every caller rereads or rewrites it anyway.
    pub fn detect(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(_) => return FileEncoding::Utf8,
        };
        let encoding = Self::probe(&bytes);
        if encoding == FileEncoding::Windows1252 {
            warn!(path = %path.display(), "not valid UTF-8, falling back to windows-1252");
        }
        encoding
    }

    /// Decode raw file bytes under this tag.
    ///
    /// Infallible: `Utf8` is only selected after a successful probe, and
    /// windows-1252 maps every byte.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            FileEncoding::Utf8 => UTF_8.decode(bytes).0.into_owned(),
            FileEncoding::Windows1252 => WINDOWS_1252.decode(bytes).0.into_owned(),
        }
    }

    /// Encode text for writing under this tag.
    ///
    /// Fails rather than writing substitution bytes when replacement text
    /// cannot be represented in the single-byte fallback.
    pub fn encode(self, content: &str) -> Result<Cow<'_, [u8]>, EncodeError> {
        match self {
            FileEncoding::Utf8 => Ok(Cow::Borrowed(content.as_bytes())),
            FileEncoding::Windows1252 => {
                let (bytes, _, had_errors) = WINDOWS_1252.encode(content);
                if had_errors {
                    return Err(EncodeError::Unrepresentable);
                }
                Ok(Cow::Owned(bytes.into_owned()))
            }
        }
    }
}
