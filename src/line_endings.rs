use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

/// Line-termination convention of a text file.
///
/// Recomputed per operation from the file's current bytes; never cached
/// across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl LineEnding {
    /// The byte sequence this convention terminates lines with.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// The host platform's convention.
    pub fn native() -> Self {
        if cfg!(windows) {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }
}

/// Pure probe over raw content: any CRLF sequence anywhere selects CRLF,
/// otherwise LF.
pub fn probe(content: &[u8]) -> LineEnding {
    if content.windows(2).any(|pair| pair == b"\r\n") {
        LineEnding::Crlf
    } else {
        LineEnding::Lf
    }
}

/// Detect the line-ending convention of an existing file.
pub fn detect_line_endings(path: &Path) -> io::Result<LineEnding> {
    let content = fs::read(path)?;
    Ok(probe(&content))
}

/// Normalize `content` to the target line-ending convention.
///
/// All CRLF sequences are first collapsed to LF, then every LF is re-expanded
/// when the target is CRLF. The output never mixes conventions, and
/// normalizing an already-normalized string is a no-op.
pub fn normalize(content: &str, target: LineEnding) -> String {
    let collapsed = content.replace("\r\n", "\n");
    match target {
        LineEnding::Lf => collapsed,
        LineEnding::Crlf => collapsed.replace('\n', "\r\n"),
    }
}
