use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::access::{check_file_path, AccessError, PermissionPolicy, ProjectPolicy};
use crate::config::repo_line_ending_default;
use crate::encoding::{EncodeError, FileEncoding};
use crate::line_endings::{self, detect_line_endings, LineEnding};
use crate::patch::{apply_edit, PatchOutcome};
use crate::write::{write_text_content, WriteError};

/// Failure taxonomy for the edit and write entry points.
///
/// Every user-facing operation returns one of these as a value with a
/// descriptive message; no panic or raw I/O error crosses the orchestrator
/// boundary.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("file path must be absolute, not relative: {0}")]
    RelativePath(PathBuf),

    #[error("permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("file does not exist: {0}")]
    FileNotFound(PathBuf),

    #[error("could not find the text to replace in {path}{}", closest_hint(.closest))]
    NoMatch {
        path: PathBuf,
        closest: Option<String>,
    },

    #[error("{0} has been modified since it was last read; read it again before editing")]
    Stale(PathBuf),

    #[error("content cannot be encoded for {path}: {source}")]
    Encode { path: PathBuf, source: EncodeError },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn closest_hint(closest: &Option<String>) -> String {
    match closest {
        Some(line) => format!(" (closest match: {line:?})"),
        None => String::new(),
    }
}

impl From<AccessError> for EditError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::RelativePath(path) => EditError::RelativePath(path),
            AccessError::PermissionDenied { reason } => EditError::PermissionDenied { reason },
        }
    }
}

fn write_err(path: &Path, err: WriteError) -> EditError {
    match err {
        WriteError::Io(source) => {
            error!(path = %path.display(), error = %source, "write failed");
            EditError::Io(source)
        }
        WriteError::Encode(source) => EditError::Encode {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Timestamps recorded by the caller when it last read each file. When an
/// entry exists for the edit target, a newer on-disk mtime fails the edit
/// with [`EditError::Stale`] before any patch is applied.
pub type ReadTimestamps = HashMap<PathBuf, FileTime>;

/// Top-level entry point for agent-driven file mutation.
///
/// Holds the permission policy and the line-ending fallback used when a new
/// file's project config carries no pin. Each call is self-contained: read,
/// transform, write, with no cross-call state. Concurrent writers to the
/// same path are the caller's problem; the engine takes no locks.
pub struct FileEditor<P = ProjectPolicy> {
    policy: P,
    fallback_line_ending: LineEnding,
}

impl Default for FileEditor {
    fn default() -> Self {
        Self::new(ProjectPolicy)
    }
}

impl<P: PermissionPolicy> FileEditor<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            fallback_line_ending: LineEnding::native(),
        }
    }

    /// Replace the host-native new-file fallback with an explicit
    /// convention, making results reproducible across platforms.
    pub fn with_fallback_line_ending(mut self, style: LineEnding) -> Self {
        self.fallback_line_ending = style;
        self
    }

    /// Edit `path` by replacing the first occurrence of `old_string` with
    /// `new_string`.
    ///
    /// An empty `old_string` creates `path` as a new file containing
    /// `new_string`; an edit with no old content is defined as a creation,
    /// not an error. Existing files keep their detected encoding and
    /// line-ending convention across the rewrite.
    pub fn edit_file_content(
        &self,
        path: &Path,
        old_string: &str,
        new_string: &str,
        read_timestamps: Option<&ReadTimestamps>,
    ) -> Result<String, EditError> {
        check_file_path(path, &self.policy)?;

        if old_string.is_empty() {
            let line_ending = repo_line_ending_default(path, self.fallback_line_ending);
            write_text_content(path, new_string, FileEncoding::Utf8, line_ending)
                .map_err(|e| write_err(path, e))?;
            return Ok(format!(
                "Successfully created new file {}",
                path.display()
            ));
        }

        if !path.exists() {
            return Err(EditError::FileNotFound(path.to_path_buf()));
        }

        self.check_freshness(path, read_timestamps)?;

        let bytes = fs::read(path)?;
        let encoding = FileEncoding::probe(&bytes);
        if encoding == FileEncoding::Windows1252 {
            warn!(path = %path.display(), "not valid UTF-8, falling back to windows-1252");
        }
        let line_ending = line_endings::probe(&bytes);
        let content = encoding.decode(&bytes);

        match apply_edit(&content, old_string, new_string) {
            PatchOutcome::NoMatch { closest } => Err(EditError::NoMatch {
                path: path.to_path_buf(),
                closest,
            }),
            PatchOutcome::Applied { patches, updated } => {
                debug!(
                    path = %path.display(),
                    patches = patches.len(),
                    "applying edit"
                );
                write_text_content(path, &updated, encoding, line_ending)
                    .map_err(|e| write_err(path, e))?;
                Ok(format!("Successfully edited {}", path.display()))
            }
        }
    }

    /// Replace the entire contents of `path`, creating it if missing.
    ///
    /// Existing files keep their detected encoding and line-ending
    /// convention; new files get UTF-8 and the project's default convention.
    pub fn write_file_content(&self, path: &Path, content: &str) -> Result<String, EditError> {
        check_file_path(path, &self.policy)?;

        let (encoding, line_ending) = if path.exists() {
            (FileEncoding::detect(path), detect_line_endings(path)?)
        } else {
            (
                FileEncoding::Utf8,
                repo_line_ending_default(path, self.fallback_line_ending),
            )
        };

        write_text_content(path, content, encoding, line_ending)
            .map_err(|e| write_err(path, e))?;
        Ok(format!("Successfully wrote to {}", path.display()))
    }

    fn check_freshness(
        &self,
        path: &Path,
        read_timestamps: Option<&ReadTimestamps>,
    ) -> Result<(), EditError> {
        let Some(recorded) = read_timestamps.and_then(|stamps| stamps.get(path)) else {
            return Ok(());
        };
        let metadata = fs::metadata(path)?;
        let current = FileTime::from_last_modification_time(&metadata);
        if current > *recorded {
            return Err(EditError::Stale(path.to_path_buf()));
        }
        Ok(())
    }
}
