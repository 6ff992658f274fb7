use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::access::{check_file_path, AccessError, PermissionPolicy};

/// Cap on listed entries; deep trees get truncated with a banner.
pub const MAX_FILES: usize = 1000;

#[derive(Error, Debug)]
pub enum LsError {
    #[error("directory does not exist: {0}")]
    NotFound(PathBuf),

    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Entries hidden from listings: dot-entries and build artifacts.
fn skip(name: &str) -> bool {
    name.starts_with('.') || name == "target" || name == "node_modules" || name == "__pycache__"
}

/// List `directory` recursively as an indented tree rooted at its absolute
/// path.
///
/// Gated by the same permission policy as edits. Unreadable entries are
/// skipped rather than failing the whole listing.
pub fn ls_directory(directory: &Path, policy: &dyn PermissionPolicy) -> Result<String, LsError> {
    check_file_path(directory, policy)?;

    if !directory.exists() {
        return Err(LsError::NotFound(directory.to_path_buf()));
    }
    if !directory.is_dir() {
        return Err(LsError::NotADirectory(directory.to_path_buf()));
    }

    let mut entries = Vec::new();
    let mut truncated = false;
    let walker = WalkDir::new(directory)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !skip(&entry.file_name().to_string_lossy()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if entries.len() >= MAX_FILES {
            truncated = true;
            break;
        }
        entries.push((
            entry.depth(),
            entry.file_name().to_string_lossy().into_owned(),
            entry.file_type().is_dir(),
        ));
    }

    let mut out = String::new();
    if truncated {
        let _ = writeln!(
            out,
            "There are more than {MAX_FILES} entries in the directory. \
             Use more specific paths to explore nested directories. \
             The first {MAX_FILES} entries are included below:\n"
        );
    }
    let _ = writeln!(out, "- {}/", directory.display());
    for (depth, name, is_dir) in entries {
        let indent = "  ".repeat(depth);
        let suffix = if is_dir { "/" } else { "" };
        let _ = writeln!(out, "{indent}- {name}{suffix}");
    }
    Ok(out)
}
