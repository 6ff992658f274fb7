use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::line_endings::LineEnding;

/// Marker and settings file that authorizes edits under a directory tree.
pub const CONFIG_FILE_NAME: &str = "textpatch.toml";

/// Per-project settings, discovered from the target path at call time.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ProjectConfig {
    /// Line-ending convention for files created in this project. Absent
    /// means the editor's fallback (host-native by default) applies.
    #[serde(default, rename = "line-endings")]
    pub line_endings: Option<LineEnding>,

    /// Free-form note surfaced to agents working in this project.
    #[serde(default, rename = "project-prompt")]
    pub project_prompt: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml_edit::de::Error,
    },
}

/// Walk up from `path` looking for the project config file.
///
/// `path` may be a file (existing or not) or a directory; discovery starts
/// at the nearest directory and ends at the filesystem root.
pub fn find_project_config(path: &Path) -> Option<PathBuf> {
    let start = if path.is_dir() { path } else { path.parent()? };
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Load and parse a project config file.
pub fn load_config(config_path: &Path) -> Result<ProjectConfig, ConfigError> {
    let raw = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    toml_edit::de::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}

/// Resolve the line-ending convention for a file created at `path`.
///
/// A project config pin wins; otherwise `fallback`. Sibling files are not
/// consulted, which is a documented simplification rather than a guarantee
/// of matching the rest of the tree. An unparseable config is reported and
/// treated as absent.
pub fn repo_line_ending_default(path: &Path, fallback: LineEnding) -> LineEnding {
    let Some(config_path) = find_project_config(path) else {
        return fallback;
    };
    match load_config(&config_path) {
        Ok(config) => config.line_endings.unwrap_or(fallback),
        Err(err) => {
            warn!(error = %err, "ignoring unreadable project config");
            fallback
        }
    }
}
