use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("path is not in a Git repository: {0}")]
    NotARepository(PathBuf),

    #[error("file is not tracked by git: {0}; add it to tracking first with 'git add'")]
    Untracked(PathBuf),

    #[error("failed to stage {path}: {stderr}")]
    StageFailed { path: PathBuf, stderr: String },

    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Working directory to run git from: the containing directory for files,
/// the path itself for directories.
fn git_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}

/// Whether `path` lies inside a git work tree.
pub fn is_git_repository(path: &Path) -> bool {
    let dir = git_dir(path);
    if !dir.exists() {
        return false;
    }
    let probe = Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(&dir)
        .output();
    match probe {
        Ok(output) => output.status.success(),
        Err(err) => {
            warn!(error = %err, "failed to invoke git");
            false
        }
    }
}

/// Root of the repository containing `path`, when there is one.
pub fn repository_root(path: &Path) -> Option<PathBuf> {
    let dir = git_dir(path);
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(&dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        None
    } else {
        Some(PathBuf::from(root))
    }
}

/// Read-only check that `path` is tracked by git.
///
/// Never mutates the repository or the working tree; an untracked file is a
/// reportable condition, not a crash.
pub fn file_tracking_status(path: &Path) -> Result<String, GitError> {
    if !is_git_repository(path) {
        return Err(GitError::NotARepository(path.to_path_buf()));
    }
    let output = Command::new("git")
        .arg("ls-files")
        .arg("--error-unmatch")
        .arg(path)
        .current_dir(git_dir(path))
        .output()?;
    if output.status.success() {
        Ok(format!("{} is tracked by git", path.display()))
    } else {
        Err(GitError::Untracked(path.to_path_buf()))
    }
}

/// Stage `path` (or, for a directory, all changes beneath it) without
/// committing.
pub fn stage_path(path: &Path) -> Result<String, GitError> {
    if !is_git_repository(path) {
        return Err(GitError::NotARepository(path.to_path_buf()));
    }

    // Run from the repo root so pathspecs resolve consistently.
    let cwd = repository_root(path).unwrap_or_else(|| git_dir(path));

    let mut command = Command::new("git");
    command.current_dir(&cwd);
    if path.is_dir() {
        command.args(["add", "."]);
    } else {
        command.arg("add").arg(path);
    }

    let output = command.output()?;
    if output.status.success() {
        Ok("Changes staged successfully".to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(path = %path.display(), stderr = %stderr, "git add failed");
        Err(GitError::StageFailed {
            path: path.to_path_buf(),
            stderr,
        })
    }
}
