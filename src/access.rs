use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{find_project_config, CONFIG_FILE_NAME};

/// Verdict from a permission policy.
///
/// The engine treats this as opaque input: any denial is a hard stop before
/// filesystem I/O, with the policy's reason surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDecision {
    Allowed,
    Denied { reason: String },
}

/// External collaborator deciding whether a path may be edited.
pub trait PermissionPolicy {
    fn check_edit_permission(&self, path: &Path) -> PermissionDecision;
}

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("file path must be absolute, not relative: {}", .0.display())]
    RelativePath(PathBuf),

    #[error("{reason}")]
    PermissionDenied { reason: String },
}

/// Gate run before every mutation: the path must be absolute and the policy
/// must allow it. Pure validation, no side effects.
pub fn check_file_path(path: &Path, policy: &dyn PermissionPolicy) -> Result<(), AccessError> {
    if !path.is_absolute() {
        return Err(AccessError::RelativePath(path.to_path_buf()));
    }
    match policy.check_edit_permission(path) {
        PermissionDecision::Allowed => Ok(()),
        PermissionDecision::Denied { reason } => Err(AccessError::PermissionDenied { reason }),
    }
}

/// Default policy: a path is editable iff a `textpatch.toml` exists in one
/// of its ancestor directories. The marker doubles as the project settings
/// file, so opting a tree into agent edits and configuring them are the same
/// act.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectPolicy;

impl PermissionPolicy for ProjectPolicy {
    fn check_edit_permission(&self, path: &Path) -> PermissionDecision {
        match find_project_config(path) {
            Some(_) => PermissionDecision::Allowed,
            None => PermissionDecision::Denied {
                reason: format!(
                    "no {} found in any parent directory of {}; create one to allow edits",
                    CONFIG_FILE_NAME,
                    path.display()
                ),
            },
        }
    }
}
