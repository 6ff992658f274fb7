//! Textpatch: anchor-based text mutation engine for automated editing agents
//!
//! A small, safe engine that reads, patches, and rewrites files on a local
//! filesystem on behalf of an editing agent.
//!
//! # Architecture
//!
//! All edits compile down to a single primitive: replace the first occurrence
//! of an exact anchor substring ([`patch::apply_edit`]). Everything around it
//! exists to make that substitution safe: an absolute-path and permission
//! gate runs before any I/O, the file's byte encoding and line-ending
//! convention are detected before the rewrite and preserved through it, and
//! the final write is atomic (tempfile + fsync + rename).
//!
//! # Safety
//!
//! - Permission gate precedes every filesystem mutation
//! - Encoding and line-ending conventions survive a round-trip edit
//! - A missing anchor is a distinct, non-silent failure
//! - Atomic whole-file writes, no partial content on disk
//! - All failures are returned as values; nothing panics across the API
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use textpatch::FileEditor;
//!
//! let editor = FileEditor::default();
//! match editor.edit_file_content(Path::new("/work/src/main.rs"), "foo", "bar", None) {
//!     Ok(message) => println!("{message}"),
//!     Err(e) => eprintln!("edit failed: {e}"),
//! }
//! ```

pub mod access;
pub mod config;
pub mod editor;
pub mod encoding;
pub mod git;
pub mod line_endings;
pub mod ls;
pub mod patch;
pub mod write;

// Re-exports
pub use access::{
    check_file_path, AccessError, PermissionDecision, PermissionPolicy, ProjectPolicy,
};
pub use config::{find_project_config, load_config, ConfigError, ProjectConfig, CONFIG_FILE_NAME};
pub use editor::{EditError, FileEditor, ReadTimestamps};
pub use encoding::{EncodeError, FileEncoding};
pub use git::{file_tracking_status, is_git_repository, repository_root, stage_path, GitError};
pub use line_endings::{detect_line_endings, normalize, LineEnding};
pub use ls::{ls_directory, LsError, MAX_FILES};
pub use patch::{apply_edit, PatchOutcome, PatchRecord};
pub use write::{ensure_directory_exists, write_text_content, WriteError};
