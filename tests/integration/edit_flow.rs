use std::fs;
use std::path::Path;

use textpatch::{
    EditError, FileEditor, LineEnding, PermissionDecision, PermissionPolicy, CONFIG_FILE_NAME,
};

struct AllowAll;
impl PermissionPolicy for AllowAll {
    fn check_edit_permission(&self, _path: &Path) -> PermissionDecision {
        PermissionDecision::Allowed
    }
}

struct DenyAll;
impl PermissionPolicy for DenyAll {
    fn check_edit_permission(&self, _path: &Path) -> PermissionDecision {
        PermissionDecision::Denied {
            reason: "policy says no".to_string(),
        }
    }
}

fn editor() -> FileEditor<AllowAll> {
    FileEditor::new(AllowAll).with_fallback_line_ending(LineEnding::Lf)
}

#[test]
fn create_then_edit_with_bad_anchor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.txt");

    // Empty anchor on a non-existent path is a creation, not an error.
    let message = editor().edit_file_content(&path, "", "hello", None).unwrap();
    assert!(message.contains(&format!("created new file {}", path.display())));
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello");

    // A non-matching anchor against the now-existing file is NoMatch.
    let err = editor()
        .edit_file_content(&path, "goodbye", "x", None)
        .unwrap_err();
    assert!(matches!(err, EditError::NoMatch { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
}

#[test]
fn only_first_occurrence_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.txt");
    fs::write(&path, "foo bar\nfoo baz\n").unwrap();

    editor().edit_file_content(&path, "foo", "FOO", None).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "FOO bar\nfoo baz\n");
}

#[test]
fn crlf_survives_round_trip_edit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.txt");
    fs::write(&path, b"line1\r\nline2\r\n").unwrap();

    editor()
        .edit_file_content(&path, "line1", "LINE1", None)
        .unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"LINE1\r\nline2\r\n");
}

#[test]
fn denied_permission_prevents_all_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sub/new.txt");

    let editor = FileEditor::new(DenyAll);
    let err = editor.edit_file_content(&path, "", "hello", None).unwrap_err();
    match err {
        EditError::PermissionDenied { reason } => assert_eq!(reason, "policy says no"),
        other => panic!("expected PermissionDenied, got {other:?}"),
    }

    // Neither the intermediate directory nor the file may exist.
    assert!(!dir.path().join("sub").exists());
    assert!(!path.exists());
}

#[test]
fn relative_path_is_rejected() {
    let err = editor()
        .edit_file_content(Path::new("rel/file.txt"), "a", "b", None)
        .unwrap_err();
    assert!(matches!(err, EditError::RelativePath(_)));
}

#[test]
fn project_marker_grants_permission() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
    let path = dir.path().join("src/lib.rs");

    let editor = FileEditor::default().with_fallback_line_ending(LineEnding::Lf);
    editor
        .edit_file_content(&path, "", "pub fn hello() {}\n", None)
        .unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "pub fn hello() {}\n"
    );
}

#[test]
fn missing_file_with_anchor_is_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = editor()
        .edit_file_content(&dir.path().join("ghost.txt"), "anchor", "x", None)
        .unwrap_err();
    assert!(matches!(err, EditError::FileNotFound(_)));
}
