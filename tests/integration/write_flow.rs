use std::fs;
use std::path::Path;

use textpatch::{
    detect_line_endings, write_text_content, EditError, FileEditor, FileEncoding, LineEnding,
    PermissionDecision, PermissionPolicy, CONFIG_FILE_NAME,
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
            reason: "read-only session".to_string(),
        }
    }
}

#[test]
fn detected_style_round_trips_through_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.txt");
    fs::write(&path, b"one\r\ntwo\r\n").unwrap();

    let style = detect_line_endings(&path).unwrap();
    write_text_content(&path, "three\nfour\n", FileEncoding::Utf8, style).unwrap();

    assert_eq!(detect_line_endings(&path).unwrap(), style);
    assert_eq!(fs::read(&path).unwrap(), b"three\r\nfour\r\n");
}

#[test]
fn overwrite_keeps_fallback_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.txt");
    fs::write(&path, b"caf\xE9\n").unwrap();

    let editor = FileEditor::new(AllowAll).with_fallback_line_ending(LineEnding::Lf);
    editor.write_file_content(&path, "crème\n").unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"cr\xE8me\n");
}

#[test]
fn new_file_honors_project_line_ending_pin() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "line-endings = \"crlf\"\n",
    )
    .unwrap();
    let path = dir.path().join("docs/note.txt");

    let editor = FileEditor::default().with_fallback_line_ending(LineEnding::Lf);
    editor.write_file_content(&path, "a\nb\n").unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"a\r\nb\r\n");
}

#[test]
fn denied_permission_prevents_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sub/file.txt");

    let editor = FileEditor::new(DenyAll);
    let err = editor.write_file_content(&path, "content").unwrap_err();
    assert!(matches!(err, EditError::PermissionDenied { .. }));
    assert!(!dir.path().join("sub").exists());
}

#[test]
fn relative_path_is_rejected() {
    let editor = FileEditor::new(AllowAll);
    let err = editor
        .write_file_content(Path::new("rel/file.txt"), "content")
        .unwrap_err();
    assert!(matches!(err, EditError::RelativePath(_)));
}

#[test]
fn write_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a/b/file.txt");

    let editor = FileEditor::new(AllowAll).with_fallback_line_ending(LineEnding::Lf);
    let message = editor.write_file_content(&path, "deep\n").unwrap();
    assert!(message.contains(&format!("wrote to {}", path.display())));
    assert_eq!(fs::read_to_string(&path).unwrap(), "deep\n");
}
