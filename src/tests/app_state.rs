use super::{AppState, Flow, StatusMessage};
use crate::commands::Session;
use crate::test_support::RecordingBackend;
use std::fs;
use tempfile::TempDir;

fn app_with(notes: &str) -> (TempDir, AppState<RecordingBackend>) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("talk.pdf"), b"%PDF-1.4").unwrap();
    let path = dir.path().join("notes.md");
    fs::write(&path, notes).unwrap();

    let session = Session::new(
        dir.path().join("slidenotes.toml"),
        dir.path().to_path_buf(),
        |_cfg| RecordingBackend::new(10),
    );
    let app = AppState::load(path, session).unwrap();
    (dir, app)
}

const NOTES: &str = "pdf: \"talk.pdf\"\n\n## Slide 1\n- welcome\n\n## Slide 4\n- later\n";

#[test]
fn test_load_round_trips_without_changes() {
    let (_dir, mut app) = app_with(NOTES);

    assert!(!app.is_dirty());
    app.save().unwrap();

    let content = fs::read_to_string(&app.path).unwrap();
    assert_eq!(content, NOTES);
}

#[test]
fn test_viewer_command_reports_in_status_line() {
    let (_dir, mut app) = app_with(NOTES);

    assert_eq!(app.run_command("Annotate"), Flow::Continue);
    assert_eq!(
        app.message,
        Some(StatusMessage::Info("Annotating talk.pdf (10 pages)".to_string()))
    );

    app.run_command("GoToPage 11");
    assert_eq!(
        app.message,
        Some(StatusMessage::Error(
            "Page number must be between 1 and 10, got 11".to_string()
        ))
    );
}

#[test]
fn test_created_note_lands_in_editor() {
    let (_dir, mut app) = app_with(NOTES);
    app.run_command("Annotate");
    app.run_command("GoToPage 2");

    app.run_command("CreatePageNote");

    let lines = app.snapshot();
    assert_eq!(lines.lines()[5], "## Slide 2");
    assert_eq!(lines.lines()[7], "- ");
    assert_eq!(lines.lines()[9], "## Slide 4");
    assert_eq!(app.editor_state.cursor.row, 8);
    assert!(app.is_dirty());
}

#[test]
fn test_quit_guards_unsaved_notes() {
    let (_dir, mut app) = app_with(NOTES);
    app.run_command("Annotate");
    app.run_command("GoToPage 3");
    app.run_command("CreatePageNote");

    assert_eq!(app.run_command("q"), Flow::Continue);
    assert!(matches!(app.message, Some(StatusMessage::Error(_))));

    assert_eq!(app.run_command("wq"), Flow::Quit);
    let content = fs::read_to_string(&app.path).unwrap();
    assert!(content.contains("## Slide 3\n\n- \n\n## Slide 4\n"));
    assert!(content.ends_with('\n'));
}

#[test]
fn test_unknown_command_is_an_error_message() {
    let (_dir, mut app) = app_with(NOTES);

    assert_eq!(app.run_command("Nope"), Flow::Continue);
    assert_eq!(
        app.message,
        Some(StatusMessage::Error("Unknown command: Nope".to_string()))
    );
    assert_eq!(app.run_command("q!"), Flow::Quit);
}
