//! Integration tests for editing sessions backed by files on disk.

use std::path::PathBuf;

use panelview_wasm::error::PanelError;
use panelview_wasm::model::{EditSession, MillLine, Operation, Panel};

/// Scratch file unique to this test binary and test name.
fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "panelview-session-{}-{name}.xml",
        std::process::id()
    ))
}

fn write_fixture(name: &str) -> PathBuf {
    let path = scratch(name);
    let written = std::fs::write(&path, include_str!("fixtures/minimal/panel.xml"));
    assert!(written.is_ok(), "could not write {}", path.display());
    path
}

#[test]
fn it_session_001_open_edit_save_reopen() {
    let path = write_fixture("edit");

    let opened = EditSession::open(&path);
    assert!(opened.is_ok(), "expected Ok, got Err: {:?}", opened.as_ref().err());
    let Ok(mut session) = opened else {
        return;
    };
    assert_eq!(session.path(), Some(path.as_path()));
    assert_eq!(session.operations().len(), 6);

    let index = session.push(Operation::Line(MillLine::new(("0", "10"), ("L", "10"), "6", "5")));
    assert_eq!(index, 6);
    assert!(session.remove(0).is_ok());
    assert!(session.save().is_ok());

    let reopened = EditSession::open(&path);
    assert!(reopened.is_ok());
    if let Ok(reopened) = reopened {
        assert_eq!(reopened.operations().len(), 6);
        assert_eq!(
            reopened.operations().first().map(Operation::type_name),
            Some("Back Vertical Hole")
        );
        assert!(matches!(reopened.operations().last(), Some(Operation::Line(_))));
        assert_eq!(reopened.panel().name, "Side left");
    }

    let _ = std::fs::remove_file(&path);
}

#[test]
fn it_session_002_save_as_moves_the_session() {
    let source = write_fixture("save-as-source");
    let target = scratch("save-as-target");

    let opened = EditSession::open(&source);
    assert!(opened.is_ok());
    let Ok(mut session) = opened else {
        return;
    };

    session.set_dimensions(800.0, 500.0, 18.0);
    assert!(session.save_as(&target).is_ok());
    assert_eq!(session.path(), Some(target.as_path()));

    let source_text = std::fs::read_to_string(&source).unwrap_or_default();
    let target_text = std::fs::read_to_string(&target).unwrap_or_default();
    assert!(source_text.contains("<PanelLength>600.00</PanelLength>"), "source untouched");
    assert!(target_text.contains("<PanelLength>800</PanelLength>"));
    assert!(target_text.contains("<PanelThickness>18</PanelThickness>"));

    let _ = std::fs::remove_file(&source);
    let _ = std::fs::remove_file(&target);
}

#[test]
fn it_session_003_missing_file_is_an_io_error() {
    let result = EditSession::open(scratch("does-not-exist"));
    assert!(matches!(result, Err(PanelError::Io(_))));
}

#[test]
fn it_session_004_failed_save_as_keeps_path() {
    let mut session = EditSession::default();
    session.set_panel(Panel::new(600.0, 400.0, 16.0));

    let bad_target = std::env::temp_dir()
        .join("panelview-no-such-directory")
        .join("panel.xml");
    assert!(matches!(session.save_as(&bad_target), Err(PanelError::Io(_))));
    assert_eq!(session.path(), None);
    assert!(matches!(session.save(), Err(PanelError::NoPath)));
}

#[test]
fn it_session_005_face_hole_issues_follow_resize() {
    let mut session = EditSession::default();
    session.set_panel(Panel::new(600.0, 400.0, 16.0));
    session.push(Operation::horizontal_hole("600", "200", "8", "30"));
    assert!(session.face_hole_issues().is_empty());

    // The hole was placed at an absolute 600; a longer panel leaves it stranded.
    session.set_dimensions(700.0, 400.0, 16.0);
    assert_eq!(session.face_hole_issues(), vec![0]);
}
