use eframe_whiteboard::document::{DEFAULT_NOTEBOOK_ID, DEFAULT_SHEET_ID};
use eframe_whiteboard::error::EntityKind;
use eframe_whiteboard::{
    Document, FileStore, KeyValueStore, MemoryStore, PersistenceGateway, Whiteboard, WhiteboardConfig,
    WhiteboardError,
};
use egui::Pos2;

fn config() -> WhiteboardConfig {
    WhiteboardConfig {
        initial_width: 160,
        initial_height: 120,
        ..WhiteboardConfig::default()
    }
}

fn stroke(whiteboard: &mut Whiteboard, y: f32) {
    whiteboard.begin_stroke(Pos2::new(60.0, y));
    whiteboard.extend_stroke(Pos2::new(120.0, y));
    whiteboard.end_stroke();
}

fn sheet_names(document: &Document) -> Vec<String> {
    let notebook = document.active_notebook().unwrap();
    notebook.sheets.iter().map(|s| s.name.clone()).collect()
}

#[test]
fn test_create_sheet_numbers_sequentially() {
    let mut whiteboard = Whiteboard::new(config(), Box::new(MemoryStore::new()));
    let second = whiteboard.create_sheet().unwrap();
    let third = whiteboard.create_sheet().unwrap();

    assert_ne!(second, third);
    assert_eq!(whiteboard.document().active_sheet_id(), third);
    assert_eq!(sheet_names(whiteboard.document()), ["Sheet 1", "Sheet 2", "Sheet 3"]);
}

#[test]
fn test_create_notebook_names_and_activates() {
    let mut whiteboard = Whiteboard::new(config(), Box::new(MemoryStore::new()));
    let id = whiteboard.create_notebook();

    let document = whiteboard.document();
    assert_eq!(document.active_notebook_id(), id);
    assert_eq!(document.active_notebook().unwrap().name, "Notebook 2");
    assert_eq!(sheet_names(document), ["Sheet 1"]);
    assert!(document.load_active_snapshot().is_none());
}

#[test]
fn test_switch_notebook_resets_to_first_sheet() {
    let mut whiteboard = Whiteboard::new(config(), Box::new(MemoryStore::new()));
    whiteboard.create_sheet().unwrap();
    whiteboard.create_notebook();

    whiteboard.switch_notebook(DEFAULT_NOTEBOOK_ID).unwrap();
    assert_eq!(whiteboard.document().active_notebook_id(), DEFAULT_NOTEBOOK_ID);
    assert_eq!(whiteboard.document().active_sheet_id(), DEFAULT_SHEET_ID);
}

#[test]
fn test_invalid_references_leave_state_unchanged() {
    let mut whiteboard = Whiteboard::new(config(), Box::new(MemoryStore::new()));
    let other_notebook = whiteboard.create_notebook();
    let foreign_sheet = whiteboard.document().active_sheet_id().to_owned();
    whiteboard.switch_notebook(DEFAULT_NOTEBOOK_ID).unwrap();
    let before = whiteboard.document().clone();

    let err = whiteboard.switch_notebook("missing").unwrap_err();
    assert!(matches!(err, WhiteboardError::InvalidReference { kind: EntityKind::Notebook, .. }));

    // sheets of other notebooks are not reachable through switch_sheet
    let err = whiteboard.switch_sheet(&foreign_sheet).unwrap_err();
    assert!(matches!(err, WhiteboardError::InvalidReference { kind: EntityKind::Sheet, .. }));
    assert_eq!(whiteboard.document(), &before);
    assert!(whiteboard.document().notebook(&other_notebook).is_some());
}

#[test]
fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let state_dir = dir.path().join("state");

    let saved = {
        let mut whiteboard = Whiteboard::new(config(), Box::new(FileStore::new(&state_dir)));
        whiteboard.poll(0.0);
        whiteboard.create_notebook();
        whiteboard.create_sheet().unwrap();
        whiteboard.poll(0.0);
        stroke(&mut whiteboard, 50.0);
        whiteboard.document().clone()
    };

    let mut reopened = Whiteboard::new(config(), Box::new(FileStore::new(&state_dir)));
    assert_eq!(reopened.document(), &saved);
    assert!(reopened.is_restore_pending());
    reopened.poll(0.0);
    assert_eq!(reopened.surface().pixel(90, 50), Some([0, 0, 0, 255]));

    // fresh ids never collide with the reloaded ones
    let id = reopened.create_notebook();
    assert_eq!(reopened.document().notebooks().len(), 3);
    assert!(saved.notebook(&id).is_none());
}

#[test]
fn test_stored_json_uses_wire_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let mut whiteboard = Whiteboard::new(config(), Box::new(store.clone()));
    stroke(&mut whiteboard, 30.0);

    let json = store.read("whiteboard-data").unwrap().expect("document written");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["currentNotebook"], DEFAULT_NOTEBOOK_ID);
    assert_eq!(value["currentSheet"], DEFAULT_SHEET_ID);
    let data = value["notebooks"][DEFAULT_NOTEBOOK_ID]["sheets"][DEFAULT_SHEET_ID]["canvasData"]
        .as_str()
        .unwrap();
    assert!(data.starts_with("data:image/png;base64,"));
}

#[test]
fn test_write_failure_keeps_session_running() {
    let mut store = MemoryStore::new();
    store.set_reject_writes(true);
    let mut whiteboard = Whiteboard::new(config(), Box::new(store));
    whiteboard.poll(0.0);

    stroke(&mut whiteboard, 30.0);
    let id = whiteboard.create_sheet().unwrap();

    assert_eq!(whiteboard.document().active_sheet_id(), id);
    let first = whiteboard
        .document()
        .active_notebook()
        .and_then(|n| n.first_sheet())
        .unwrap();
    assert!(first.canvas_data.is_some());
}

#[test]
fn test_malformed_storage_starts_fresh() {
    let store = MemoryStore::with_value("whiteboard-data", r#"{"notebooks":{},"currentNotebook":"x","currentSheet":"y"}"#);
    assert!(PersistenceGateway::new("whiteboard-data").try_load(&store).is_err());

    let whiteboard = Whiteboard::new(config(), Box::new(store));
    assert_eq!(whiteboard.document(), &Document::default());
}

#[test]
fn test_save_to_mirrors_document() {
    let mut whiteboard = Whiteboard::new(config(), Box::new(MemoryStore::new()));
    whiteboard.create_notebook();

    let mut mirror = MemoryStore::new();
    assert!(whiteboard.save_to(&mut mirror));
    let gateway = PersistenceGateway::new("whiteboard-data");
    assert_eq!(gateway.load(&mirror), *whiteboard.document());
}
