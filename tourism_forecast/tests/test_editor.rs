use std::fs;
use tempfile::TempDir;
use tourism_forecast::editor::{DataEditor, EditStatus};
use tourism_forecast::store::{CsvDatasetStore, DatasetStore};

const SAMPLE: &str = "Bulan,Jumlah Wisatawan\n2024-01,1000\n2024-02,1100\n";

fn create_editor() -> (TempDir, DataEditor<CsvDatasetStore>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Data_Wisata.csv");
    fs::write(&path, SAMPLE).unwrap();
    (dir, DataEditor::new(CsvDatasetStore::new(path)))
}

#[test]
fn test_current_is_idle() {
    let (_dir, editor) = create_editor();
    let outcome = editor.current();

    assert_eq!(outcome.status, EditStatus::Idle);
    assert_eq!(outcome.dataset.map(|d| d.len()), Some(2));
}

#[test]
fn test_add_success() {
    let (_dir, editor) = create_editor();
    let outcome = editor.add("2024-03", "1.250");

    assert!(outcome.is_success());
    let dataset = outcome.dataset.unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.observations()[2].value, Some(1250.0));
}

#[test]
fn test_add_failure_keeps_table() {
    let (_dir, editor) = create_editor();
    let outcome = editor.add("March 2024", "1250");

    match &outcome.status {
        EditStatus::Failure(msg) => assert!(!msg.contains('\n')),
        other => panic!("Expected failure, got {:?}", other),
    }
    assert_eq!(outcome.dataset.map(|d| d.len()), Some(2));
    assert_eq!(editor.store().load().unwrap().len(), 2);
}

#[test]
fn test_delete_success() {
    let (_dir, editor) = create_editor();
    let outcome = editor.delete("0");

    assert!(outcome.is_success());
    let dataset = outcome.dataset.unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.observations()[0].period, "2024-02");
}

#[test]
fn test_delete_rejects_bad_index() {
    let (_dir, editor) = create_editor();

    for raw in ["2", "-1", "one", "1.5"] {
        let outcome = editor.delete(raw);
        assert!(!outcome.is_success(), "index {:?} should be rejected", raw);
        assert_eq!(outcome.dataset.as_ref().map(|d| d.len()), Some(2));
    }
    assert_eq!(editor.store().load().unwrap().len(), 2);
}

#[test]
fn test_missing_file_reports_failure() {
    let dir = TempDir::new().unwrap();
    let editor = DataEditor::new(CsvDatasetStore::new(dir.path().join("none.csv")));

    let outcome = editor.add("2024-03", "10");
    assert!(matches!(outcome.status, EditStatus::Failure(_)));
    assert!(outcome.dataset.is_none());
}
