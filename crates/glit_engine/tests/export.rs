use std::fs;

use glit_core::{HarvestReport, HarvestResult};
use glit_engine::{
    ensure_output_dir, export_report, read_report, write_atomic, AtomicFileWriter, ExportError,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn report() -> HarvestReport {
    vec![
        HarvestResult::new(
            "alpha",
            vec!["z@a.com".to_string(), "a@a.com".to_string(), "z@a.com".to_string()],
        ),
        HarvestResult::empty("beta"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn exported_report_reads_back_equal() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("report.json");

    let written = export_report(&path, &report()).unwrap();
    assert_eq!(written, path);
    assert_eq!(read_report(&path).unwrap(), report());
}

#[test]
fn export_format_is_array_of_repository_and_emails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("report.json");
    export_report(&path, &report()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"repository": "alpha", "emails": ["z@a.com", "a@a.com", "z@a.com"]},
            {"repository": "beta", "emails": []}
        ])
    );
}

#[test]
fn export_into_file_parent_fails_without_partial_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let err = export_report(&blocker.join("report.json"), &report()).unwrap_err();
    assert!(matches!(err, ExportError::Persist { .. }), "{err:?}");
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[test]
fn reading_garbage_is_a_serialize_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.json");
    fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        read_report(&path).unwrap_err(),
        ExportError::Serialize { .. }
    ));
    assert!(matches!(
        read_report(&temp.path().join("missing.json")).unwrap_err(),
        ExportError::Io { .. }
    ));
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out").join("deeper");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("report.json", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "report.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = write_atomic(&first, "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");

    let leftovers = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}
