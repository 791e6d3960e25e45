//! Record file persistence tests.

use std::fs;

use formgate::catalog::{
    AllowedValueCatalog, AllowedValues, CatalogError, Category, RecordStore, SwitchKind,
    SwitchRecord,
};
use tempfile::TempDir;

fn record(runtime: &str, platform: &str, architecture: &str, name: &str) -> SwitchRecord {
    SwitchRecord {
        runtime: runtime.to_string(),
        platform: platform.to_string(),
        architecture: architecture.to_string(),
        prefix: "-XX:".to_string(),
        name: name.to_string(),
        kind: SwitchKind::Intx,
        default_value: "0".to_string(),
        availability: "product".to_string(),
        since: None,
        description: format!("{} description", name),
    }
}

fn sample_records() -> Vec<SwitchRecord> {
    vec![
        record("OpenJDK11", "linux", "x86_64", "MaxInlineSize"),
        record("OpenJDK11", "windows", "", "UseLargePages"),
        record("OpenJDK17", "", "aarch64", "UseSVE"),
        record("OpenJDK8", "macos", "x86_64", "CICompilerCount"),
    ]
}

// =============================================================================
// Save / Load
// =============================================================================

#[test]
fn load_returns_saved_records_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("switches.txt");
    let records = sample_records();

    RecordStore::save(&path, &records).unwrap();
    let loaded = RecordStore::load(&path).unwrap();

    assert_eq!(loaded, records);
}

#[test]
fn save_then_load_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");

    RecordStore::save(&first, &sample_records()).unwrap();
    let loaded = RecordStore::load(&first).unwrap();
    RecordStore::save(&second, &loaded).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn save_writes_one_line_per_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("switches.txt");
    let mut records = sample_records();
    records[0].description = "spans\ntwo lines".to_string();

    RecordStore::save(&path, &records).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), records.len());
    assert!(content.ends_with('\n'));
}

#[test]
fn save_replaces_existing_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("switches.txt");

    RecordStore::save(&path, &sample_records()).unwrap();
    RecordStore::save(&path, &sample_records()[..1]).unwrap();

    assert_eq!(RecordStore::load(&path).unwrap().len(), 1);
}

#[test]
fn load_empty_file_yields_no_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    assert!(RecordStore::load(&path).unwrap().is_empty());
}

#[test]
fn load_accepts_crlf_line_endings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crlf.txt");
    let records = sample_records();
    let content: String = records
        .iter()
        .map(|r| format!("{}\r\n", r.to_line()))
        .collect();
    fs::write(&path, content).unwrap();

    assert_eq!(RecordStore::load(&path).unwrap(), records);
}

#[test]
fn load_accepts_missing_final_newline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_newline.txt");
    let records = sample_records();
    let content = records
        .iter()
        .map(SwitchRecord::to_line)
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(&path, content).unwrap();

    assert_eq!(RecordStore::load(&path).unwrap(), records);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does_not_exist.txt");

    match RecordStore::load(&path) {
        Err(CatalogError::Io { path: err_path, .. }) => assert_eq!(err_path, path),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn load_aborts_on_malformed_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.txt");
    let records = sample_records();
    let content = format!(
        "{}\nnot a record\n{}\n",
        records[0].to_line(),
        records[1].to_line()
    );
    fs::write(&path, content).unwrap();

    let err = RecordStore::load(&path).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("expected 10 fields, found 1"));
}

#[test]
fn load_rejects_blank_interior_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.txt");
    let records = sample_records();
    let content = format!("{}\n\n{}\n", records[0].to_line(), records[1].to_line());
    fs::write(&path, content).unwrap();

    assert!(RecordStore::load(&path).unwrap_err().is_malformed());
}

#[test]
fn save_into_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("switches.txt");

    let err = RecordStore::save(&path, &sample_records()).unwrap_err();
    assert!(!err.is_malformed());
}

// =============================================================================
// Catalog assembly
// =============================================================================

#[test]
fn loaded_records_seed_the_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("switches.txt");
    RecordStore::save(&path, &sample_records()).unwrap();

    let catalog = AllowedValues::from_records(&RecordStore::load(&path).unwrap());

    assert_eq!(
        catalog.runtimes().collect::<Vec<_>>(),
        vec!["OpenJDK11", "OpenJDK17", "OpenJDK8"]
    );
    assert_eq!(
        catalog.platforms().collect::<Vec<_>>(),
        vec!["linux", "macos", "windows"]
    );
    assert_eq!(
        catalog.architectures().collect::<Vec<_>>(),
        vec!["aarch64", "x86_64"]
    );
    assert!(!catalog.is_allowed(Category::Platform, ""));
    assert!(catalog.is_allowed(Category::Architecture, "aarch64"));
}
