// Copyright 2026 formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Catalog CLI subcommands: show, verify.
//!
//! These read record files directly; no running service is involved.

use std::path::Path;

use crate::catalog::{AllowedValues, Category, RecordStore};
use crate::cli::{EXIT_CONFIG, EXIT_OK, EXIT_REJECTED};
use crate::config::GateConfig;

/// Print the allowed values of each category from the configured catalog.
///
/// Returns exit code: 0 on success, 2 if no catalog is configured or it
/// cannot be loaded.
pub fn run_show(config: &GateConfig, json: bool) -> i32 {
    let Some(path) = &config.catalog_path else {
        eprintln!("No catalog configured. Set FORMGATE_CATALOG_PATH.");
        return EXIT_CONFIG;
    };

    let records = match RecordStore::load(path) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };
    let catalog = AllowedValues::from_records(&records);

    if json {
        println!("{}", catalog_json(&catalog));
    } else {
        print!("{}", format_catalog(&catalog));
    }
    EXIT_OK
}

/// Load a record file and report how many records it holds.
///
/// Returns exit code: 0 if every line decodes, 1 if a line is malformed,
/// 2 if the file cannot be read.
pub fn run_verify(path: &Path) -> i32 {
    match RecordStore::load(path) {
        Ok(records) => {
            println!("{}: {} record(s) OK", path.display(), records.len());
            EXIT_OK
        }
        Err(e) if e.is_malformed() => {
            eprintln!("{}: {}", path.display(), e);
            EXIT_REJECTED
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_CONFIG
        }
    }
}

/// Render the catalog as a JSON object keyed by parameter name.
pub fn catalog_json(catalog: &AllowedValues) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for category in Category::ALL {
        let values: Vec<&str> = catalog.values(category).collect();
        map.insert(category.key().to_string(), serde_json::json!(values));
    }
    serde_json::Value::Object(map)
}

/// Render the catalog as `key: value, value` lines.
pub fn format_catalog(catalog: &AllowedValues) -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let values: Vec<&str> = catalog.values(category).collect();
        let shown = if values.is_empty() {
            "(none)".to_string()
        } else {
            values.join(", ")
        };
        out.push_str(&format!("{:<5} {}\n", format!("{}:", category.key()), shown));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SwitchKind, SwitchRecord};

    fn catalog() -> AllowedValues {
        AllowedValues::new()
            .with_values(Category::Runtime, ["OpenJDK11"])
            .with_values(Category::Platform, ["linux", "macos"])
    }

    #[test]
    fn test_format_catalog() {
        let out = format_catalog(&catalog());
        assert_eq!(out, "jdk:  OpenJDK11\nos:   linux, macos\narch: (none)\n");
    }

    #[test]
    fn test_catalog_json() {
        let json = catalog_json(&catalog());
        assert_eq!(json["os"], serde_json::json!(["linux", "macos"]));
        assert_eq!(json["arch"], serde_json::json!([]));
    }

    #[test]
    fn test_verify_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switches.txt");
        std::fs::write(&path, "not a record\n").unwrap();
        assert_eq!(run_verify(&path), EXIT_REJECTED);
    }

    #[test]
    fn test_verify_accepts_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switches.txt");
        let record = SwitchRecord {
            runtime: "OpenJDK17".into(),
            platform: String::new(),
            architecture: String::new(),
            prefix: "-XX:".into(),
            name: "MaxRAMPercentage".into(),
            kind: SwitchKind::Double,
            default_value: "25.0".into(),
            availability: "product".into(),
            since: Some(10),
            description: "Maximum heap as a percentage of RAM".into(),
        };
        RecordStore::save(&path, [&record]).unwrap();
        assert_eq!(run_verify(&path), EXIT_OK);
    }

    #[test]
    fn test_verify_missing_file() {
        assert_eq!(run_verify(Path::new("/nonexistent/switches.txt")), EXIT_CONFIG);
    }

    #[test]
    fn test_show_without_catalog_path() {
        assert_eq!(run_show(&GateConfig::default(), false), EXIT_CONFIG);
    }
}
