// Copyright 2026 formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, validate.

use crate::cli::{EXIT_OK, EXIT_REJECTED};
use crate::config::{EffectiveConfig, GateConfig};

/// Print effective config as key-value pairs to stdout.
pub fn run_show(config: &GateConfig) {
    print!("{}", format_config(&config.effective_config()));
}

/// Check the configuration for settings that would fail at request time.
///
/// Returns 0 if valid, 1 if any warnings are found.
pub fn run_validate(config: &GateConfig) -> i32 {
    let warnings = collect_warnings(config);
    for warning in &warnings {
        eprintln!("WARNING: {}", warning);
    }
    if warnings.is_empty() {
        println!("Configuration is valid.");
        EXIT_OK
    } else {
        EXIT_REJECTED
    }
}

/// Problems that would make the filter fail or misbehave.
pub fn collect_warnings(config: &GateConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    match &config.blocklist_path {
        None => warnings.push(
            "FORMGATE_BLOCKLIST_PATH is not set; every form request will fail validation"
                .to_string(),
        ),
        Some(path) if !path.is_file() => warnings.push(format!(
            "blocklist file {} does not exist",
            path.display()
        )),
        Some(_) => {}
    }

    match &config.catalog_path {
        None => warnings.push(
            "FORMGATE_CATALOG_PATH is not set; jdk, os and arch parameters will always be rejected"
                .to_string(),
        ),
        Some(path) if !path.is_file() => warnings.push(format!(
            "catalog file {} does not exist",
            path.display()
        )),
        Some(_) => {}
    }

    if let Some(path) = &config.error_page_path {
        if !path.is_file() {
            warnings.push(format!(
                "error page {} does not exist; rejections will have an empty body",
                path.display()
            ));
        }
    }

    warnings
}

fn display_opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Render the effective config as `VARIABLE=value` lines.
pub fn format_config(cfg: &EffectiveConfig) -> String {
    format!(
        "FORMGATE_BLOCKLIST_PATH={}\n\
         FORMGATE_CATALOG_PATH={}\n\
         FORMGATE_ERROR_PAGE_PATH={}\n\
         FORMGATE_MAX_BODY_BYTES={}\n\
         FORMGATE_BLOCKLIST_CACHE_SECS={}\n\
         FORMGATE_LOG_LEVEL={}\n\
         FORMGATE_LOG_FORMAT={}\n",
        display_opt(&cfg.blocklist_path),
        display_opt(&cfg.catalog_path),
        display_opt(&cfg.error_page_path),
        cfg.max_body_bytes,
        cfg.blocklist_cache_secs,
        cfg.log_level,
        cfg.log_format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_warns_about_missing_paths() {
        let warnings = collect_warnings(&GateConfig::default());
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("FORMGATE_BLOCKLIST_PATH"));
        assert!(warnings[1].contains("FORMGATE_CATALOG_PATH"));
    }

    #[test]
    fn test_existing_files_pass_validation() {
        let dir = tempfile::tempdir().unwrap();
        let blocklist = dir.path().join("badwords.csv");
        let catalog = dir.path().join("switches.txt");
        std::fs::write(&blocklist, "xyzzy").unwrap();
        std::fs::write(&catalog, "").unwrap();

        let config = GateConfig {
            blocklist_path: Some(blocklist),
            catalog_path: Some(catalog),
            ..GateConfig::default()
        };
        assert!(collect_warnings(&config).is_empty());
        assert_eq!(run_validate(&config), EXIT_OK);
    }

    #[test]
    fn test_missing_error_page_warns() {
        let config = GateConfig {
            error_page_path: Some("/nonexistent/error.html".into()),
            ..GateConfig::default()
        };
        assert!(collect_warnings(&config)
            .iter()
            .any(|w| w.contains("error page")));
    }

    #[test]
    fn test_format_config_lists_every_variable() {
        let out = format_config(&GateConfig::default().effective_config());
        assert_eq!(out.lines().count(), 7);
        assert!(out.contains("FORMGATE_BLOCKLIST_PATH=\n"));
        assert!(out.contains("FORMGATE_MAX_BODY_BYTES=2097152\n"));
        assert!(out.contains("FORMGATE_LOG_FORMAT=json\n"));
    }
}
