// Copyright 2026 formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! `check` subcommand: run the configured filter on one form body.

use crate::cli::{EXIT_CONFIG, EXIT_OK, EXIT_REJECTED};
use crate::config::GateConfig;
use crate::filter::{HttpRequestContext, ValidationOutcome, FORM_URLENCODED};
use crate::Gate;

/// Run `check`, printing the verdict to stdout.
///
/// Returns exit code: 0 accepted, 1 rejected, 2 configuration or I/O error.
pub fn run_check(config: &GateConfig, body: &str, content_type: Option<&str>) -> i32 {
    let gate = match Gate::from_config(config) {
        Ok(gate) => gate,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };

    let content_type = content_type.unwrap_or(FORM_URLENCODED);
    let mut request = match HttpRequestContext::from_bytes(Some(content_type), body.to_string()) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: invalid content type '{}': {}", content_type, e);
            return EXIT_CONFIG;
        }
    };

    match gate.filter.validate(&mut request) {
        Ok(outcome) => {
            println!("{}", describe_outcome(&outcome));
            if outcome.is_accepted() {
                EXIT_OK
            } else {
                EXIT_REJECTED
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_configuration() {
                eprintln!("Set FORMGATE_BLOCKLIST_PATH to the blocklist file.");
            }
            EXIT_CONFIG
        }
    }
}

/// One-line verdict.
pub fn describe_outcome(outcome: &ValidationOutcome) -> String {
    match outcome {
        ValidationOutcome::Accepted => "ACCEPTED".to_string(),
        ValidationOutcome::Rejected(rejection) => format!("REJECTED: {}", rejection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::filter::{Rejection, RejectionReason};

    #[test]
    fn test_describe_accepted() {
        assert_eq!(describe_outcome(&ValidationOutcome::Accepted), "ACCEPTED");
    }

    #[test]
    fn test_describe_rejected() {
        let outcome = ValidationOutcome::Rejected(Rejection {
            parameter: Some("arch".into()),
            reason: RejectionReason::NotAllowed {
                category: Category::Architecture,
            },
        });
        assert_eq!(
            describe_outcome(&outcome),
            "REJECTED: parameter 'arch' is not an allowed arch value"
        );
    }

    #[test]
    fn test_check_without_blocklist_is_config_error() {
        let config = GateConfig::default();
        assert_eq!(run_check(&config, "comment=hi", None), EXIT_CONFIG);
    }

    #[test]
    fn test_check_non_form_body_is_accepted() {
        let config = GateConfig::default();
        assert_eq!(run_check(&config, "{}", Some("application/json")), EXIT_OK);
    }

    #[test]
    fn test_check_rejects_blocked_comment() {
        let dir = tempfile::tempdir().unwrap();
        let blocklist = dir.path().join("badwords.csv");
        std::fs::write(&blocklist, "xyzzy,foo").unwrap();
        let config = GateConfig {
            blocklist_path: Some(blocklist),
            ..GateConfig::default()
        };
        assert_eq!(run_check(&config, "comment=tell+me+XYZZY+now", None), EXIT_REJECTED);
        assert_eq!(run_check(&config, "comment=hello", None), EXIT_OK);
    }
}
