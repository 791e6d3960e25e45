// Copyright 2026 formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommands for operating formgate.
//!
//! ## Usage
//!
//! ```bash
//! formgate check 'os=linux&comment=hello'   # Run the filter on a form body
//! formgate catalog show                     # Allowed values per category
//! formgate catalog verify switches.txt      # Check a record file loads
//! formgate config show                      # Effective configuration
//! ```

pub mod catalog_cmd;
pub mod check_cmd;
pub mod config_cmd;

/// Exit code for a successful command or an accepted request.
pub const EXIT_OK: i32 = 0;
/// Exit code for a rejected request or a failed check.
pub const EXIT_REJECTED: i32 = 1;
/// Exit code for configuration and I/O errors.
pub const EXIT_CONFIG: i32 = 2;
