//! Telemetry for formgate.
//!
//! Structured logging, security event records, validation spans and
//! request counters.

mod logging;
mod metrics;
pub mod security_log;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use self::metrics::{
    describe_metrics, record_accepted, record_blocklist_load, record_rejected, record_skipped,
};
pub use security_log::{log_security_event, SecurityEvent, SecuritySeverity};
pub use spans::{SpanExt, ValidationSpan};
