//! Security event logging for the request filter.
//!
//! Records name the offending parameter and, for blocklist hits, the
//! matched token. Parameter values are never logged.

use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

/// Security event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    /// A form parameter was supplied more than once.
    MultiValuedParameter,
    /// A catalog parameter carried a value outside its allowed set.
    DisallowedCatalogValue,
    /// A free-form parameter contained a blocklisted substring.
    BlockedSubstring,
    /// A form body was larger than the replay buffer allows.
    OversizedBody,
    /// The blocklist could not be loaded.
    BlocklistUnavailable,
    /// The error page could not be loaded for a rejection.
    ErrorPageUnavailable,
}

impl SecurityEvent {
    pub fn severity(&self) -> SecuritySeverity {
        match self {
            Self::MultiValuedParameter => SecuritySeverity::Warning,
            Self::DisallowedCatalogValue => SecuritySeverity::Warning,
            Self::BlockedSubstring => SecuritySeverity::Warning,
            Self::OversizedBody => SecuritySeverity::Warning,
            Self::BlocklistUnavailable => SecuritySeverity::Critical,
            Self::ErrorPageUnavailable => SecuritySeverity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultiValuedParameter => "multi_valued_parameter",
            Self::DisallowedCatalogValue => "disallowed_catalog_value",
            Self::BlockedSubstring => "blocked_substring",
            Self::OversizedBody => "oversized_body",
            Self::BlocklistUnavailable => "blocklist_unavailable",
            Self::ErrorPageUnavailable => "error_page_unavailable",
        }
    }
}

/// Severity levels for security events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SecuritySeverity {
    Info,
    Warning,
    Critical,
}

impl SecuritySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Escape control characters so request-supplied detail values stay on
/// one line.
fn escape_detail(value: &str) -> Cow<'_, str> {
    if !value.chars().any(char::is_control) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Render the log line for an event; split out so it can be tested.
pub(crate) fn format_event(
    timestamp: u64,
    event: SecurityEvent,
    message: &str,
    details: &[(&str, &str)],
) -> String {
    let details_str = details
        .iter()
        .map(|(k, v)| format!("{}={}", k, escape_detail(v)))
        .collect::<Vec<_>>()
        .join(" ");

    if details_str.is_empty() {
        format!(
            "[{}] SECURITY {} {}: {}",
            timestamp,
            event.severity().as_str(),
            event.as_str(),
            message
        )
    } else {
        format!(
            "[{}] SECURITY {} {}: {} | {}",
            timestamp,
            event.severity().as_str(),
            event.as_str(),
            message,
            details_str
        )
    }
}

/// Log a security event with structured details.
///
/// # Example
/// ```
/// use formgate::telemetry::{log_security_event, SecurityEvent};
///
/// log_security_event(
///     SecurityEvent::BlockedSubstring,
///     "Parameter value contains blocked substring",
///     &[("parameter", "comment"), ("matched", "xyzzy")]
/// );
/// ```
pub fn log_security_event(event: SecurityEvent, message: &str, details: &[(&str, &str)]) {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let log_line = format_event(timestamp, event, message, details);

    match event.severity() {
        SecuritySeverity::Info => tracing::info!(event = event.as_str(), "{}", log_line),
        SecuritySeverity::Warning => tracing::warn!(event = event.as_str(), "{}", log_line),
        SecuritySeverity::Critical => tracing::error!(event = event.as_str(), "{}", log_line),
    }
}

/// Convenience macro for logging security events.
#[macro_export]
macro_rules! security_log {
    ($event:expr, $message:expr) => {
        $crate::telemetry::security_log::log_security_event($event, $message, &[])
    };
    ($event:expr, $message:expr, $($key:expr => $value:expr),+) => {
        $crate::telemetry::security_log::log_security_event(
            $event,
            $message,
            &[$(($key, $value)),+]
        )
    };
}
