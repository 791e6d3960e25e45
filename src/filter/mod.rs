//! Request validation filter for form submissions.
//!
//! Only `application/x-www-form-urlencoded` requests with a body are
//! inspected. The body is captured once into a [`ReplayBuffer`], parsed,
//! and every parameter is checked:
//!
//! - a parameter given more than once rejects the request;
//! - `jdk`, `os` and `arch` must hold a value from the catalog;
//! - any other parameter must not contain a blocklisted substring.
//!
//! Accepted requests get the original bytes back as their body. Rejected
//! requests are aborted with `400 Bad Request` and the error page.

pub mod blocklist;
pub mod error;
pub mod error_page;
pub mod form;
pub mod request;

use std::fmt;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response, StatusCode};
use tracing::{debug, warn};

use crate::catalog::{AllowedValueCatalog, Category};
use crate::security_log;
use crate::telemetry::{self, SecurityEvent, SpanExt, ValidationSpan};

pub use blocklist::{BlockedSubstrings, Blocklist, CachedBlocklist, FileBlocklist};
pub use error::FilterError;
pub use error_page::{ErrorPageSource, FileErrorPage, StaticErrorPage};
pub use form::{FormData, FormEntry};
pub use request::{
    is_form_urlencoded, EntityStream, HttpRequestContext, ReplayBuffer, RequestContext,
    FORM_URLENCODED,
};

/// Default bound on a captured request body (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Status used for every rejection.
pub const REJECTION_STATUS: StatusCode = StatusCode::BAD_REQUEST;

/// Filter tuning.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Largest body the filter will buffer; longer bodies are rejected.
    pub max_body_bytes: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The parameter appeared `count` times.
    MultipleValues { count: usize },
    /// The value is not in the catalog for `category`.
    NotAllowed { category: Category },
    /// The value contains the blocklisted token `matched`.
    BlockedSubstring { matched: String },
    /// The body exceeded `limit` bytes.
    BodyTooLarge { limit: usize },
}

impl RejectionReason {
    /// Short label used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleValues { .. } => "multiple_values",
            Self::NotAllowed { .. } => "not_allowed",
            Self::BlockedSubstring { .. } => "blocked_substring",
            Self::BodyTooLarge { .. } => "body_too_large",
        }
    }
}

/// A rejected request: the reason and, when known, the parameter at fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub parameter: Option<String>,
    pub reason: RejectionReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let param = self.parameter.as_deref().unwrap_or("");
        match &self.reason {
            RejectionReason::MultipleValues { count } => {
                write!(f, "parameter '{}' has {} values", param, count)
            }
            RejectionReason::NotAllowed { category } => {
                write!(f, "parameter '{}' is not an allowed {} value", param, category)
            }
            RejectionReason::BlockedSubstring { matched } => {
                write!(f, "parameter '{}' contains '{}'", param, matched)
            }
            RejectionReason::BodyTooLarge { limit } => {
                write!(f, "body exceeds {} bytes", limit)
            }
        }
    }
}

/// Result of running the filter on one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(Rejection),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Validates form submissions against an allowed-value catalog and a
/// blocklist.
///
/// Holds no per-request state, so one instance can serve any number of
/// threads.
pub struct RequestValidationFilter {
    catalog: Arc<dyn AllowedValueCatalog>,
    blocklist: Arc<dyn Blocklist>,
    error_page: Arc<dyn ErrorPageSource>,
    config: FilterConfig,
}

impl RequestValidationFilter {
    pub fn new(
        catalog: Arc<dyn AllowedValueCatalog>,
        blocklist: Arc<dyn Blocklist>,
        error_page: Arc<dyn ErrorPageSource>,
        config: FilterConfig,
    ) -> Self {
        Self {
            catalog,
            blocklist,
            error_page,
            config,
        }
    }

    /// Validate `request` in place.
    ///
    /// On acceptance the body stream is replaced by one yielding the
    /// original bytes. On rejection the request is aborted with the fixed
    /// error response. Errors mean no verdict could be reached (for example
    /// the blocklist could not be loaded) and must not be treated as a pass;
    /// an inspected request that errors is aborted with the same response.
    pub fn validate(
        &self,
        request: &mut dyn RequestContext,
    ) -> Result<ValidationOutcome, FilterError> {
        let is_form = request.media_type().is_some_and(is_form_urlencoded);
        if !request.has_entity() || !is_form {
            debug!("Skipping request without form body");
            telemetry::record_skipped();
            return Ok(ValidationOutcome::Accepted);
        }

        let Some(stream) = request.take_entity_stream() else {
            telemetry::record_skipped();
            return Ok(ValidationOutcome::Accepted);
        };

        let span = ValidationSpan::new(request.media_type().unwrap_or_default());
        let _enter = span.enter();

        let result = self.inspect(request, stream);
        if result.is_err() {
            // The body stream is already consumed; never let the request continue.
            request.abort_with(self.rejection_response());
        }
        span.record_outcome(&result);
        result
    }

    fn inspect(
        &self,
        request: &mut dyn RequestContext,
        stream: EntityStream,
    ) -> Result<ValidationOutcome, FilterError> {
        let limit = self.config.max_body_bytes;
        let Some(buffer) = ReplayBuffer::capture(stream, limit).map_err(FilterError::Body)? else {
            security_log!(
                SecurityEvent::OversizedBody,
                "Form body exceeds buffer limit",
                "limit" => limit.to_string().as_str()
            );
            let rejection = Rejection {
                parameter: None,
                reason: RejectionReason::BodyTooLarge { limit },
            };
            return Ok(self.reject(request, rejection));
        };
        debug!(bytes = buffer.len(), "Buffered form body");

        let form = FormData::parse(buffer.as_bytes());
        let blocked = self.blocklist.load()?;

        for entry in form.iter() {
            if let Err(rejection) = self.check_entry(entry, &blocked) {
                return Ok(self.reject(request, rejection));
            }
        }

        request.set_entity_stream(Box::new(buffer.reader()));
        telemetry::record_accepted();
        Ok(ValidationOutcome::Accepted)
    }

    fn check_entry(&self, entry: &FormEntry, blocked: &BlockedSubstrings) -> Result<(), Rejection> {
        let key = entry.key.as_str();
        let Some(value) = entry.single_value() else {
            let count = entry.values.len();
            security_log!(
                SecurityEvent::MultiValuedParameter,
                "Parameter supplied more than once",
                "parameter" => key,
                "count" => count.to_string().as_str()
            );
            return Err(Rejection {
                parameter: Some(key.to_string()),
                reason: RejectionReason::MultipleValues { count },
            });
        };

        match Category::from_key(key) {
            Some(category) => {
                if !self.catalog.is_allowed(category, value) {
                    security_log!(
                        SecurityEvent::DisallowedCatalogValue,
                        "Parameter value not in catalog",
                        "parameter" => key
                    );
                    return Err(Rejection {
                        parameter: Some(key.to_string()),
                        reason: RejectionReason::NotAllowed { category },
                    });
                }
            }
            None => {
                if let Some(matched) = blocked.find_in(value) {
                    security_log!(
                        SecurityEvent::BlockedSubstring,
                        "Parameter value contains blocked substring",
                        "parameter" => key,
                        "matched" => matched
                    );
                    return Err(Rejection {
                        parameter: Some(key.to_string()),
                        reason: RejectionReason::BlockedSubstring {
                            matched: matched.to_string(),
                        },
                    });
                }
            }
        }
        Ok(())
    }

    fn reject(&self, request: &mut dyn RequestContext, rejection: Rejection) -> ValidationOutcome {
        request.abort_with(self.rejection_response());
        telemetry::record_rejected(rejection.reason.as_str());
        ValidationOutcome::Rejected(rejection)
    }

    /// Build the fixed rejection response. A missing error page yields an
    /// empty body instead of an error.
    pub fn rejection_response(&self) -> Response<String> {
        let page = match self.error_page.load_error_page() {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Error page unavailable, sending empty body");
                security_log!(SecurityEvent::ErrorPageUnavailable, "Error page unavailable");
                String::new()
            }
        };

        let mut response = Response::new(page);
        *response.status_mut() = REJECTION_STATUS;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        response
    }
}
