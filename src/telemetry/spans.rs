//! Span utilities for request validation.

use tracing::{info_span, Span};

use crate::filter::{FilterError, ValidationOutcome};

/// Extension trait for recording results into spans.
pub trait SpanExt {
    /// Record a generic result as `status`/`error.message`.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;

    /// Record a filter verdict as `outcome`, plus `status` and any error.
    fn record_outcome(&self, result: &Result<ValidationOutcome, FilterError>);
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }

    fn record_outcome(&self, result: &Result<ValidationOutcome, FilterError>) {
        self.record_result(result);
        match result {
            Ok(ValidationOutcome::Accepted) => {
                self.record("outcome", "accepted");
            }
            Ok(ValidationOutcome::Rejected(rejection)) => {
                self.record("outcome", "rejected");
                self.record("reason", rejection.reason.as_str());
            }
            Err(_) => {}
        }
    }
}

/// Factory for form validation spans.
pub struct ValidationSpan;

impl ValidationSpan {
    /// Create a span for one inspected request.
    ///
    /// `outcome`, `reason`, `status` and `error.message` are filled in
    /// by [`SpanExt::record_outcome`].
    pub fn new(media_type: &str) -> Span {
        info_span!(
            "form_validation",
            media_type = %media_type,
            outcome = tracing::field::Empty,
            reason = tracing::field::Empty,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }
}
