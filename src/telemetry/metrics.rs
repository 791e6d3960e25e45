//! Request counters through the `metrics` facade.
//!
//! Nothing is exported unless the host process installs a recorder.

use metrics::{counter, describe_counter};

const REQUESTS_TOTAL: &str = "formgate_requests_total";
const REJECTIONS_TOTAL: &str = "formgate_rejections_total";
const BLOCKLIST_LOADS_TOTAL: &str = "formgate_blocklist_loads_total";

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Requests seen by the form filter, by outcome");
    describe_counter!(REJECTIONS_TOTAL, "Rejected form requests, by reason");
    describe_counter!(BLOCKLIST_LOADS_TOTAL, "Blocklist file loads, by status");
}

/// A form request passed every check.
pub fn record_accepted() {
    counter!(REQUESTS_TOTAL, "outcome" => "accepted").increment(1);
}

/// A request was not a form submission and went through uninspected.
pub fn record_skipped() {
    counter!(REQUESTS_TOTAL, "outcome" => "skipped").increment(1);
}

/// A form request was rejected for `reason`.
pub fn record_rejected(reason: &'static str) {
    counter!(REQUESTS_TOTAL, "outcome" => "rejected").increment(1);
    counter!(REJECTIONS_TOTAL, "reason" => reason).increment(1);
}

pub fn record_blocklist_load(ok: bool) {
    let status = if ok { "ok" } else { "error" };
    counter!(BLOCKLIST_LOADS_TOTAL, "status" => status).increment(1);
}
