//! Relay metrics, recorded through the `metrics` facade and exported on
//! `/metrics` by the Prometheus recorder installed at startup.

use crate::models::RelayTarget;
use metrics::{counter, histogram};
use std::time::Duration;

/// Outcome label values for `relay_requests_total`.
pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_INVALID_INPUT: &str = "invalid_input";
pub const OUTCOME_NOT_CONFIGURED: &str = "not_configured";
pub const OUTCOME_UPSTREAM_ERROR: &str = "upstream_error";

pub fn record_relay(target: RelayTarget, outcome: &'static str) {
    counter!(
        "relay_requests_total",
        "target" => target.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_upstream_latency(target: RelayTarget, elapsed: Duration) {
    histogram!("relay_upstream_duration_seconds", "target" => target.as_str())
        .record(elapsed.as_secs_f64());
}
