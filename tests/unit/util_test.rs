//! Tests for utility functions

use prometheus_ticker::util::clock::now_ms;
use prometheus_ticker::util::telemetry::init_tracing;

#[test]
fn test_clock_is_monotonic() {
    let a = now_ms();
    let b = now_ms();
    assert!(a >= 0.0);
    assert!(b >= a);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::debug!("subscriber installed");
}
