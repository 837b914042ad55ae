//! Tests for builder modules

use prometheus_ticker::builders::{build_frame_source, build_ticker, build_tickers};
use prometheus_ticker::config::{FrameSourceConfig, TickerConfig, TickerSetConfig};
use prometheus_ticker::core::TickerError;

#[test]
fn test_build_ticker_defaults() {
    let ticker = build_ticker(&TickerConfig::default()).unwrap();
    assert!(!ticker.started());
    assert_eq!(ticker.count(), 0);
    assert!((ticker.min_fps() - 10.0).abs() < 1e-9);
    assert!((ticker.speed() - 1.0).abs() < 1e-9);
    assert!(ticker.auto_start());
}

#[test]
fn test_build_ticker_applies_config() {
    let ticker = build_ticker(&TickerConfig {
        label: Some("ui".into()),
        min_fps: 20.0,
        max_fps: 30.0,
        speed: 0.25,
        auto_start: false,
        ..TickerConfig::default()
    })
    .unwrap();
    assert_eq!(ticker.label(), "ui");
    assert!((ticker.min_fps() - 20.0).abs() < 1e-9);
    assert!((ticker.max_fps() - 30.0).abs() < 1e-9);
    assert!((ticker.speed() - 0.25).abs() < 1e-9);
    assert!(!ticker.auto_start());
}

#[test]
fn test_build_ticker_rejects_invalid_config() {
    let err = build_ticker(&TickerConfig {
        target_fps: 0.0,
        ..TickerConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, TickerError::InvalidConfig(_)));
}

#[test]
fn test_external_frame_source_is_none() {
    assert!(build_frame_source(&FrameSourceConfig::External)
        .unwrap()
        .is_none());
}

#[test]
fn test_tokio_frame_source_outside_runtime_fails() {
    let err = build_frame_source(&FrameSourceConfig::Tokio { fps: 60.0 }).err();
    assert!(matches!(err, Some(TickerError::FrameSource(_))));
}

#[test]
fn test_build_tickers_requires_entries() {
    assert!(build_tickers(&TickerSetConfig::default()).is_err());
}
