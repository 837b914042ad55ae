//! Tests for configuration validation

use std::collections::HashMap;

use prometheus_ticker::config::{FrameSourceConfig, TickerConfig, TickerSetConfig};

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config_is_valid() {
    let cfg = TickerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.frame_source, FrameSourceConfig::External);
    assert!(cfg.auto_start);
}

#[test]
fn test_ticker_config_invalid_values() {
    let cases = [
        TickerConfig { min_fps: -1.0, ..TickerConfig::default() },
        TickerConfig { max_fps: f64::NAN, ..TickerConfig::default() },
        TickerConfig { target_fps: 0.0, ..TickerConfig::default() },
        TickerConfig { speed: -0.5, ..TickerConfig::default() },
        TickerConfig {
            frame_source: FrameSourceConfig::Interval { fps: 0.0 },
            ..TickerConfig::default()
        },
    ];
    for cfg in cases {
        assert!(cfg.validate().is_err(), "{cfg:?} should be invalid");
    }
}

#[test]
fn test_ticker_config_from_json() {
    let cfg = TickerConfig::from_json_str(
        r#"{"label": "hud", "max_fps": 30, "frame_source": {"kind": "interval", "fps": 120}}"#,
    )
    .unwrap();
    assert_eq!(cfg.label.as_deref(), Some("hud"));
    assert!((cfg.max_fps - 30.0).abs() < 1e-9);
    assert!((cfg.min_fps - 10.0).abs() < 1e-9);
    assert_eq!(cfg.frame_source, FrameSourceConfig::Interval { fps: 120.0 });
}

#[test]
fn test_ticker_config_from_json_rejects_invalid() {
    assert!(TickerConfig::from_json_str(r#"{"speed": -1}"#).is_err());
    assert!(TickerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_ticker_config_from_vars() {
    let cfg = TickerConfig::from_vars(vars(&[
        ("TICKER_LABEL", "render"),
        ("TICKER_MIN_FPS", "15"),
        ("TICKER_SPEED", " 0.5 "),
        ("TICKER_AUTO_START", "false"),
        ("TICKER_FRAME_SOURCE", "Interval"),
        ("TICKER_FRAME_FPS", "30"),
    ]))
    .unwrap();
    assert_eq!(cfg.label.as_deref(), Some("render"));
    assert!((cfg.min_fps - 15.0).abs() < 1e-9);
    assert!((cfg.speed - 0.5).abs() < 1e-9);
    assert!(!cfg.auto_start);
    assert_eq!(cfg.frame_source, FrameSourceConfig::Interval { fps: 30.0 });
}

#[test]
fn test_ticker_config_from_vars_defaults() {
    let cfg = TickerConfig::from_vars(vars(&[])).unwrap();
    assert_eq!(cfg, TickerConfig::default());
}

#[test]
fn test_ticker_config_from_vars_errors() {
    assert!(TickerConfig::from_vars(vars(&[("TICKER_MAX_FPS", "fast")])).is_err());
    assert!(TickerConfig::from_vars(vars(&[("TICKER_FRAME_SOURCE", "vsync")])).is_err());
    assert!(TickerConfig::from_vars(vars(&[("TICKER_TARGET_FPS", "0")])).is_err());
}

#[test]
fn test_ticker_set_config_validation() {
    let mut tickers = HashMap::new();
    tickers.insert("main".to_string(), TickerConfig::default());
    let cfg = TickerSetConfig { tickers };
    assert!(cfg.validate().is_ok());

    let mut tickers = HashMap::new();
    tickers.insert(
        "broken".to_string(),
        TickerConfig { speed: f64::INFINITY, ..TickerConfig::default() },
    );
    let err = TickerSetConfig { tickers }.validate().unwrap_err();
    assert!(err.contains("broken"));
}

#[test]
fn test_ticker_set_config_from_json() {
    let cfg = TickerSetConfig::from_json_str(
        r#"{"tickers": {"a": {}, "b": {"frame_source": {"kind": "tokio", "fps": 60}}}}"#,
    )
    .unwrap();
    assert_eq!(cfg.tickers.len(), 2);
    assert_eq!(cfg.tickers["b"].frame_source, FrameSourceConfig::Tokio { fps: 60.0 });
}
