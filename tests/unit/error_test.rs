//! Tests for error types

use prometheus_ticker::core::{AppResult, TickerError};

#[test]
fn test_invalid_config_error() {
    let err = TickerError::InvalidConfig("speed must be a non-negative number".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid config: speed must be a non-negative number"
    );
}

#[test]
fn test_frame_source_error() {
    let err = TickerError::FrameSource("no tokio runtime".to_string());
    assert_eq!(format!("{}", err), "frame source error: no tokio runtime");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::other("spawn failed");
    let err: TickerError = io.into();
    assert!(matches!(err, TickerError::Io(_)));
    assert_eq!(format!("{}", err), "io error: spawn failed");
}

#[test]
fn test_app_result_wraps_ticker_error() {
    fn fails() -> AppResult<()> {
        Err::<(), _>(TickerError::InvalidConfig("bad".into()))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(err.downcast_ref::<TickerError>().is_some());
}
