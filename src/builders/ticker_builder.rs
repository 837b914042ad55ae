//! Builders to construct tickers and their frame sources from configuration.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::{FrameSourceConfig, TickerConfig, TickerSetConfig};
use crate::core::{FrameSource, Ticker, TickerError};

/// Instantiate the frame source described by `cfg`.
///
/// Returns `None` for [`FrameSourceConfig::External`].
///
/// # Errors
///
/// - `TickerError::Io` if the interval thread cannot be spawned
/// - `TickerError::FrameSource` if a tokio source is requested outside a
///   tokio runtime, or without the `tokio-runtime` feature
pub fn build_frame_source(
    cfg: &FrameSourceConfig,
) -> Result<Option<Arc<dyn FrameSource>>, TickerError> {
    match cfg {
        FrameSourceConfig::External => Ok(None),
        #[cfg(not(target_arch = "wasm32"))]
        FrameSourceConfig::Interval { fps } => {
            let source: Arc<dyn FrameSource> =
                Arc::new(crate::infra::IntervalFrameSource::spawn(*fps)?);
            Ok(Some(source))
        }
        #[cfg(target_arch = "wasm32")]
        FrameSourceConfig::Interval { .. } => Err(TickerError::FrameSource(
            "interval frame source requires native threads".into(),
        )),
        #[cfg(feature = "tokio-runtime")]
        FrameSourceConfig::Tokio { fps } => {
            let source: Arc<dyn FrameSource> =
                Arc::new(crate::runtime::TokioFrameSource::current(*fps)?);
            Ok(Some(source))
        }
        #[cfg(not(feature = "tokio-runtime"))]
        FrameSourceConfig::Tokio { .. } => Err(TickerError::FrameSource(
            "tokio frame source requires the `tokio-runtime` feature".into(),
        )),
    }
}

/// Validate `cfg` and build a stopped ticker with its frame source attached.
///
/// # Errors
///
/// Returns `TickerError::InvalidConfig` for invalid values, or any error from
/// [`build_frame_source`].
pub fn build_ticker(cfg: &TickerConfig) -> Result<Ticker, TickerError> {
    cfg.validate().map_err(TickerError::InvalidConfig)?;

    let ticker = Ticker::with_config(cfg);
    ticker.set_frame_source(build_frame_source(&cfg.frame_source)?);
    debug!(
        ticker = %ticker.id(),
        label = %ticker.label(),
        frame_source = ?cfg.frame_source,
        "ticker built from config"
    );
    Ok(ticker)
}

/// Build every ticker in `cfg`, labelling unlabelled ones with their name.
///
/// # Errors
///
/// Fails on the first invalid ticker or frame source.
pub fn build_tickers(cfg: &TickerSetConfig) -> Result<HashMap<String, Ticker>, TickerError> {
    cfg.validate().map_err(TickerError::InvalidConfig)?;

    let mut tickers = HashMap::with_capacity(cfg.tickers.len());
    for (name, ticker_cfg) in &cfg.tickers {
        let mut ticker_cfg = ticker_cfg.clone();
        if ticker_cfg.label.is_none() {
            ticker_cfg.label = Some(name.clone());
        }
        tickers.insert(name.clone(), build_ticker(&ticker_cfg)?);
    }
    Ok(tickers)
}
