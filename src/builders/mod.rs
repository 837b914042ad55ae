//! Builders to construct tickers from configuration.

pub mod ticker_builder;

pub use ticker_builder::{build_frame_source, build_ticker, build_tickers};
