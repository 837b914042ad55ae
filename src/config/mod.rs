//! Configuration models for tickers and frame sources.

pub mod ticker;

pub use ticker::{FrameSourceConfig, TickerConfig, TickerSetConfig};
