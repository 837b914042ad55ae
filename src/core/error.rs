//! Error types for ticker construction and configuration.
//!
//! The per-frame API (`add`, `remove`, `update`, `start`, `stop`, `destroy`)
//! never fails; these errors only surface while wiring tickers together.

use thiserror::Error;

/// Errors produced while building tickers and their frame sources.
#[derive(Debug, Error)]
pub enum TickerError {
    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Frame source could not be created or attached.
    #[error("frame source error: {0}")]
    FrameSource(String),
    /// Underlying OS failure (e.g. spawning the frame thread).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
