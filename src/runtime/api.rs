//! API-facing response models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Ticker;

/// Point-in-time view of a ticker, suitable for status endpoints and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    /// Ticker identifier.
    pub id: Uuid,
    /// Ticker label.
    pub label: String,
    /// Whether `destroy` is inert.
    pub protected: bool,
    /// Running flag.
    pub started: bool,
    /// Active listener count.
    pub count: usize,
    /// Frames per second implied by the last tick.
    pub fps: f64,
    /// Last delta in frame units.
    pub delta_time: f64,
    /// Last delta in milliseconds.
    pub delta_ms: f64,
    /// Last raw elapsed milliseconds.
    pub elapsed_ms: f64,
    /// Timestamp of the last tick.
    pub last_time: f64,
    /// Delta scale factor.
    pub speed: f64,
    /// Lower frame-rate bound.
    pub min_fps: f64,
    /// Frame-rate cap (0 when uncapped).
    pub max_fps: f64,
}

/// Snapshots of the shared and system tickers, in that order.
pub fn snapshot_singletons() -> Vec<TickerSnapshot> {
    vec![Ticker::shared().snapshot(), Ticker::system().snapshot()]
}
