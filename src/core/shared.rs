//! Process-wide ticker instances.
//!
//! Both tickers are built lazily on first access, auto-start on their first
//! listener and are protected: `destroy` leaves them running with their
//! listeners intact, so library code cannot tear down shared infrastructure.
//! Neither has a frame source attached; drive them with `update` or attach
//! one through [`Ticker::set_frame_source`].

use std::sync::OnceLock;

use crate::config::TickerConfig;
use crate::core::Ticker;

static SHARED: OnceLock<Ticker> = OnceLock::new();
static SYSTEM: OnceLock<Ticker> = OnceLock::new();

fn protected_config(label: &str) -> TickerConfig {
    TickerConfig {
        label: Some(label.to_owned()),
        auto_start: true,
        ..TickerConfig::default()
    }
}

impl Ticker {
    /// General-purpose ticker for application code.
    pub fn shared() -> &'static Self {
        SHARED.get_or_init(|| Self::protected(&protected_config("shared")))
    }

    /// Ticker reserved for internal systems (e.g. interaction, resource
    /// housekeeping) that must keep running regardless of consumer code.
    pub fn system() -> &'static Self {
        SYSTEM.get_or_init(|| Self::protected(&protected_config("system")))
    }
}
