//! Ticker and frame-source configuration structures.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AppResult, DEFAULT_MIN_FPS, DEFAULT_TARGET_FPS};

/// Frame source selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FrameSourceConfig {
    /// No frame source; the application calls `update` itself or attaches a
    /// source later.
    #[default]
    External,
    /// Dedicated OS thread firing frames at a fixed rate.
    Interval {
        /// Frames per second.
        fps: f64,
    },
    /// Tokio timer tasks on the ambient runtime (`tokio-runtime` feature).
    Tokio {
        /// Frames per second.
        fps: f64,
    },
}

/// Ticker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Label used in logs and snapshots.
    pub label: Option<String>,
    /// Deltas are clamped to `1000 / min_fps` ms; `0` disables the clamp.
    pub min_fps: f64,
    /// Frame-rate cap; `0` means uncapped.
    pub max_fps: f64,
    /// Frame rate at which `delta_time` equals `1.0`.
    pub target_fps: f64,
    /// Delta scale factor.
    pub speed: f64,
    /// Start the ticker when the first listener is added.
    pub auto_start: bool,
    /// Frame source driving the ticker.
    pub frame_source: FrameSourceConfig,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            label: None,
            min_fps: DEFAULT_MIN_FPS,
            max_fps: 0.0,
            target_fps: DEFAULT_TARGET_FPS,
            speed: 1.0,
            auto_start: true,
            frame_source: FrameSourceConfig::External,
        }
    }
}

/// Named tickers for applications running several loops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickerSetConfig {
    /// Map of ticker name to configuration.
    pub tickers: HashMap<String, TickerConfig>,
}

impl FrameSourceConfig {
    /// Validate frame source values.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::External => Ok(()),
            Self::Interval { fps } | Self::Tokio { fps } => {
                if fps.is_finite() && *fps > 0.0 {
                    Ok(())
                } else {
                    Err(format!("frame source fps must be a positive number, got {fps}"))
                }
            }
        }
    }
}

impl TickerConfig {
    /// Validate ticker configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_fps.is_finite() || self.min_fps < 0.0 {
            return Err("min_fps must be a non-negative number".into());
        }
        if !self.max_fps.is_finite() || self.max_fps < 0.0 {
            return Err("max_fps must be a non-negative number".into());
        }
        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err("target_fps must be greater than 0".into());
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err("speed must be a non-negative number".into());
        }
        self.frame_source.validate()
    }

    /// Parse ticker configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from `TICKER_*` environment variables, reading a
    /// `.env` file first when one is present.
    ///
    /// A missing `.env` is fine; an unreadable or malformed one is an error.
    pub fn from_env() -> AppResult<Self> {
        dotenv_loaded(dotenvy::dotenv())?;
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup, starting from defaults.
    ///
    /// Recognized keys: `TICKER_LABEL`, `TICKER_MIN_FPS`, `TICKER_MAX_FPS`,
    /// `TICKER_TARGET_FPS`, `TICKER_SPEED`, `TICKER_AUTO_START`,
    /// `TICKER_FRAME_SOURCE` (`external`, `interval`, `tokio`) and
    /// `TICKER_FRAME_FPS` (defaults to 60).
    pub fn from_vars<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(label) = lookup("TICKER_LABEL") {
            cfg.label = Some(label);
        }
        if let Some(v) = parse_var(&lookup, "TICKER_MIN_FPS")? {
            cfg.min_fps = v;
        }
        if let Some(v) = parse_var(&lookup, "TICKER_MAX_FPS")? {
            cfg.max_fps = v;
        }
        if let Some(v) = parse_var(&lookup, "TICKER_TARGET_FPS")? {
            cfg.target_fps = v;
        }
        if let Some(v) = parse_var(&lookup, "TICKER_SPEED")? {
            cfg.speed = v;
        }
        if let Some(v) = parse_var(&lookup, "TICKER_AUTO_START")? {
            cfg.auto_start = v;
        }

        let fps = parse_var(&lookup, "TICKER_FRAME_FPS")?.unwrap_or(DEFAULT_TARGET_FPS);
        if let Some(kind) = lookup("TICKER_FRAME_SOURCE") {
            cfg.frame_source = match kind.trim().to_ascii_lowercase().as_str() {
                "external" | "none" => FrameSourceConfig::External,
                "interval" => FrameSourceConfig::Interval { fps },
                "tokio" => FrameSourceConfig::Tokio { fps },
                other => anyhow::bail!("TICKER_FRAME_SOURCE: unknown frame source `{other}`"),
            };
        }

        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

fn dotenv_loaded(result: Result<PathBuf, dotenvy::Error>) -> AppResult<()> {
    match result {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(anyhow::Error::new(e).context("cannot load .env file")),
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key}: cannot parse `{raw}`"))
        })
        .transpose()
}

impl TickerSetConfig {
    /// Validate all tickers and ensure at least one exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.tickers.is_empty() {
            return Err("at least one ticker must be defined".into());
        }
        for (name, ticker) in &self.tickers {
            ticker
                .validate()
                .map_err(|e| format!("ticker `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse a ticker set from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
