//! # Prometheus Ticker
//!
//! A priority-ordered per-frame callback scheduler.
//!
//! A [`Ticker`](core::Ticker) drives a recurring update loop: on every tick it
//! invokes its registered listeners from the highest priority down, handing
//! each one the elapsed time since the previous tick. Listeners are free to
//! add and remove listeners (themselves included) while a tick is being
//! dispatched; the ticker guarantees well-defined ordering under that
//! mutation.
//!
//! ## Key Features
//!
//! - **Priority Ordering**: Higher priorities run first, ties run in
//!   registration order
//! - **Mutation-Safe Dispatch**: Listeners added behind the traversal point
//!   fire in the same tick; removed listeners never fire again
//! - **One-Shot Listeners**: `add_once` listeners unregister after firing
//! - **Frame-Rate Control**: Delta clamping (`min_fps`), frame capping
//!   (`max_fps`) and time scaling (`speed`)
//! - **Pluggable Frame Sources**: Manual, dedicated-thread and tokio drivers
//! - **Protected Singletons**: `Ticker::shared()` and `Ticker::system()`
//!   cannot be destroyed by consumers
//!
//! ## Example
//!
//! ```rust
//! use prometheus_ticker::core::{Ticker, TickerCallback, UpdatePriority};
//!
//! let ticker = Ticker::new();
//! let physics = TickerCallback::new(|tick| {
//!     let _step = tick.delta_time;
//! });
//! let render = TickerCallback::new(|_| {});
//!
//! ticker
//!     .add(&render, None, UpdatePriority::Low)
//!     .add(&physics, None, UpdatePriority::High);
//!
//! ticker.update(16.0);
//! assert_eq!(ticker.count(), 2);
//!
//! ticker.remove(&render, None);
//! assert_eq!(ticker.count(), 1);
//! ```
//!
//! ## Driving a Ticker
//!
//! ```rust,ignore
//! use prometheus_ticker::builders::build_ticker;
//! use prometheus_ticker::config::{FrameSourceConfig, TickerConfig};
//!
//! // 60 fps from a dedicated frame thread
//! let ticker = build_ticker(&TickerConfig {
//!     frame_source: FrameSourceConfig::Interval { fps: 60.0 },
//!     ..TickerConfig::default()
//! })?;
//! ticker.add(&my_listener, None, UpdatePriority::Normal); // starts ticking
//! ```
//!
//! For complete examples, see:
//! - `tests/ticker_test.rs` - Dispatch ordering and mutation scenarios
//! - `tests/frame_source_test.rs` - Driven tickers

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core ticker abstractions: listeners, dispatch, timing and frame sources.
pub mod core;
/// Configuration models for tickers and frame sources.
pub mod config;
/// Builders to construct tickers from configuration.
pub mod builders;
/// Infrastructure adapters: frame-source backends.
pub mod infra;
/// Runtime adapters (tokio) and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{ListenerContext, Tick, Ticker, TickerCallback, UpdatePriority};
