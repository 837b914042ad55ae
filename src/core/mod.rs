//! Core ticker abstractions: listeners, dispatch, timing and frame sources.

pub mod error;
pub mod frame_source;
pub mod listener;
pub mod priority;
pub mod shared;
pub mod ticker;
pub mod timing;

pub use error::{AppResult, TickerError};
pub use frame_source::{FrameCallback, FrameRequestId, FrameRequestIds, FrameSource};
pub use listener::{ListenerContext, ListenerFn, Tick, TickerCallback};
pub use priority::UpdatePriority;
pub use ticker::Ticker;
pub use timing::{DEFAULT_MIN_FPS, DEFAULT_TARGET_FPS};
