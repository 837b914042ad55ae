//! Runtime adapters and API surface.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_frame_source;

pub use api::{snapshot_singletons, TickerSnapshot};
#[cfg(feature = "tokio-runtime")]
pub use tokio_frame_source::TokioFrameSource;
