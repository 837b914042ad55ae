//! Frame-timing source abstraction.
//!
//! A frame source is the "next frame" primitive a ticker subscribes to when it
//! drives itself: one request yields at most one callback carrying the frame
//! timestamp, and the ticker re-requests after each frame it handles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of an outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRequestId(pub u64);

/// Callback invoked once per fired request with the request id and the frame
/// timestamp in milliseconds.
pub type FrameCallback = Arc<dyn Fn(FrameRequestId, f64) + Send + Sync>;

/// Source of frame callbacks.
///
/// Implementations must never invoke the callback synchronously from inside
/// [`FrameSource::request_frame`]; the requester may be holding its own state
/// lock while subscribing.
pub trait FrameSource: Send + Sync {
    /// Subscribe `callback` to the next frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Drop a pending request. Unknown or already fired ids are ignored.
    fn cancel_frame(&self, id: FrameRequestId);

    /// Current time on this source's clock, in milliseconds.
    fn now(&self) -> f64 {
        crate::util::clock::now_ms()
    }
}

/// Monotonic allocator for [`FrameRequestId`]s.
#[derive(Debug, Default)]
pub struct FrameRequestIds {
    next: AtomicU64,
}

impl FrameRequestIds {
    /// Create an allocator starting at id 1.
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> FrameRequestId {
        FrameRequestId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
