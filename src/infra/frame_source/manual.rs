//! Manually advanced frame source for headless loops and tests.

use std::mem;

use parking_lot::Mutex;

use crate::core::{FrameCallback, FrameRequestId, FrameRequestIds, FrameSource};

struct ManualState {
    now: f64,
    pending: Vec<(FrameRequestId, FrameCallback)>,
}

/// Frame source whose clock and frames are driven by the caller.
///
/// Requests queue up until [`ManualFrameSource::advance`] fires them. Requests
/// made by callbacks during an advance wait for the next one.
pub struct ManualFrameSource {
    ids: FrameRequestIds,
    state: Mutex<ManualState>,
}

impl Default for ManualFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualFrameSource {
    /// Create a source with its clock at 0 ms.
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a source with its clock at `now` ms.
    pub fn starting_at(now: f64) -> Self {
        Self {
            ids: FrameRequestIds::new(),
            state: Mutex::new(ManualState {
                now,
                pending: Vec::new(),
            }),
        }
    }

    /// Number of requests waiting for a frame.
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Set the clock to `now` and fire every pending request with it.
    /// Returns the number of callbacks fired.
    pub fn advance(&self, now: f64) -> usize {
        let batch = {
            let mut state = self.state.lock();
            state.now = now;
            mem::take(&mut state.pending)
        };
        let fired = batch.len();
        for (id, callback) in batch {
            callback(id, now);
        }
        fired
    }

    /// Move the clock forward by `ms` and fire pending requests.
    pub fn advance_by(&self, ms: f64) -> usize {
        let now = self.state.lock().now + ms;
        self.advance(now)
    }
}

impl FrameSource for ManualFrameSource {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let id = self.ids.next_id();
        self.state.lock().pending.push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.state.lock().pending.retain(|(pending, _)| *pending != id);
    }

    fn now(&self) -> f64 {
        self.state.lock().now
    }
}
