//! Tokio-driven frame source.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::core::{FrameCallback, FrameRequestId, FrameRequestIds, FrameSource, TickerError};
use crate::util::clock::now_ms;

/// Frame source that fires each request from a timer task on a tokio runtime.
///
/// Every request spawns one task sleeping for a frame interval; cancelling a
/// request aborts its task.
pub struct TokioFrameSource {
    handle: Handle,
    interval: Duration,
    ids: FrameRequestIds,
    tasks: Arc<Mutex<HashMap<FrameRequestId, JoinHandle<()>>>>,
}

impl TokioFrameSource {
    /// Create a source on `handle` firing at `fps` frames per second.
    ///
    /// # Errors
    ///
    /// Returns `TickerError::FrameSource` if `fps` is not a positive number.
    pub fn new(handle: Handle, fps: f64) -> Result<Self, TickerError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(TickerError::FrameSource(format!(
                "tokio fps must be a positive number, got {fps}"
            )));
        }
        Ok(Self {
            handle,
            interval: Duration::from_secs_f64(1.0 / fps),
            ids: FrameRequestIds::new(),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Create a source on the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns `TickerError::FrameSource` outside a tokio runtime or if `fps`
    /// is invalid.
    pub fn current(fps: f64) -> Result<Self, TickerError> {
        let handle = Handle::try_current()
            .map_err(|e| TickerError::FrameSource(format!("no tokio runtime: {e}")))?;
        Self::new(handle, fps)
    }

    /// Time between frames.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of requests waiting for their frame.
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl FrameSource for TokioFrameSource {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let id = self.ids.next_id();
        let interval = self.interval;
        let tasks = Arc::clone(&self.tasks);

        // Hold the map while spawning so the task cannot remove its entry
        // before it is inserted.
        let mut guard = self.tasks.lock();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(interval).await;
            tasks.lock().remove(&id);
            callback(id, now_ms());
        });
        guard.insert(id, task);
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        let task = self.tasks.lock().remove(&id);
        if let Some(task) = task {
            task.abort();
        }
    }
}

impl Drop for TokioFrameSource {
    fn drop(&mut self) {
        for (_, task) in self.tasks.lock().drain() {
            task.abort();
        }
    }
}
