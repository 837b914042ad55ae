//! Native frame source backed by a dedicated OS thread.
//!
//! The frame thread owns the pending requests and fires them in one batch at
//! every frame boundary, the way a display refresh drives "next frame"
//! callbacks. Requests and cancellations reach it over a crossbeam channel;
//! the thread sleeps in `recv_timeout` between frames and blocks on `recv`
//! while nothing is pending.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::core::{FrameCallback, FrameRequestId, FrameRequestIds, FrameSource, TickerError};
use crate::util::clock::now_ms;

enum Command {
    Request(FrameRequestId, FrameCallback),
    Cancel(FrameRequestId),
}

/// Frame source firing at a fixed rate on its own thread.
pub struct IntervalFrameSource {
    interval: Duration,
    ids: FrameRequestIds,
    /// Command sender. Option allows clean shutdown by dropping.
    command_tx: Mutex<Option<Sender<Command>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl IntervalFrameSource {
    /// Spawn the frame thread firing `fps` frames per second.
    ///
    /// # Errors
    ///
    /// - `TickerError::FrameSource` if `fps` is not a positive number
    /// - `TickerError::Io` if the thread cannot be spawned
    pub fn spawn(fps: f64) -> Result<Self, TickerError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(TickerError::FrameSource(format!(
                "interval fps must be a positive number, got {fps}"
            )));
        }
        let interval = Duration::from_secs_f64(1.0 / fps);
        let (command_tx, command_rx) = unbounded();

        let worker = thread::Builder::new()
            .name("ticker-frame".into())
            .spawn(move || frame_loop(&command_rx, interval))?;

        debug!(fps, interval_us = interval.as_micros(), "interval frame source started");

        Ok(Self {
            interval,
            ids: FrameRequestIds::new(),
            command_tx: Mutex::new(Some(command_tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Time between frames.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the frame thread and wait for it to exit.
    ///
    /// Pending requests are dropped without firing. Calling this from a
    /// frame callback stops the thread without joining it.
    pub fn shutdown(&self) {
        self.command_tx.lock().take();
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            if worker.thread().id() == thread::current().id() {
                return;
            }
            if worker.join().is_err() {
                warn!("frame thread panicked");
            }
        }
    }

    fn send(&self, command: Command) {
        let tx = self.command_tx.lock();
        match tx.as_ref() {
            Some(tx) => {
                if tx.send(command).is_err() {
                    warn!("frame thread gone, command dropped");
                }
            }
            None => debug!("frame source shut down, command dropped"),
        }
    }
}

impl FrameSource for IntervalFrameSource {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let id = self.ids.next_id();
        self.send(Command::Request(id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.send(Command::Cancel(id));
    }
}

impl Drop for IntervalFrameSource {
    fn drop(&mut self) {
        // Dropping the sender ends the frame loop; the thread is detached.
        self.command_tx.get_mut().take();
    }
}

fn frame_loop(commands: &Receiver<Command>, interval: Duration) {
    let mut pending: Vec<(FrameRequestId, FrameCallback)> = Vec::new();
    let mut next_frame = Instant::now() + interval;

    loop {
        let command = if pending.is_empty() {
            commands.recv().map_err(|_| RecvTimeoutError::Disconnected)
        } else {
            commands.recv_timeout(next_frame.saturating_duration_since(Instant::now()))
        };

        match command {
            Ok(Command::Request(id, callback)) => {
                if pending.is_empty() {
                    // Idle period: realign so the first frame is a full
                    // interval away at most.
                    let now = Instant::now();
                    while next_frame <= now {
                        next_frame += interval;
                    }
                }
                pending.push((id, callback));
            }
            Ok(Command::Cancel(id)) => pending.retain(|(pending_id, _)| *pending_id != id),
            Err(RecvTimeoutError::Timeout) => {
                next_frame += interval;
                let now = Instant::now();
                if next_frame <= now {
                    next_frame = now + interval;
                }
                let time = now_ms();
                for (id, callback) in std::mem::take(&mut pending) {
                    callback(id, time);
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!("frame thread exiting");
}
