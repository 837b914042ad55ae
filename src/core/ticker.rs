//! Priority-ordered per-frame listener dispatch.
//!
//! A [`Ticker`] owns a listener list and the timing state of its last tick.
//! Each [`Ticker::update`] walks the list from the highest priority down and
//! invokes every active listener with the elapsed delta. Listeners may call
//! back into the same ticker (add, remove, stop, destroy) while they run:
//!
//! - A listener removed before its turn does not fire in that tick.
//! - A listener added behind the traversal position fires in the same tick;
//!   one added ahead of it waits for the next tick.
//! - A listener removing itself does not break the walk.
//!
//! The state lock is released around every listener call, so re-entrant calls
//! never deadlock. A nested `update` on the same ticker is ignored.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::config::TickerConfig;
use crate::core::frame_source::{FrameCallback, FrameRequestId, FrameSource};
use crate::core::listener::{ListenerContext, ListenerList, Tick, TickerCallback};
use crate::core::timing::FrameTiming;
use crate::runtime::api::TickerSnapshot;

/// Handle to a ticker. Clones share the same ticker.
#[derive(Clone)]
pub struct Ticker {
    inner: Arc<TickerInner>,
}

struct TickerInner {
    id: Uuid,
    label: String,
    protected: bool,
    state: Mutex<TickerState>,
}

struct TickerState {
    listeners: ListenerList,
    timing: FrameTiming,
    started: bool,
    auto_start: bool,
    updating: bool,
    frame_source: Option<Arc<dyn FrameSource>>,
    request: Option<FrameRequestId>,
}

impl TickerState {
    fn cancel_if_needed(&mut self) {
        if let Some(id) = self.request.take() {
            if let Some(source) = self.frame_source.as_ref() {
                source.cancel_frame(id);
            }
        }
    }
}

impl Drop for TickerInner {
    fn drop(&mut self) {
        self.state.get_mut().cancel_if_needed();
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("protected", &self.inner.protected)
            .finish_non_exhaustive()
    }
}

impl Ticker {
    /// Create a stopped ticker with default settings and no frame source.
    pub fn new() -> Self {
        Self::with_config(&TickerConfig::default())
    }

    /// Create a stopped ticker from configuration.
    ///
    /// The configured frame source is not instantiated here; see
    /// [`crate::builders::build_ticker`].
    pub fn with_config(config: &TickerConfig) -> Self {
        Self::from_parts(config, false)
    }

    pub(crate) fn protected(config: &TickerConfig) -> Self {
        Self::from_parts(config, true)
    }

    fn from_parts(config: &TickerConfig, protected: bool) -> Self {
        let mut timing = FrameTiming::new(config.target_fps);
        timing.set_min_fps(config.min_fps);
        timing.set_max_fps(config.max_fps);
        timing.set_speed(config.speed);

        let id = Uuid::new_v4();
        let label = config.label.clone().unwrap_or_else(|| id.to_string());
        debug!(ticker = %id, label = %label, protected, "ticker created");

        Self {
            inner: Arc::new(TickerInner {
                id,
                label,
                protected,
                state: Mutex::new(TickerState {
                    listeners: ListenerList::new(),
                    timing,
                    started: false,
                    auto_start: config.auto_start,
                    updating: false,
                    frame_source: None,
                    request: None,
                }),
            }),
        }
    }

    /// Register `callback` to run on every tick.
    ///
    /// Higher priorities run first; equal priorities run in registration
    /// order. Registering the same callback twice creates two independent
    /// listeners. Starts the ticker if it is stopped and `auto_start` is set.
    pub fn add(
        &self,
        callback: &TickerCallback,
        context: Option<&ListenerContext>,
        priority: impl Into<i32>,
    ) -> &Self {
        self.add_listener(callback, context, priority.into(), false)
    }

    /// Register `callback` to run on the next tick only.
    pub fn add_once(
        &self,
        callback: &TickerCallback,
        context: Option<&ListenerContext>,
        priority: impl Into<i32>,
    ) -> &Self {
        self.add_listener(callback, context, priority.into(), true)
    }

    fn add_listener(
        &self,
        callback: &TickerCallback,
        context: Option<&ListenerContext>,
        priority: i32,
        once: bool,
    ) -> &Self {
        let mut state = self.inner.state.lock();
        state
            .listeners
            .insert(callback.clone(), context.cloned(), priority, once);
        trace!(
            ticker = %self.inner.id,
            priority,
            once,
            count = state.listeners.len(),
            "listener added"
        );
        self.start_if_possible(&mut state);
        self
    }

    /// Unregister every listener matching `callback` and `context`.
    ///
    /// A `None` context only matches listeners registered without one.
    /// Unknown callbacks are ignored.
    pub fn remove(&self, callback: &TickerCallback, context: Option<&ListenerContext>) -> &Self {
        let mut state = self.inner.state.lock();
        let removed = state.listeners.remove_matching(callback, context);
        if removed > 0 {
            trace!(
                ticker = %self.inner.id,
                removed,
                count = state.listeners.len(),
                "listeners removed"
            );
            if state.listeners.is_empty() {
                state.cancel_if_needed();
            }
        }
        self
    }

    /// Start ticking. No-op when already started.
    pub fn start(&self) {
        let mut state = self.inner.state.lock();
        self.start_locked(&mut state);
    }

    /// Stop ticking and release the frame request. No-op when stopped.
    pub fn stop(&self) {
        let mut state = self.inner.state.lock();
        if !state.started {
            return;
        }
        state.started = false;
        state.cancel_if_needed();
        debug!(ticker = %self.inner.id, label = %self.inner.label, "ticker stopped");
    }

    /// Stop the ticker and drop every listener.
    ///
    /// Protected tickers ([`Ticker::shared`], [`Ticker::system`]) ignore this
    /// call. An ordinary ticker can be reused afterwards; the next `add`
    /// behaves as on a fresh ticker.
    pub fn destroy(&self) {
        if self.inner.protected {
            debug!(
                ticker = %self.inner.id,
                label = %self.inner.label,
                "destroy ignored on protected ticker"
            );
            return;
        }
        let mut state = self.inner.state.lock();
        state.started = false;
        state.cancel_if_needed();
        state.listeners.clear();
        debug!(ticker = %self.inner.id, label = %self.inner.label, "ticker destroyed");
    }

    /// Run one tick at `current_time` (milliseconds on the caller's clock).
    ///
    /// Ignored while this ticker is already inside `update`.
    pub fn update(&self, current_time: f64) {
        let delta = {
            let mut state = self.inner.state.lock();
            if state.updating {
                trace!(ticker = %self.inner.id, "nested update ignored");
                return;
            }
            let Some(delta) = state.timing.begin(current_time) else {
                trace!(ticker = %self.inner.id, current_time, "frame skipped");
                return;
            };
            state.updating = true;
            state.listeners.pin();
            delta
        };
        let _dispatch = DispatchGuard {
            ticker: self,
            current_time,
        };

        let mut cursor = self.inner.state.lock().listeners.first();
        while let Some(id) = cursor {
            let invocation = self.inner.state.lock().listeners.invocation(id);
            if let Some(invocation) = invocation {
                let tick = Tick::new(delta, invocation.context.as_ref());
                invocation.callback.call(&tick);
            }
            cursor = self.inner.state.lock().listeners.advance(id);
        }
    }

    /// Run one tick at the current crate clock time.
    pub fn update_now(&self) {
        self.update(crate::util::clock::now_ms());
    }

    /// Attach or detach the frame source driving this ticker.
    ///
    /// Any outstanding request on the previous source is cancelled; a running
    /// ticker with listeners subscribes to the new source right away.
    pub fn set_frame_source(&self, source: Option<Arc<dyn FrameSource>>) {
        let mut state = self.inner.state.lock();
        state.cancel_if_needed();
        state.frame_source = source;
        if state.started {
            self.request_if_needed(&mut state);
        }
    }

    fn start_locked(&self, state: &mut TickerState) {
        if state.started {
            return;
        }
        state.started = true;
        debug!(ticker = %self.inner.id, label = %self.inner.label, "ticker started");
        self.request_if_needed(state);
    }

    fn start_if_possible(&self, state: &mut TickerState) {
        if state.started {
            self.request_if_needed(state);
        } else if state.auto_start {
            self.start_locked(state);
        }
    }

    /// Subscribe to the frame source, restarting elapsed time from its clock.
    fn request_if_needed(&self, state: &mut TickerState) {
        if state.request.is_some() || state.listeners.is_empty() {
            return;
        }
        let Some(source) = state.frame_source.clone() else {
            return;
        };
        state.timing.reset_clock(source.now());
        state.request = Some(source.request_frame(self.frame_callback()));
    }

    fn frame_callback(&self) -> FrameCallback {
        let weak: Weak<TickerInner> = Arc::downgrade(&self.inner);
        Arc::new(move |id, time| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.on_frame(id, time);
            }
        })
    }

    fn on_frame(&self, id: FrameRequestId, time: f64) {
        {
            let mut state = self.inner.state.lock();
            if state.request != Some(id) {
                trace!(ticker = %self.inner.id, request = id.0, "stale frame ignored");
                return;
            }
            state.request = None;
            if !state.started {
                return;
            }
        }

        self.update(time);

        let mut state = self.inner.state.lock();
        if state.started && state.request.is_none() && !state.listeners.is_empty() {
            if let Some(source) = state.frame_source.clone() {
                state.request = Some(source.request_frame(self.frame_callback()));
            }
        }
    }

    /// Whether the ticker is running.
    pub fn started(&self) -> bool {
        self.inner.state.lock().started
    }

    /// Number of registered, active listeners.
    pub fn count(&self) -> usize {
        self.inner.state.lock().listeners.len()
    }

    /// Frames per second implied by the last tick.
    pub fn fps(&self) -> f64 {
        self.inner.state.lock().timing.fps()
    }

    /// Scaled delta of the last tick in frame units.
    pub fn delta_time(&self) -> f64 {
        self.inner.state.lock().timing.delta_time()
    }

    /// Scaled, clamped delta of the last tick in milliseconds.
    pub fn delta_ms(&self) -> f64 {
        self.inner.state.lock().timing.delta_ms()
    }

    /// Raw milliseconds between the last two ticks.
    pub fn elapsed_ms(&self) -> f64 {
        self.inner.state.lock().timing.elapsed_ms()
    }

    /// Timestamp of the last tick.
    pub fn last_time(&self) -> f64 {
        self.inner.state.lock().timing.last_time()
    }

    /// Delta scale factor.
    pub fn speed(&self) -> f64 {
        self.inner.state.lock().timing.speed()
    }

    /// Set the delta scale factor.
    pub fn set_speed(&self, speed: f64) {
        self.inner.state.lock().timing.set_speed(speed);
    }

    /// Lowest frame rate deltas are clamped to.
    pub fn min_fps(&self) -> f64 {
        self.inner.state.lock().timing.min_fps()
    }

    /// Set the lowest frame rate; `0` removes the delta ceiling.
    pub fn set_min_fps(&self, fps: f64) {
        self.inner.state.lock().timing.set_min_fps(fps);
    }

    /// Highest frame rate listeners run at; `0` means uncapped.
    pub fn max_fps(&self) -> f64 {
        self.inner.state.lock().timing.max_fps()
    }

    /// Cap the frame rate; `0` uncaps it.
    pub fn set_max_fps(&self, fps: f64) {
        self.inner.state.lock().timing.set_max_fps(fps);
    }

    /// Whether `add` starts a stopped ticker.
    pub fn auto_start(&self) -> bool {
        self.inner.state.lock().auto_start
    }

    /// Set whether `add` starts a stopped ticker.
    pub fn set_auto_start(&self, auto_start: bool) {
        self.inner.state.lock().auto_start = auto_start;
    }

    /// Unique id of this ticker.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Human-readable label (the id unless configured).
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Whether `destroy` is inert for this ticker.
    pub fn is_protected(&self) -> bool {
        self.inner.protected
    }

    /// Point-in-time view of the ticker's state.
    pub fn snapshot(&self) -> TickerSnapshot {
        let state = self.inner.state.lock();
        TickerSnapshot {
            id: self.inner.id,
            label: self.inner.label.clone(),
            protected: self.inner.protected,
            started: state.started,
            count: state.listeners.len(),
            fps: state.timing.fps(),
            delta_time: state.timing.delta_time(),
            delta_ms: state.timing.delta_ms(),
            elapsed_ms: state.timing.elapsed_ms(),
            last_time: state.timing.last_time(),
            speed: state.timing.speed(),
            min_fps: state.timing.min_fps(),
            max_fps: state.timing.max_fps(),
        }
    }
}

/// Ends a dispatch even if a listener panics: clears the in-progress flag,
/// recycles retired slots and records the tick time.
struct DispatchGuard<'a> {
    ticker: &'a Ticker,
    current_time: f64,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.ticker.inner.state.lock();
        state.updating = false;
        state.listeners.unpin();
        if state.listeners.is_empty() {
            state.cancel_if_needed();
        }
        state.timing.finish(self.current_time);
    }
}
