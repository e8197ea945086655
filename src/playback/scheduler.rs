/// Opaque id of one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Source of per-frame callbacks (a display's repaint loop).
pub trait FrameDriver {
    /// Schedules one callback for the next frame.
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancels a pending callback; unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Headless driver: requests queue up until [`ManualFrameDriver::fire`] hands them out.
#[derive(Debug, Default)]
pub struct ManualFrameDriver {
    next: u64,
    pending: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualFrameDriver {
    /// Driver with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the oldest pending request.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Requests not yet fired or cancelled.
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Requests cancelled before they fired.
    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }
}

impl FrameDriver for ManualFrameDriver {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancelled.push(handle);
        }
    }
}

/// Run state of a [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Not running; the cursor is at 0.
    Stopped,
    /// A frame callback is pending.
    Playing,
    /// Stopped with the cursor preserved.
    Paused,
}

/// What one frame callback did.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum TickOutcome {
    /// Stale handle or not playing; nothing changed.
    Ignored,
    /// The cursor moved forward.
    Advanced {
        /// Cursor after the tick, seconds.
        cursor: f64,
    },
    /// Looped past the end; the cursor wrapped modulo the length.
    Wrapped {
        /// Cursor after the tick, seconds.
        cursor: f64,
    },
    /// Reached the end without looping; the cursor is clamped to the end.
    Finished {
        /// Cursor after the tick, seconds.
        cursor: f64,
    },
}

impl TickOutcome {
    /// Cursor after the tick, unless it was ignored.
    pub fn cursor(self) -> Option<f64> {
        match self {
            TickOutcome::Ignored => None,
            TickOutcome::Advanced { cursor }
            | TickOutcome::Wrapped { cursor }
            | TickOutcome::Finished { cursor } => Some(cursor),
        }
    }
}

/// Play/pause/loop state machine over a cursor in seconds.
///
/// At most one frame request is outstanding at any time, and it is cancelled on every
/// transition out of `Playing`.
#[derive(Debug)]
pub struct Scheduler<D: FrameDriver> {
    driver: D,
    state: PlaybackState,
    cursor: f64,
    end: f64,
    looping: bool,
    last_tick: Option<f64>,
    pending: Option<FrameHandle>,
}

impl<D: FrameDriver> Scheduler<D> {
    /// Stopped scheduler over `[0, end]` seconds.
    pub fn new(driver: D, end: f64) -> Self {
        Self {
            driver,
            state: PlaybackState::Stopped,
            cursor: 0.0,
            end: sanitize_end(end),
            looping: false,
            last_tick: None,
            pending: None,
        }
    }

    /// The frame driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the frame driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Current run state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Playback cursor in seconds.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Playback length in seconds.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Whether playback wraps at the end.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Handle of the outstanding frame request, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Starts or resumes. A run that previously finished at the end restarts from 0.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        if self.cursor >= self.end {
            self.cursor = 0.0;
        }
        self.state = PlaybackState::Playing;
        self.last_tick = None;
        self.pending = Some(self.driver.request_frame());
        tracing::debug!(cursor = self.cursor, "playback started");
    }

    /// Cancels the pending frame and keeps the cursor.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.cancel_pending();
            self.state = PlaybackState::Paused;
        }
    }

    /// Cancels playback and rewinds to 0.
    pub fn stop(&mut self) {
        self.cancel_pending();
        self.state = PlaybackState::Stopped;
        self.cursor = 0.0;
    }

    /// Manual cursor placement; pauses a running playback.
    pub fn scrub(&mut self, t: f64) {
        self.pause();
        self.cursor = if t.is_finite() {
            t.clamp(0.0, self.end)
        } else {
            0.0
        };
    }

    /// Enables or disables wrapping at the end.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Changes the playback length (document edited while open).
    pub fn set_end(&mut self, end: f64) {
        self.end = sanitize_end(end);
        self.cursor = self.cursor.min(self.end);
    }

    /// Handles one fired frame at monotonic time `now` (seconds).
    pub fn tick(&mut self, handle: FrameHandle, now: f64) -> TickOutcome {
        if self.state != PlaybackState::Playing || self.pending != Some(handle) {
            return TickOutcome::Ignored;
        }
        self.pending = None;

        let delta = match self.last_tick {
            Some(last) if now.is_finite() => (now - last).max(0.0),
            _ => 0.0,
        };
        if now.is_finite() {
            self.last_tick = Some(now);
        }
        let next = self.cursor + delta;

        if next < self.end {
            self.cursor = next;
            self.pending = Some(self.driver.request_frame());
            return TickOutcome::Advanced {
                cursor: self.cursor,
            };
        }
        if self.looping && self.end > 0.0 {
            self.cursor = next % self.end;
            self.pending = Some(self.driver.request_frame());
            return TickOutcome::Wrapped {
                cursor: self.cursor,
            };
        }
        self.cursor = self.end;
        self.state = PlaybackState::Stopped;
        tracing::debug!(cursor = self.cursor, "playback finished");
        TickOutcome::Finished {
            cursor: self.cursor,
        }
    }

    /// Cancels any pending frame; the scheduler stays usable but inert.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.driver.cancel_frame(handle);
        }
        self.last_tick = None;
    }
}

fn sanitize_end(end: f64) -> f64 {
    if end.is_finite() { end.max(0.0) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
