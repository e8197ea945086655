/// Coalesces authoritative cursor commits to one per `every` frames.
///
/// Rendering still evaluates every frame; only the committed value may trail the visual cursor,
/// by at most `every - 1` frames. [`CommitThrottle::flush`] commits unconditionally and is used
/// on stop and at the end of a run.
#[derive(Clone, Debug)]
pub struct CommitThrottle {
    every: u32,
    frames_since: u32,
    committed: Option<f64>,
}

impl CommitThrottle {
    /// Throttle committing every `every` frames; 0 is treated as 1.
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            frames_since: 0,
            committed: None,
        }
    }

    /// Commit interval in frames.
    pub fn every(&self) -> u32 {
        self.every
    }

    /// Records a rendered frame; returns the cursor when this frame is committed.
    pub fn on_frame(&mut self, cursor: f64) -> Option<f64> {
        self.frames_since += 1;
        if self.frames_since < self.every {
            return None;
        }
        self.frames_since = 0;
        self.committed = Some(cursor);
        Some(cursor)
    }

    /// Commits `cursor` now and restarts the count.
    pub fn flush(&mut self, cursor: f64) -> f64 {
        self.frames_since = 0;
        self.committed = Some(cursor);
        cursor
    }

    /// Last committed cursor.
    pub fn committed(&self) -> Option<f64> {
        self.committed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/throttle.rs"]
mod tests;
