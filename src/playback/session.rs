use crate::{
    compile::plan::{RenderPlan, SurfaceDesc, compile_frame},
    composition::model::{AnimationDocument, AnimationMode},
    config::EngineConfig,
    playback::scheduler::{FrameDriver, FrameHandle, PlaybackState, Scheduler, TickOutcome},
    playback::throttle::CommitThrottle,
};

/// Scheduler plus commit throttling bound to one document's playback length.
///
/// Timeline documents commit every frame; slide decks coalesce commits per
/// [`EngineConfig::commit_every_n_frames`].
#[derive(Debug)]
pub struct PlaybackSession<D: FrameDriver> {
    scheduler: Scheduler<D>,
    throttle: CommitThrottle,
    committed: f64,
}

impl<D: FrameDriver> PlaybackSession<D> {
    /// Stopped session over `doc`'s playback length.
    pub fn new(doc: &AnimationDocument, driver: D, config: &EngineConfig) -> Self {
        let every = match doc.mode {
            AnimationMode::Timeline => 1,
            AnimationMode::Slides => config.commit_every_n_frames,
        };
        Self {
            scheduler: Scheduler::new(driver, doc.playback_length()),
            throttle: CommitThrottle::new(every),
            committed: 0.0,
        }
    }

    /// Underlying scheduler.
    pub fn scheduler(&self) -> &Scheduler<D> {
        &self.scheduler
    }

    /// Mutable access to the frame driver.
    pub fn driver_mut(&mut self) -> &mut D {
        self.scheduler.driver_mut()
    }

    /// Current run state.
    pub fn state(&self) -> PlaybackState {
        self.scheduler.state()
    }

    /// Cursor the renderer draws (advanced every frame).
    pub fn cursor(&self) -> f64 {
        self.scheduler.cursor()
    }

    /// Last committed cursor; may trail [`PlaybackSession::cursor`] during slide playback.
    pub fn committed_cursor(&self) -> f64 {
        self.committed
    }

    /// Starts or resumes playback.
    pub fn play(&mut self) {
        self.scheduler.play();
    }

    /// Pauses and commits the cursor.
    pub fn pause(&mut self) {
        self.scheduler.pause();
        self.commit_now();
    }

    /// Stops, rewinds and commits.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.commit_now();
    }

    /// Moves the cursor, pausing playback, and commits.
    pub fn scrub(&mut self, t: f64) {
        self.scheduler.scrub(t);
        self.commit_now();
    }

    /// Enables or disables wrapping at the end.
    pub fn set_looping(&mut self, looping: bool) {
        self.scheduler.set_looping(looping);
    }

    /// Re-reads the playback length after the document changed.
    pub fn sync_document(&mut self, doc: &AnimationDocument) {
        self.scheduler.set_end(doc.playback_length());
    }

    /// Handles one frame callback and commits according to the throttle.
    pub fn tick(&mut self, handle: FrameHandle, now: f64) -> TickOutcome {
        let outcome = self.scheduler.tick(handle, now);
        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Advanced { cursor } | TickOutcome::Wrapped { cursor } => {
                if let Some(c) = self.throttle.on_frame(cursor) {
                    self.committed = c;
                }
            }
            TickOutcome::Finished { cursor } => {
                self.committed = self.throttle.flush(cursor);
            }
        }
        outcome
    }

    /// Draw list for the current visual cursor.
    pub fn frame(&self, doc: &AnimationDocument, surface: SurfaceDesc) -> RenderPlan {
        compile_frame(doc, self.cursor(), surface)
    }

    /// Cancels any pending frame and commits the cursor.
    pub fn teardown(&mut self) {
        self.scheduler.teardown();
        self.commit_now();
    }

    fn commit_now(&mut self) {
        self.committed = self.throttle.flush(self.scheduler.cursor());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
