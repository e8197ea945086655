//! Cooperative, single-threaded playback.
//!
//! A host repaint loop (or [`scheduler::ManualFrameDriver`] in tests and the CLI) fires frame
//! callbacks; every tick advances the cursor by wall-clock delta and requests the next frame.
//! Nothing runs between ticks, so cancelling the pending handle is a complete stop.

/// Frame scheduler and frame drivers.
pub mod scheduler;
/// Playback bound to one document.
pub mod session;
/// Coalesced state commits.
pub mod throttle;
