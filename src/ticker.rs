use std::time::Duration;

/// Frame interval in milliseconds (20 FPS for the background)
pub const FRAME_MS: u64 = 50;

/// How long a new row stays dimmed
pub const ENTER_TRANSITION: Duration = Duration::from_millis(100);

/// How long a deleted row lingers before it leaves the store
pub const EXIT_TRANSITION: Duration = Duration::from_millis(300);

/// Get frame duration
pub fn frame_duration() -> Duration {
    Duration::from_millis(FRAME_MS)
}
