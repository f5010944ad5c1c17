use std::time::Duration;

/// Default animation tick, 25 frames per second.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(40);

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionConfig {
    /// Cadence of `advance_tick` calls made by the animation driver.
    pub tick_interval: Duration,

    /// Window assumed for the first batch, before any inter-batch gap has been
    /// observed. Never less than 1 ms.
    pub initial_window: Duration,

    /// Number of batches the driver queues before senders wait.
    pub batch_buffer: usize,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            initial_window: Duration::from_millis(1),
            batch_buffer: 16,
        }
    }
}

impl MotionConfig {
    /// Initial window in whole milliseconds, at least 1.
    #[must_use]
    pub fn initial_window_millis(&self) -> i64 {
        i64::try_from(self.initial_window.as_millis()).unwrap_or(i64::MAX).max(1)
    }
}
