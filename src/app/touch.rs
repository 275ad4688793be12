//! Double-tap zoom suppression
use std::time::Duration;

/// Flags a touch end that follows the previous one within the window.
#[derive(Debug, Clone, Copy)]
pub struct DoubleTapGuard {
    /// Two touch ends closer than this count as a double tap.
    window_ms: u64,
    /// Timestamp of the previous touch end; `None` before the first touch.
    last_touch_end_ms: Option<u64>,
}

impl DoubleTapGuard {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            last_touch_end_ms: None,
        }
    }

    /// Record a touch end; returns `true` when it completes a double tap.
    pub const fn touch_end(&mut self, at_ms: u64) -> bool {
        let double_tap = match self.last_touch_end_ms {
            Some(last) => at_ms.saturating_sub(last) <= self.window_ms,
            None => false,
        };
        self.last_touch_end_ms = Some(at_ms);
        double_tap
    }
}
