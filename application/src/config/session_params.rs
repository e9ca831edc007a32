//! Session parameters — controller policy constants.
//!
//! [`SessionParams`] groups the tunable timings and thresholds the
//! controllers consume. These are application-layer policy, not domain
//! rules: the domain defines what a breathing cycle *is*, the parameters
//! decide how long one lasts in this deployment.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable controller parameters.
///
/// Defaults match the production experience; tests shrink the timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParams {
    /// Breathing cycle length in seconds (split into 4 equal phases).
    pub cycle_secs: f32,
    /// Delay between a Breathing suggestion and the exercise starting.
    pub breathing_start_delay: Duration,
    /// How long a gesture stays current before auto-clearing. A policy
    /// constant, deliberately independent of any clip's own length.
    pub gesture_clear: Duration,
    /// Minimum final-transcript length (in characters) that triggers a turn.
    pub min_transcript_chars: usize,
    /// How many trailing turns are sent to the dialogue service as context.
    pub history_window: usize,
    /// Bounds of the randomized pause between blinks.
    pub blink_min: Duration,
    pub blink_max: Duration,
    /// Period of the session duration tick.
    pub duration_tick: Duration,
    /// Render frame period.
    pub frame_period: Duration,
    /// Ceiling on one dialogue-service round trip.
    pub dialogue_timeout: Duration,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            cycle_secs: 16.0,
            breathing_start_delay: Duration::from_millis(3000),
            gesture_clear: Duration::from_millis(2000),
            min_transcript_chars: 10,
            history_window: 10,
            blink_min: Duration::from_secs(3),
            blink_max: Duration::from_secs(5),
            duration_tick: Duration::from_secs(1),
            frame_period: Duration::from_millis(16),
            dialogue_timeout: Duration::from_secs(20),
        }
    }
}

impl SessionParams {
    // ==================== Builder Methods ====================

    pub fn with_cycle_secs(mut self, secs: f32) -> Self {
        self.cycle_secs = secs;
        self
    }

    pub fn with_breathing_start_delay(mut self, delay: Duration) -> Self {
        self.breathing_start_delay = delay;
        self
    }

    pub fn with_gesture_clear(mut self, delay: Duration) -> Self {
        self.gesture_clear = delay;
        self
    }

    pub fn with_min_transcript_chars(mut self, chars: usize) -> Self {
        self.min_transcript_chars = chars;
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_blink_bounds(mut self, min: Duration, max: Duration) -> Self {
        self.blink_min = min;
        self.blink_max = max;
        self
    }

    pub fn with_frame_period(mut self, period: Duration) -> Self {
        self.frame_period = period;
        self
    }

    pub fn with_dialogue_timeout(mut self, timeout: Duration) -> Self {
        self.dialogue_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SessionParams::default();
        assert_eq!(params.cycle_secs, 16.0);
        assert_eq!(params.gesture_clear, Duration::from_millis(2000));
        assert_eq!(params.breathing_start_delay, Duration::from_millis(3000));
        assert_eq!(params.min_transcript_chars, 10);
        assert_eq!(params.history_window, 10);
    }

    #[test]
    fn test_builder_chain() {
        let params = SessionParams::default()
            .with_cycle_secs(8.0)
            .with_gesture_clear(Duration::from_millis(500))
            .with_history_window(4);
        assert_eq!(params.cycle_secs, 8.0);
        assert_eq!(params.gesture_clear, Duration::from_millis(500));
        assert_eq!(params.history_window, 4);
    }
}
