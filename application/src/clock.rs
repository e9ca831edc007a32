//! Scene clock.
//!
//! One monotonic clock drives every animation sample and breathing-phase
//! query. Controllers capture instants from the same epoch the render loop
//! samples with, so channel start times and phase math can never drift
//! apart. Built on `tokio::time::Instant`, which honors paused test time.

use tokio::time::Instant;

/// Shared monotonic clock, seconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct SceneClock {
    epoch: Instant,
}

impl SceneClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Seconds elapsed since the clock was created.
    pub fn now_secs(&self) -> f32 {
        self.epoch.elapsed().as_secs_f32()
    }

    /// The current instant, for components that store start times.
    pub fn now(&self) -> Instant {
        Instant::now()
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_clock_advances_with_tokio_time() {
        let clock = SceneClock::new();
        assert_eq!(clock.now_secs(), 0.0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!((clock.now_secs() - 2.0).abs() < 0.01);
    }
}
