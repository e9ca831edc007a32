//! Breathing exercise controller.
//!
//! Drives the box-breathing visual: `start()` installs the looping cycle
//! clip on the orb's Breathing channel, `stop()` clears it and snaps the
//! orb back to its resting state in the same call. The current phase is
//! derived from an elapsed-time clock captured at `start()` — never from
//! renderer progress — so it cannot drift if the frame rate wobbles.

use crate::clock::SceneClock;
use halcyon_domain::breathing::{self, BreathingPhase, INACTIVE_INSTRUCTION, REST_VISUAL};
use halcyon_domain::{ChannelKind, Mixer};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use tracing::info;

/// Controller for the breathing exercise visual.
#[derive(Clone)]
pub struct BreathingController {
    target: Arc<Mutex<Mixer>>,
    clock: SceneClock,
    started_at: Arc<Mutex<Option<Instant>>>,
    cycle_secs: f32,
}

impl BreathingController {
    /// `target` is the breathing orb's mixer; its base must be the resting
    /// visual so clearing the channel restores rest exactly.
    pub fn new(target: Arc<Mutex<Mixer>>, clock: SceneClock, cycle_secs: f32) -> Self {
        {
            let mut mixer = target.lock().unwrap_or_else(|e| e.into_inner());
            mixer.set_base(REST_VISUAL);
        }
        Self {
            target,
            clock,
            started_at: Arc::new(Mutex::new(None)),
            cycle_secs,
        }
    }

    /// Begin the exercise from phase zero. No-op while already active.
    pub fn start(&self) {
        let mut started = self.lock_started();
        if started.is_some() {
            return;
        }
        *started = Some(self.clock.now());

        let mut mixer = self.lock_target();
        mixer.set(
            ChannelKind::Breathing,
            breathing::cycle_clip(self.cycle_secs),
            self.clock.now_secs(),
        );
        info!("Breathing exercise started");
    }

    /// Halt the exercise and restore the resting visual synchronously.
    /// Safe to call when already stopped.
    pub fn stop(&self) {
        let was_active = self.lock_started().take().is_some();

        let mut mixer = self.lock_target();
        mixer.clear(ChannelKind::Breathing);

        if was_active {
            info!("Breathing exercise stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock_started().is_some()
    }

    /// Current phase, or `None` while the exercise is inactive. A stopped
    /// controller never reports the phase it was in when stopped.
    pub fn phase(&self) -> Option<BreathingPhase> {
        let started = *self.lock_started();
        started.map(|at| breathing::phase_at(at.elapsed().as_secs_f32(), self.cycle_secs))
    }

    /// Guidance text for the current phase.
    pub fn instruction(&self) -> &'static str {
        match self.phase() {
            Some(phase) => phase.instruction(),
            None => INACTIVE_INSTRUCTION,
        }
    }

    /// The resting visual the orb shows whenever the exercise is stopped.
    pub fn rest_visual(&self) -> halcyon_domain::VisualState {
        REST_VISUAL
    }

    fn lock_started(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.started_at.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_target(&self) -> std::sync::MutexGuard<'_, Mixer> {
        self.target.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halcyon_domain::breathing::{CYCLE_SECS, INHALE_COLOR, REST_SCALE};
    use std::time::Duration;

    fn setup() -> (BreathingController, Arc<Mutex<Mixer>>, SceneClock) {
        let mixer = Arc::new(Mutex::new(Mixer::default()));
        let clock = SceneClock::new();
        let ctl = BreathingController::new(mixer.clone(), clock, CYCLE_SECS);
        (ctl, mixer, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_inactive_phase_is_none() {
        let (ctl, _, _) = setup();
        assert_eq!(ctl.phase(), None);
        assert_eq!(ctl.instruction(), INACTIVE_INSTRUCTION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_follows_elapsed_time() {
        let (ctl, _, _) = setup();
        ctl.start();
        assert_eq!(ctl.phase(), Some(BreathingPhase::Inhale));

        tokio::time::sleep(Duration::from_secs_f32(CYCLE_SECS / 4.0)).await;
        assert_eq!(ctl.phase(), Some(BreathingPhase::HoldIn));

        tokio::time::sleep(Duration::from_secs_f32(CYCLE_SECS / 4.0)).await;
        assert_eq!(ctl.phase(), Some(BreathingPhase::Exhale));

        tokio::time::sleep(Duration::from_secs_f32(CYCLE_SECS / 2.0)).await;
        assert_eq!(ctl.phase(), Some(BreathingPhase::Inhale));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_restores_rest_from_any_phase() {
        let (ctl, mixer, clock) = setup();
        ctl.start();
        // Run into the exhale quarter
        tokio::time::sleep(Duration::from_secs_f32(CYCLE_SECS * 0.6)).await;
        ctl.stop();

        let state = mixer
            .lock()
            .unwrap()
            .sample(clock.now_secs());
        assert_eq!(state.scale, REST_SCALE);
        assert_eq!(state.color, INHALE_COLOR);
        assert_eq!(state.opacity, 1.0);
        assert_eq!(ctl.phase(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_begins_at_phase_zero() {
        let (ctl, _, _) = setup();
        ctl.start();
        tokio::time::sleep(Duration::from_secs_f32(CYCLE_SECS * 0.6)).await;
        ctl.stop();
        ctl.start();
        assert_eq!(ctl.phase(), Some(BreathingPhase::Inhale));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent_while_active() {
        let (ctl, _, _) = setup();
        ctl.start();
        tokio::time::sleep(Duration::from_secs(3)).await;
        ctl.start();
        // Phase still measured from the original start
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(ctl.phase(), Some(BreathingPhase::HoldIn));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_when_inactive_is_safe() {
        let (ctl, mixer, clock) = setup();
        ctl.stop();
        let state = mixer.lock().unwrap().sample(clock.now_secs());
        assert_eq!(state.scale, REST_SCALE);
    }
}
