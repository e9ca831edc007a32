//! Box-breathing cycle math.
//!
//! The cycle is 16 seconds split into four equal phases (inhale, hold,
//! exhale, hold). The current phase is always derived from elapsed time
//! since the exercise started — it is never stored, so it cannot drift from
//! the clock that drives the visuals.

use crate::animation::{Clip, Keyframe, PlayMode, Track, VisualState};
use crate::core::math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// Full cycle length in seconds.
pub const CYCLE_SECS: f32 = 16.0;

/// Resting / inhale-start scale of the breathing visual.
pub const REST_SCALE: Vec3 = Vec3::ONE;

/// Peak scale at full inhale.
pub const PEAK_SCALE: Vec3 = Vec3::new(1.6, 1.6, 1.6);

/// Baseline color at the start of an inhale (calm blue).
pub const INHALE_COLOR: Color = Color::new(0.35, 0.62, 0.92);

/// Color at full inhale (soft teal).
pub const EXHALE_COLOR: Color = Color::new(0.42, 0.85, 0.78);

/// The resting visual state the orb returns to whenever the exercise stops.
pub const REST_VISUAL: VisualState = VisualState::new(REST_SCALE, INHALE_COLOR, 1.0, Vec3::ZERO);

/// One quarter of the box-breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreathingPhase {
    Inhale,
    HoldIn,
    Exhale,
    HoldOut,
}

impl BreathingPhase {
    /// Guidance text for this phase.
    pub fn instruction(self) -> &'static str {
        match self {
            BreathingPhase::Inhale => "Breathe in slowly through your nose",
            BreathingPhase::HoldIn => "Hold your breath gently",
            BreathingPhase::Exhale => "Breathe out slowly through your mouth",
            BreathingPhase::HoldOut => "Rest before the next breath",
        }
    }
}

/// Guidance text shown when no exercise is running.
pub const INACTIVE_INSTRUCTION: &str = "Press start when you are ready";

/// Derive the phase from elapsed seconds since the exercise started.
///
/// Phase boundaries sit at exact quarters of the cycle; a boundary instant
/// belongs to the later phase (at exactly `cycle/4` the phase is `HoldIn`).
pub fn phase_at(elapsed_secs: f32, cycle_secs: f32) -> BreathingPhase {
    let cycle = if cycle_secs > 0.0 { cycle_secs } else { CYCLE_SECS };
    let pos = elapsed_secs.rem_euclid(cycle);
    let quarter = cycle / 4.0;
    match (pos / quarter) as u32 {
        0 => BreathingPhase::Inhale,
        1 => BreathingPhase::HoldIn,
        2 => BreathingPhase::Exhale,
        _ => BreathingPhase::HoldOut,
    }
}

/// Build the looping clip that animates the breathing visual over one cycle.
///
/// Scale rises over the inhale quarter, holds, falls over the exhale quarter,
/// holds; color follows the same contour between the inhale and exhale
/// baselines, and opacity swells slightly with the breath.
pub fn cycle_clip(cycle_secs: f32) -> Clip {
    let q = cycle_secs / 4.0;

    let scale = Track::new(
        vec![
            Keyframe::new(0.0, REST_SCALE),
            Keyframe::new(q, PEAK_SCALE),
            Keyframe::new(2.0 * q, PEAK_SCALE),
            Keyframe::new(3.0 * q, REST_SCALE),
            Keyframe::new(cycle_secs, REST_SCALE),
        ],
        PlayMode::Loop,
    );

    let color = Track::new(
        vec![
            Keyframe::new(0.0, INHALE_COLOR),
            Keyframe::new(q, EXHALE_COLOR),
            Keyframe::new(2.0 * q, EXHALE_COLOR),
            Keyframe::new(3.0 * q, INHALE_COLOR),
            Keyframe::new(cycle_secs, INHALE_COLOR),
        ],
        PlayMode::Loop,
    );

    let opacity = Track::new(
        vec![
            Keyframe::new(0.0, 0.85),
            Keyframe::new(q, 1.0),
            Keyframe::new(2.0 * q, 1.0),
            Keyframe::new(3.0 * q, 0.85),
            Keyframe::new(cycle_secs, 0.85),
        ],
        PlayMode::Loop,
    );

    Clip::new()
        .with_scale(scale)
        .with_color(color)
        .with_opacity(opacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_at_cycle_start_is_inhale() {
        assert_eq!(phase_at(0.0, CYCLE_SECS), BreathingPhase::Inhale);
    }

    #[test]
    fn test_phase_within_first_quarter() {
        assert_eq!(phase_at(CYCLE_SECS * 0.24, CYCLE_SECS), BreathingPhase::Inhale);
    }

    #[test]
    fn test_boundary_belongs_to_later_phase() {
        assert_eq!(phase_at(CYCLE_SECS / 4.0, CYCLE_SECS), BreathingPhase::HoldIn);
        assert_eq!(phase_at(CYCLE_SECS / 2.0, CYCLE_SECS), BreathingPhase::Exhale);
        assert_eq!(
            phase_at(CYCLE_SECS * 3.0 / 4.0, CYCLE_SECS),
            BreathingPhase::HoldOut
        );
    }

    #[test]
    fn test_phase_wraps_at_full_cycle() {
        assert_eq!(phase_at(CYCLE_SECS, CYCLE_SECS), BreathingPhase::Inhale);
        assert_eq!(
            phase_at(CYCLE_SECS + CYCLE_SECS * 0.26, CYCLE_SECS),
            BreathingPhase::HoldIn
        );
    }

    #[test]
    fn test_mid_quarter_phases() {
        assert_eq!(phase_at(CYCLE_SECS * 0.30, CYCLE_SECS), BreathingPhase::HoldIn);
        assert_eq!(phase_at(CYCLE_SECS * 0.60, CYCLE_SECS), BreathingPhase::Exhale);
        assert_eq!(phase_at(CYCLE_SECS * 0.90, CYCLE_SECS), BreathingPhase::HoldOut);
    }

    #[test]
    fn test_instruction_mapping_is_total() {
        for phase in [
            BreathingPhase::Inhale,
            BreathingPhase::HoldIn,
            BreathingPhase::Exhale,
            BreathingPhase::HoldOut,
        ] {
            assert!(!phase.instruction().is_empty());
        }
    }

    #[test]
    fn test_cycle_clip_starts_and_ends_at_rest() {
        use crate::animation::{ChannelKind, Mixer};
        let mut mixer = Mixer::default();
        mixer.set(ChannelKind::Breathing, cycle_clip(CYCLE_SECS), 0.0);

        let start = mixer.sample(0.0);
        assert_eq!(start.scale, REST_SCALE);
        assert_eq!(start.color, INHALE_COLOR);

        let peak = mixer.sample(CYCLE_SECS / 4.0);
        assert_eq!(peak.scale, PEAK_SCALE);
        assert_eq!(peak.color, EXHALE_COLOR);

        let wrapped = mixer.sample(CYCLE_SECS);
        assert_eq!(wrapped.scale, REST_SCALE);
    }
}
