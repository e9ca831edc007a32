//! Therapist character state and animation clips.
//!
//! The character rig has two animated targets: the body (sway, gestures)
//! and the mouth (speaking loop, blink shares the body's Blink channel).
//! Clip builders here are pure; the application-layer controller decides
//! when to install them.

use crate::animation::{Clip, Keyframe, PlayMode, Track};
use crate::core::math::{Color, Vec3};
use crate::session::TherapistEmotion;
use serde::{Deserialize, Serialize};

/// One-shot gestures the therapist can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Nod,
    LeanForward,
    OpenHands,
}

/// Externally visible character state, owned by the character controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterState {
    pub is_speaking: bool,
    pub current_gesture: Option<Gesture>,
    pub emotion: TherapistEmotion,
}

/// Neutral mouth scale. `set_speaking(false)` must snap back to this.
pub const MOUTH_NEUTRAL_SCALE: Vec3 = Vec3::ONE;

// Gesture clip lengths in seconds. The state auto-clear delay is a separate
// policy constant owned by the application layer.
const NOD_SECS: f32 = 1.2;
const LEAN_SECS: f32 = 2.0;
const OPEN_HANDS_SECS: f32 = 1.5;

impl Gesture {
    /// Build the one-shot clip for this gesture. Every clip returns to the
    /// neutral pose by its final keyframe, so pruning it leaves no residue.
    pub fn clip(self) -> Clip {
        match self {
            Gesture::Nod => {
                // Two quick forward tilts of the head/torso
                let dip = Vec3::new(0.22, 0.0, 0.0);
                Clip::new().with_rotation(Track::new(
                    vec![
                        Keyframe::new(0.0, Vec3::ZERO),
                        Keyframe::new(NOD_SECS * 0.25, dip),
                        Keyframe::new(NOD_SECS * 0.5, Vec3::ZERO),
                        Keyframe::new(NOD_SECS * 0.75, dip),
                        Keyframe::new(NOD_SECS, Vec3::ZERO),
                    ],
                    PlayMode::Once,
                ))
            }
            Gesture::LeanForward => {
                // Lean in over the first second, ease back over the second
                let lean = Vec3::new(0.35, 0.0, 0.0);
                Clip::new().with_rotation(Track::new(
                    vec![
                        Keyframe::new(0.0, Vec3::ZERO),
                        Keyframe::new(LEAN_SECS * 0.5, lean),
                        Keyframe::new(LEAN_SECS, Vec3::ZERO),
                    ],
                    PlayMode::Once,
                ))
            }
            Gesture::OpenHands => {
                // Shoulders roll open with a slight widening of the torso
                let open = Vec3::new(0.0, 0.0, 0.18);
                let widen = Vec3::new(1.06, 1.0, 1.0);
                Clip::new()
                    .with_rotation(Track::new(
                        vec![
                            Keyframe::new(0.0, Vec3::ZERO),
                            Keyframe::new(OPEN_HANDS_SECS * 0.4, open),
                            Keyframe::new(OPEN_HANDS_SECS, Vec3::ZERO),
                        ],
                        PlayMode::Once,
                    ))
                    .with_scale(Track::new(
                        vec![
                            Keyframe::new(0.0, Vec3::ONE),
                            Keyframe::new(OPEN_HANDS_SECS * 0.4, widen),
                            Keyframe::new(OPEN_HANDS_SECS, Vec3::ONE),
                        ],
                        PlayMode::Once,
                    ))
            }
        }
    }
}

/// Continuous subtle idle sway installed on the body at construction.
pub fn idle_sway_clip() -> Clip {
    let tilt = Vec3::new(0.0, 0.025, 0.015);
    let counter = Vec3::new(0.0, -0.025, -0.015);
    Clip::new().with_rotation(Track::new(
        vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(2.0, tilt),
            Keyframe::new(6.0, counter),
            Keyframe::new(8.0, Vec3::ZERO),
        ],
        PlayMode::Loop,
    ))
}

/// One blink: eyelids close and reopen in ~150 ms (modelled as a vertical
/// squash of the eye region).
pub fn blink_clip() -> Clip {
    Clip::new().with_scale(Track::new(
        vec![
            Keyframe::new(0.0, Vec3::ONE),
            Keyframe::new(0.07, Vec3::new(1.0, 0.1, 1.0)),
            Keyframe::new(0.15, Vec3::ONE),
        ],
        PlayMode::Once,
    ))
}

/// Short repeating mouth-shape loop used while the therapist speaks.
pub fn mouth_speaking_clip() -> Clip {
    Clip::new().with_scale(Track::new(
        vec![
            Keyframe::new(0.0, MOUTH_NEUTRAL_SCALE),
            Keyframe::new(0.12, Vec3::new(1.0, 1.5, 1.0)),
            Keyframe::new(0.22, Vec3::new(1.0, 0.8, 1.0)),
            Keyframe::new(0.3, MOUTH_NEUTRAL_SCALE),
        ],
        PlayMode::Loop,
    ))
}

/// Idle body tint for an emotion, applied as a constant color channel.
pub fn emotion_tint(emotion: TherapistEmotion) -> Color {
    match emotion {
        TherapistEmotion::Neutral => Color::new(0.93, 0.91, 0.88),
        TherapistEmotion::Empathetic => Color::new(0.95, 0.88, 0.82),
        TherapistEmotion::Encouraging => Color::new(0.90, 0.94, 0.84),
        TherapistEmotion::Concerned => Color::new(0.88, 0.87, 0.94),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{ChannelKind, Mixer};

    #[test]
    fn test_gesture_clips_return_to_neutral() {
        for gesture in [Gesture::Nod, Gesture::LeanForward, Gesture::OpenHands] {
            let clip = gesture.clip();
            let duration = clip.duration();
            let mut mixer = Mixer::default();
            mixer.set(ChannelKind::Gesture, clip, 0.0);
            // Past the clip end the mixer prunes it and the pose is neutral
            let state = mixer.sample(duration + 0.1);
            assert_eq!(state.rotation, Vec3::ZERO, "{:?}", gesture);
            assert_eq!(state.scale, Vec3::ONE, "{:?}", gesture);
        }
    }

    #[test]
    fn test_lean_forward_peaks_midway() {
        let mut mixer = Mixer::default();
        mixer.set(ChannelKind::Gesture, Gesture::LeanForward.clip(), 0.0);
        let mid = mixer.sample(1.0);
        assert!(mid.rotation.x > 0.3);
    }

    #[test]
    fn test_blink_is_one_shot() {
        let mut mixer = Mixer::default();
        mixer.set(ChannelKind::Blink, blink_clip(), 0.0);
        let closed = mixer.sample(0.07);
        assert!(closed.scale.y < 0.2);
        mixer.sample(1.0);
        assert!(!mixer.is_active(ChannelKind::Blink));
    }

    #[test]
    fn test_mouth_loop_repeats() {
        let mut mixer = Mixer::default();
        mixer.set(ChannelKind::Mouth, mouth_speaking_clip(), 0.0);
        // Well past one loop length it is still animating
        let state = mixer.sample(3.12);
        assert!(mixer.is_active(ChannelKind::Mouth));
        assert!(state.scale.y > 1.0);
    }

    #[test]
    fn test_emotion_tint_is_total() {
        for emotion in [
            TherapistEmotion::Neutral,
            TherapistEmotion::Empathetic,
            TherapistEmotion::Encouraging,
            TherapistEmotion::Concerned,
        ] {
            let tint = emotion_tint(emotion);
            assert!(tint.r > 0.0 && tint.g > 0.0 && tint.b > 0.0);
        }
    }
}
