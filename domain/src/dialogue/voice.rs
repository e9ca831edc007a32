//! Voice parameter mapping for speech synthesis.

use crate::session::TherapistEmotion;
use serde::{Deserialize, Serialize};

/// Rate/pitch adjustments applied to a spoken utterance.
///
/// 1.0 is the synthesizer default on both axes. Adapters apply the style for
/// one utterance and restore defaults afterwards; the style itself is pure
/// data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceStyle {
    pub rate: f32,
    pub pitch: f32,
}

impl VoiceStyle {
    pub const DEFAULT: VoiceStyle = VoiceStyle {
        rate: 1.0,
        pitch: 1.0,
    };

    /// Total mapping from emotion to voice parameters. A new emotion variant
    /// fails to compile until it gets a style here.
    pub fn for_emotion(emotion: TherapistEmotion) -> VoiceStyle {
        match emotion {
            TherapistEmotion::Neutral => VoiceStyle {
                rate: 1.0,
                pitch: 1.0,
            },
            TherapistEmotion::Empathetic => VoiceStyle {
                rate: 0.9,
                pitch: 0.95,
            },
            TherapistEmotion::Encouraging => VoiceStyle {
                rate: 1.05,
                pitch: 1.1,
            },
            TherapistEmotion::Concerned => VoiceStyle {
                rate: 0.85,
                pitch: 0.9,
            },
        }
    }
}

impl Default for VoiceStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}
