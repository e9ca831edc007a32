//! Therapist reply value objects and the fixed fallback.

use crate::character::Gesture;
use crate::session::TherapistEmotion;
use serde::{Deserialize, Serialize};

/// Follow-up the dialogue service can suggest alongside a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Breathing,
    Grounding,
    EndSession,
}

/// A generated therapist response: what to say, how to present it, and an
/// optional suggested follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapistReply {
    pub message: String,
    pub emotion: TherapistEmotion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture: Option<Gesture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<SuggestedAction>,
}

/// Message used when the dialogue service fails or returns something
/// unusable. Session continuity beats strict correctness: the user sees a
/// warm response, never an error.
pub const FALLBACK_MESSAGE: &str =
    "I'm here with you. Let's take a slow breath together — would you like to try \
     a short breathing exercise?";

/// Guidance line spoken when the supplementary breathing-guidance fetch
/// fails after a breathing exercise starts.
pub const BREATHING_GUIDANCE_FALLBACK: &str =
    "Follow the circle as it grows and shrinks. In through your nose, hold, \
     and out through your mouth.";

/// The fixed reply substituted for any dialogue-service failure.
pub fn fallback_reply() -> TherapistReply {
    TherapistReply {
        message: FALLBACK_MESSAGE.to_string(),
        emotion: TherapistEmotion::Empathetic,
        gesture: Some(Gesture::Nod),
        suggested_action: Some(SuggestedAction::Breathing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_reply_shape() {
        let reply = fallback_reply();
        assert_eq!(reply.emotion, TherapistEmotion::Empathetic);
        assert_eq!(reply.gesture, Some(Gesture::Nod));
        assert_eq!(reply.suggested_action, Some(SuggestedAction::Breathing));
        assert!(!reply.message.is_empty());
    }

    #[test]
    fn test_reply_serde_round_trip() {
        let reply = fallback_reply();
        let json = serde_json::to_string(&reply).unwrap();
        let back: TherapistReply = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reply);
    }

    #[test]
    fn test_optional_fields_omitted_when_none() {
        let reply = TherapistReply {
            message: "hi".to_string(),
            emotion: TherapistEmotion::Neutral,
            gesture: None,
            suggested_action: None,
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert!(!json.contains("gesture"));
        assert!(!json.contains("suggested_action"));
    }
}
