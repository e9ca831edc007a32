//! Dialogue turns, replies, and voice styling

pub mod entities;
pub mod reply;
pub mod voice;

pub use entities::{ConversationHistory, DialogueTurn, TurnRole};
pub use reply::{
    BREATHING_GUIDANCE_FALLBACK, FALLBACK_MESSAGE, SuggestedAction, TherapistReply, fallback_reply,
};
pub use voice::VoiceStyle;
