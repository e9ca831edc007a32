//! Domain layer for halcyon
//!
//! This crate contains the core logic of a guided therapy session: the
//! session state machine, the box-breathing cycle math, the keyframe
//! animation engine, and the dialogue turn model. It has no dependencies on
//! infrastructure, rendering, or async-runtime concerns.
//!
//! # Core Concepts
//!
//! ## Channels
//!
//! Every animated behavior owns a named channel on a [`Mixer`]; the final
//! visual state is composed deterministically at sample time instead of
//! letting behaviors overwrite each other's writes.
//!
//! ## Derived state
//!
//! Anything that can be recomputed is never stored: the breathing phase is a
//! pure function of elapsed time, session duration is recomputed from the
//! clock, and observers receive whole snapshots rather than field deltas.

pub mod animation;
pub mod breathing;
pub mod character;
pub mod core;
pub mod dialogue;
pub mod session;

// Re-export commonly used types
pub use animation::{ChannelKind, Clip, Interpolate, Keyframe, Mixer, PlayMode, Track, VisualState};
pub use breathing::{BreathingPhase, CYCLE_SECS, INACTIVE_INSTRUCTION, REST_VISUAL, cycle_clip, phase_at};
pub use character::{
    CharacterState, Gesture, MOUTH_NEUTRAL_SCALE, blink_clip, emotion_tint, idle_sway_clip,
    mouth_speaking_clip,
};
pub use core::{Color, DomainError, Vec3};
pub use dialogue::{
    BREATHING_GUIDANCE_FALLBACK, ConversationHistory, DialogueTurn, FALLBACK_MESSAGE,
    SuggestedAction, TherapistReply, TurnRole, VoiceStyle, fallback_reply,
};
pub use session::{SessionPhase, SessionSnapshot, SessionState, TherapistEmotion, Transition};
