//! Session state machine entities

pub mod entities;

pub use entities::{SessionPhase, SessionSnapshot, SessionState, TherapistEmotion, Transition};
