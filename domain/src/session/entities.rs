//! Session domain entities

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a therapy session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Active,
    Ended,
}

/// The therapist's displayed emotional register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TherapistEmotion {
    Neutral,
    Empathetic,
    Encouraging,
    Concerned,
}

impl Default for TherapistEmotion {
    fn default() -> Self {
        TherapistEmotion::Neutral
    }
}

/// Mutable state of one therapy session (Entity).
///
/// Owned by the application-layer session controller; everything else sees
/// immutable [`SessionSnapshot`]s. Transition guards live here so the state
/// can never be driven into an invalid shape, no matter which controller
/// method was called.
#[derive(Debug, Clone)]
pub struct SessionState {
    phase: SessionPhase,
    duration_seconds: u64,
    conversation_count: u32,
    breathing_active: bool,
    current_message: Option<String>,
    therapist_emotion: TherapistEmotion,
}

/// Outcome of a requested phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The phase changed.
    Applied,
    /// The request was a guarded no-op (e.g. `start()` while already active).
    Ignored,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            duration_seconds: 0,
            conversation_count: 0,
            breathing_active: false,
            current_message: None,
            therapist_emotion: TherapistEmotion::Neutral,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn conversation_count(&self) -> u32 {
        self.conversation_count
    }

    pub fn breathing_active(&self) -> bool {
        self.breathing_active
    }

    pub fn current_message(&self) -> Option<&str> {
        self.current_message.as_deref()
    }

    pub fn therapist_emotion(&self) -> TherapistEmotion {
        self.therapist_emotion
    }

    // ==================== Transitions ====================

    /// `Idle -> Active`. Starting an already-active session is ignored and
    /// must not disturb the running duration clock.
    pub fn start(&mut self) -> Transition {
        if self.phase != SessionPhase::Idle {
            return Transition::Ignored;
        }
        self.phase = SessionPhase::Active;
        self.duration_seconds = 0;
        Transition::Applied
    }

    /// `Active -> Ended`.
    pub fn end(&mut self) -> Transition {
        if self.phase != SessionPhase::Active {
            return Transition::Ignored;
        }
        self.phase = SessionPhase::Ended;
        self.breathing_active = false;
        Transition::Applied
    }

    /// `Ended -> Idle`, restoring every field to its initial value. Also
    /// permitted from `Active` as an abort path; only `Idle -> Idle` is a
    /// no-op.
    pub fn reset(&mut self) -> Transition {
        if self.phase == SessionPhase::Idle {
            return Transition::Ignored;
        }
        *self = SessionState::new();
        Transition::Applied
    }

    // ==================== Field mutators ====================

    /// Overwrite the derived duration. Only meaningful while active; the
    /// guard keeps a straggling tick from resurrecting a finished session's
    /// clock.
    pub fn set_duration_seconds(&mut self, secs: u64) -> bool {
        if self.phase != SessionPhase::Active {
            return false;
        }
        self.duration_seconds = secs;
        true
    }

    pub fn set_breathing_active(&mut self, active: bool) {
        self.breathing_active = active;
    }

    pub fn set_current_message(&mut self, message: impl Into<String>) {
        self.current_message = Some(message.into());
    }

    pub fn set_therapist_emotion(&mut self, emotion: TherapistEmotion) {
        self.therapist_emotion = emotion;
    }

    pub fn increment_conversation(&mut self) {
        self.conversation_count += 1;
    }

    /// Immutable snapshot for observers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            duration_seconds: self.duration_seconds,
            conversation_count: self.conversation_count,
            breathing_active: self.breathing_active,
            current_message: self.current_message.clone(),
            therapist_emotion: self.therapist_emotion,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view of a [`SessionState`], published to observers as a unit so
/// no subscriber ever sees a half-applied mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub duration_seconds: u64,
    pub conversation_count: u32,
    pub breathing_active: bool,
    pub current_message: Option<String>,
    pub therapist_emotion: TherapistEmotion,
}

impl SessionSnapshot {
    pub fn initial() -> Self {
        SessionState::new().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SessionState::new();
        assert_eq!(state.phase(), SessionPhase::Idle);
        assert_eq!(state.duration_seconds(), 0);
        assert_eq!(state.conversation_count(), 0);
        assert!(!state.breathing_active());
        assert!(state.current_message().is_none());
    }

    #[test]
    fn test_full_lifecycle() {
        let mut state = SessionState::new();
        assert_eq!(state.start(), Transition::Applied);
        assert_eq!(state.phase(), SessionPhase::Active);
        assert_eq!(state.end(), Transition::Applied);
        assert_eq!(state.phase(), SessionPhase::Ended);
        assert_eq!(state.reset(), Transition::Applied);
        assert_eq!(state.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_no_idle_to_ended() {
        let mut state = SessionState::new();
        assert_eq!(state.end(), Transition::Ignored);
        assert_eq!(state.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_nothing_leaves_ended_except_reset() {
        let mut state = SessionState::new();
        state.start();
        state.end();
        assert_eq!(state.start(), Transition::Ignored);
        assert_eq!(state.end(), Transition::Ignored);
        assert_eq!(state.phase(), SessionPhase::Ended);
        assert_eq!(state.reset(), Transition::Applied);
    }

    #[test]
    fn test_double_start_is_ignored() {
        let mut state = SessionState::new();
        state.start();
        state.set_duration_seconds(42);
        assert_eq!(state.start(), Transition::Ignored);
        // The running clock is untouched by the ignored start
        assert_eq!(state.duration_seconds(), 42);
    }

    #[test]
    fn test_reset_restores_every_field() {
        let mut state = SessionState::new();
        state.start();
        state.set_duration_seconds(90);
        state.increment_conversation();
        state.set_breathing_active(true);
        state.set_current_message("hello");
        state.set_therapist_emotion(TherapistEmotion::Encouraging);

        state.reset();
        assert_eq!(state.snapshot(), SessionSnapshot::initial());
    }

    #[test]
    fn test_duration_only_advances_while_active() {
        let mut state = SessionState::new();
        assert!(!state.set_duration_seconds(5));
        state.start();
        assert!(state.set_duration_seconds(5));
        state.end();
        assert!(!state.set_duration_seconds(10));
        assert_eq!(state.duration_seconds(), 5);
    }

    #[test]
    fn test_end_stops_breathing() {
        let mut state = SessionState::new();
        state.start();
        state.set_breathing_active(true);
        state.end();
        assert!(!state.breathing_active());
    }

    #[test]
    fn test_duration_zero_after_start_and_reset() {
        let mut state = SessionState::new();
        state.start();
        state.set_duration_seconds(30);
        state.end();
        state.reset();
        assert_eq!(state.duration_seconds(), 0);
        state.start();
        assert_eq!(state.duration_seconds(), 0);
    }
}
