//! Dialogue turn entities and bounded conversation history

use super::reply::{SuggestedAction, TherapistReply};
use crate::character::Gesture;
use crate::session::TherapistEmotion;
use serde::{Deserialize, Serialize};

/// Role of a turn in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One user utterance or assistant response (Entity).
///
/// Emotion, gesture, and suggested action are present only on assistant
/// turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub role: TurnRole,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<TherapistEmotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gesture: Option<Gesture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<SuggestedAction>,
}

impl DialogueTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            emotion: None,
            gesture: None,
            suggested_action: None,
        }
    }

    pub fn assistant(reply: &TherapistReply) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: reply.message.clone(),
            emotion: Some(reply.emotion),
            gesture: reply.gesture,
            suggested_action: reply.suggested_action,
        }
    }
}

/// Conversation history retained for the lifetime of a session.
///
/// The full transcript is kept; only the trailing window (default 10 turns)
/// is handed to the dialogue service as context.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: Vec<DialogueTurn>,
    window: usize,
}

impl ConversationHistory {
    pub const DEFAULT_WINDOW: usize = 10;

    pub fn new(window: usize) -> Self {
        Self {
            turns: Vec::new(),
            window: window.max(1),
        }
    }

    pub fn push(&mut self, turn: DialogueTurn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turns, at most `window` of them, oldest first.
    pub fn recent(&self) -> &[DialogueTurn] {
        let start = self.turns.len().saturating_sub(self.window);
        &self.turns[start..]
    }

    /// Discard the transcript (session reset).
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_respects_window() {
        let mut history = ConversationHistory::new(3);
        for i in 0..5 {
            history.push(DialogueTurn::user(format!("turn {}", i)));
        }
        let recent = history.recent();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].text, "turn 2");
        assert_eq!(recent[2].text, "turn 4");
    }

    #[test]
    fn test_recent_shorter_than_window() {
        let mut history = ConversationHistory::new(10);
        history.push(DialogueTurn::user("only one"));
        assert_eq!(history.recent().len(), 1);
    }

    #[test]
    fn test_clear_discards_transcript() {
        let mut history = ConversationHistory::default();
        history.push(DialogueTurn::user("hello"));
        history.clear();
        assert!(history.is_empty());
        assert!(history.recent().is_empty());
    }

    #[test]
    fn test_assistant_turn_carries_reply_fields() {
        let reply = TherapistReply {
            message: "Tell me more".to_string(),
            emotion: TherapistEmotion::Encouraging,
            gesture: Some(Gesture::Nod),
            suggested_action: None,
        };
        let turn = DialogueTurn::assistant(&reply);
        assert_eq!(turn.role, TurnRole::Assistant);
        assert_eq!(turn.emotion, Some(TherapistEmotion::Encouraging));
        assert_eq!(turn.gesture, Some(Gesture::Nod));
        assert_eq!(turn.suggested_action, None);
    }
}
