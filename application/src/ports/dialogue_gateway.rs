//! Dialogue generation gateway port.
//!
//! Defines the interface to the external dialogue-generation service. The
//! service is treated as unreliable: callers always hold a static fallback
//! and never surface a [`GatewayError`] to the user.

use async_trait::async_trait;
use halcyon_domain::{DialogueTurn, TherapistReply};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during dialogue gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Ambient facts about the running session, sent with every request.
///
/// `session_id` is an opaque correlation token for the (out-of-scope)
/// persistence backend; halcyon never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    pub session_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_mood: Option<String>,
    pub duration_seconds: u64,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, session_number: u32) -> Self {
        Self {
            session_id: session_id.into(),
            session_number,
            current_mood: None,
            duration_seconds: 0,
        }
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.current_mood = Some(mood.into());
        self
    }
}

/// One dialogue-service request: the transcript window plus session context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueRequest {
    pub conversation_history: Vec<DialogueTurn>,
    pub session_context: SessionContext,
}

/// Gateway for therapist reply generation
///
/// This port defines how the application layer reaches the dialogue service.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait DialogueGateway: Send + Sync {
    /// Generate the therapist's reply to the latest user turn in the request.
    async fn generate_reply(
        &self,
        request: &DialogueRequest,
    ) -> Result<TherapistReply, GatewayError>;

    /// Fetch a short guidance line spoken once a breathing exercise starts.
    async fn breathing_guidance(
        &self,
        context: &SessionContext,
    ) -> Result<String, GatewayError>;
}
