//! HTTP adapter for the dialogue-generation service.
//!
//! POSTs the conversation window + session context as JSON and parses the
//! reply payload. Every failure mode (connect error, HTTP status, oversized
//! or malformed body) maps to a [`GatewayError`]; the coordinator upstream
//! substitutes the static fallback, so nothing here is user-facing.

use async_trait::async_trait;
use halcyon_application::{DialogueGateway, DialogueRequest, GatewayError, SessionContext};
use halcyon_domain::{Gesture, SuggestedAction, TherapistEmotion, TherapistReply};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Maximum accepted response body size (256 KB)
const MAX_BODY_SIZE: usize = 256 * 1024;

/// Wire format of a reply from the dialogue service.
///
/// Unknown enum strings are rejected as malformed rather than guessed at;
/// the caller's fallback handles them.
#[derive(Debug, Deserialize)]
struct ReplyDto {
    message: String,
    emotion: TherapistEmotion,
    #[serde(default)]
    gesture: Option<Gesture>,
    #[serde(default)]
    suggested_action: Option<SuggestedAction>,
}

#[derive(Debug, Serialize)]
struct GuidanceRequestDto<'a> {
    kind: &'static str,
    session_context: &'a SessionContext,
}

#[derive(Debug, Deserialize)]
struct GuidanceDto {
    message: String,
}

/// Dialogue service client over HTTP.
pub struct HttpDialogueGateway {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
}

impl HttpDialogueGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            model: None,
        }
    }

    /// Forward a model override to the service.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Vec<u8>, GatewayError> {
        let mut request = self.client.post(url).json(body);
        if let Some(model) = &self.model {
            request = request.header("X-Dialogue-Model", model);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;
        if body.len() > MAX_BODY_SIZE {
            return Err(GatewayError::InvalidResponse(format!(
                "response too large: {} bytes",
                body.len()
            )));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl DialogueGateway for HttpDialogueGateway {
    async fn generate_reply(
        &self,
        request: &DialogueRequest,
    ) -> Result<TherapistReply, GatewayError> {
        debug!(
            "Dialogue request: {} turns, session {}",
            request.conversation_history.len(),
            request.session_context.session_id
        );

        let body = self.post_json(&self.endpoint, request).await?;
        let dto: ReplyDto = serde_json::from_slice(&body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if dto.message.trim().is_empty() {
            return Err(GatewayError::InvalidResponse("empty message".to_string()));
        }

        Ok(TherapistReply {
            message: dto.message,
            emotion: dto.emotion,
            gesture: dto.gesture,
            suggested_action: dto.suggested_action,
        })
    }

    async fn breathing_guidance(
        &self,
        context: &SessionContext,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/guidance", self.endpoint.trim_end_matches('/'));
        let request = GuidanceRequestDto {
            kind: "breathing",
            session_context: context,
        };

        let body = self.post_json(&url, &request).await?;
        let dto: GuidanceDto = serde_json::from_slice(&body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if dto.message.trim().is_empty() {
            return Err(GatewayError::InvalidResponse("empty message".to_string()));
        }
        Ok(dto.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_dto_parses_full_payload() {
        let json = r#"{
            "message": "That sounds difficult.",
            "emotion": "empathetic",
            "gesture": "lean_forward",
            "suggested_action": "breathing"
        }"#;
        let dto: ReplyDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.message, "That sounds difficult.");
        assert_eq!(dto.emotion, TherapistEmotion::Empathetic);
        assert_eq!(dto.gesture, Some(Gesture::LeanForward));
        assert_eq!(dto.suggested_action, Some(SuggestedAction::Breathing));
    }

    #[test]
    fn test_reply_dto_optional_fields_absent() {
        let json = r#"{"message": "Go on.", "emotion": "encouraging"}"#;
        let dto: ReplyDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.gesture, None);
        assert_eq!(dto.suggested_action, None);
    }

    #[test]
    fn test_reply_dto_rejects_unknown_emotion() {
        let json = r#"{"message": "hm", "emotion": "melancholic"}"#;
        assert!(serde_json::from_str::<ReplyDto>(json).is_err());
    }

    #[test]
    fn test_request_serializes_history_and_context() {
        let request = DialogueRequest {
            conversation_history: vec![halcyon_domain::DialogueTurn::user("hello there")],
            session_context: SessionContext::new("abc-123", 4).with_mood("calm"),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["session_context"]["session_id"], "abc-123");
        assert_eq!(json["session_context"]["current_mood"], "calm");
        assert_eq!(json["conversation_history"][0]["text"], "hello there");
    }
}
