//! Text-to-speech output port.

use async_trait::async_trait;
use halcyon_domain::VoiceStyle;
use thiserror::Error;

/// Errors from the speech synthesis engine
#[derive(Error, Debug)]
pub enum SpeechOutputError {
    #[error("Speech synthesis is not supported on this platform")]
    Unsupported,

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Playback interrupted")]
    Interrupted,
}

/// Port for spoken output.
///
/// `speak` resolves when playback completes. Adapters apply the
/// [`VoiceStyle`] for the one utterance and restore default voice parameters
/// afterwards, so a Concerned utterance never bleeds its slow rate into the
/// next Neutral one.
#[async_trait]
pub trait SpeechOutputPort: Send + Sync {
    async fn speak(&self, text: &str, style: VoiceStyle) -> Result<(), SpeechOutputError>;

    /// Cut off any in-flight utterance.
    fn stop(&self);

    fn is_speaking(&self) -> bool;
}

/// No-op implementation for tests and speech-less hosts.
pub struct NullSpeechOutput;

#[async_trait]
impl SpeechOutputPort for NullSpeechOutput {
    async fn speak(&self, _text: &str, _style: VoiceStyle) -> Result<(), SpeechOutputError> {
        Ok(())
    }

    fn stop(&self) {}

    fn is_speaking(&self) -> bool {
        false
    }
}
