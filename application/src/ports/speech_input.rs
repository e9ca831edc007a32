//! Speech-to-text input port.

use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from the speech recognition engine
#[derive(Error, Debug)]
pub enum SpeechInputError {
    #[error("Speech recognition is not supported on this platform")]
    Unsupported,

    #[error("Microphone unavailable: {0}")]
    MicrophoneUnavailable(String),

    #[error("Recognizer error: {0}")]
    RecognizerError(String),
}

/// Transcription events emitted by the recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// A partial hypothesis; never triggers a dialogue turn.
    Interim(String),
    /// A finalized utterance.
    Final(String),
    /// The recognizer stopped (end of stream or stop_listening).
    Ended,
}

/// Port for continuous speech recognition.
///
/// `start_listening` hands back the event stream; dropping the receiver or
/// calling `stop_listening` ends recognition. Hosts that cannot provide
/// speech report `is_supported() == false` and the session degrades to a
/// listening-free experience.
pub trait SpeechInputPort: Send + Sync {
    fn start_listening(&self) -> Result<mpsc::Receiver<TranscriptEvent>, SpeechInputError>;

    fn stop_listening(&self);

    fn is_supported(&self) -> bool;
}
