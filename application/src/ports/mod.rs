//! Port definitions — interfaces to external collaborators.
//!
//! Implementations (adapters) live in the infrastructure layer.

pub mod dialogue_gateway;
pub mod immersive;
pub mod session_logger;
pub mod speech_input;
pub mod speech_output;

pub use dialogue_gateway::{DialogueGateway, DialogueRequest, GatewayError, SessionContext};
pub use immersive::{ImmersiveError, ImmersivePort, ImmersiveSession, ImmersiveState, Pose};
pub use session_logger::{NoSessionLogger, SessionEvent, SessionEventLogger};
pub use speech_input::{SpeechInputError, SpeechInputPort, TranscriptEvent};
pub use speech_output::{NullSpeechOutput, SpeechOutputError, SpeechOutputPort};
