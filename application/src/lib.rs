//! Application layer for halcyon
//!
//! This crate contains the ports to external collaborators (speech, dialogue
//! service, immersive runtime), the cancellable task scheduler, and the
//! long-lived controllers that coordinate a running session. It depends only
//! on the domain layer.

pub mod clock;
pub mod config;
pub mod ports;
pub mod scheduler;
pub mod use_cases;

// Re-export commonly used types
pub use clock::SceneClock;
pub use config::SessionParams;
pub use ports::{
    DialogueGateway, DialogueRequest, GatewayError, ImmersiveError, ImmersivePort,
    ImmersiveSession, ImmersiveState, NoSessionLogger, NullSpeechOutput, Pose, SessionContext,
    SessionEvent, SessionEventLogger, SpeechInputError, SpeechInputPort, SpeechOutputError,
    SpeechOutputPort, TranscriptEvent,
};
pub use scheduler::{Scheduler, TaskHandle};
pub use use_cases::{
    BreathingController, CharacterController, CharacterRig, DialogueCoordinator,
    SessionController,
};
