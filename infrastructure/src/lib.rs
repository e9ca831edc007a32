//! Infrastructure layer for halcyon
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus configuration file loading.

pub mod config;
pub mod dialogue;
pub mod logging;
pub mod speech;
pub mod xr;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDialogueConfig, FileLoggingConfig,
    FileSessionConfig,
};
pub use dialogue::HttpDialogueGateway;
pub use logging::JsonlSessionLogger;
pub use speech::{
    HostSpeechInput, HostSpeechOutput, SpeakRequest, TranscriptFeed, UnsupportedSpeechInput,
};
pub use xr::{HostImmersiveBridge, ImmersiveFeed, UnsupportedImmersive};
