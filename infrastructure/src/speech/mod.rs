//! Speech engine adapters

mod host_bridge;

pub use host_bridge::{
    HostSpeechInput, HostSpeechOutput, SpeakRequest, TranscriptFeed, UnsupportedSpeechInput,
};
