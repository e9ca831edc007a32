//! Channel bridges to the embedding host's speech engines.
//!
//! Halcyon is an embedded subsystem: the host owns the actual microphone
//! and synthesizer (platform speech APIs). These adapters bridge the ports
//! over channels — the host pushes recognized transcripts in through a
//! [`TranscriptFeed`], and pulls utterance requests out of a
//! [`SpeakRequest`] queue, acknowledging each when playback finishes.

use async_trait::async_trait;
use halcyon_application::{
    SpeechInputError, SpeechInputPort, SpeechOutputError, SpeechOutputPort, TranscriptEvent,
};
use halcyon_domain::VoiceStyle;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const TRANSCRIPT_BUFFER: usize = 32;
const SPEAK_BUFFER: usize = 8;

/// Host-side handle for pushing recognition results into the session.
#[derive(Clone)]
pub struct TranscriptFeed {
    tx: mpsc::Sender<TranscriptEvent>,
}

impl TranscriptFeed {
    /// Push one event. Returns false if the session stopped listening.
    pub async fn push(&self, event: TranscriptEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Non-blocking push for host callbacks that cannot await.
    pub fn try_push(&self, event: TranscriptEvent) -> bool {
        self.tx.try_send(event).is_ok()
    }
}

/// Speech input bridged from the embedding host.
///
/// `start_listening` hands the session the receiving end; the paired
/// [`TranscriptFeed`] stays with the host. Listening can be started once
/// per adapter instance.
pub struct HostSpeechInput {
    receiver: Mutex<Option<mpsc::Receiver<TranscriptEvent>>>,
    feed: TranscriptFeed,
    listening: AtomicBool,
}

impl HostSpeechInput {
    pub fn new() -> (Self, TranscriptFeed) {
        let (tx, rx) = mpsc::channel(TRANSCRIPT_BUFFER);
        let feed = TranscriptFeed { tx };
        (
            Self {
                receiver: Mutex::new(Some(rx)),
                feed: feed.clone(),
                listening: AtomicBool::new(false),
            },
            feed,
        )
    }
}

impl SpeechInputPort for HostSpeechInput {
    fn start_listening(&self) -> Result<mpsc::Receiver<TranscriptEvent>, SpeechInputError> {
        let mut slot = self.receiver.lock().unwrap_or_else(|e| e.into_inner());
        match slot.take() {
            Some(rx) => {
                self.listening.store(true, Ordering::SeqCst);
                Ok(rx)
            }
            None => Err(SpeechInputError::RecognizerError(
                "already listening".to_string(),
            )),
        }
    }

    fn stop_listening(&self) {
        if self.listening.swap(false, Ordering::SeqCst) {
            // Signal end-of-stream to the consumer; the host may keep its
            // feed handle, further pushes simply fail
            let _ = self.feed.try_push(TranscriptEvent::Ended);
            debug!("Host speech input stopped");
        }
    }

    fn is_supported(&self) -> bool {
        true
    }
}

/// Speech input adapter for hosts with no recognition capability.
pub struct UnsupportedSpeechInput;

impl SpeechInputPort for UnsupportedSpeechInput {
    fn start_listening(&self) -> Result<mpsc::Receiver<TranscriptEvent>, SpeechInputError> {
        Err(SpeechInputError::Unsupported)
    }

    fn stop_listening(&self) {}

    fn is_supported(&self) -> bool {
        false
    }
}

/// One utterance for the host synthesizer to play.
pub struct SpeakRequest {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    /// Host signals completion (or cancellation) by dropping or sending.
    pub done: oneshot::Sender<()>,
}

/// Speech output bridged to the embedding host.
///
/// `speak` enqueues a [`SpeakRequest`] and waits for the host's completion
/// ack, bounded by `playback_timeout` so a stalled host can never wedge a
/// dialogue turn. Voice parameters ride along per request, so the host's
/// synthesizer defaults are untouched between utterances.
pub struct HostSpeechOutput {
    tx: mpsc::Sender<SpeakRequest>,
    speaking: AtomicBool,
    playback_timeout: Duration,
}

impl HostSpeechOutput {
    pub fn new(playback_timeout: Duration) -> (Self, mpsc::Receiver<SpeakRequest>) {
        let (tx, rx) = mpsc::channel(SPEAK_BUFFER);
        (
            Self {
                tx,
                speaking: AtomicBool::new(false),
                playback_timeout,
            },
            rx,
        )
    }
}

#[async_trait]
impl SpeechOutputPort for HostSpeechOutput {
    async fn speak(&self, text: &str, style: VoiceStyle) -> Result<(), SpeechOutputError> {
        let (done_tx, done_rx) = oneshot::channel();
        let request = SpeakRequest {
            text: text.to_string(),
            rate: style.rate,
            pitch: style.pitch,
            done: done_tx,
        };

        self.tx
            .send(request)
            .await
            .map_err(|_| SpeechOutputError::SynthesisFailed("host queue closed".to_string()))?;

        self.speaking.store(true, Ordering::SeqCst);
        let result = tokio::time::timeout(self.playback_timeout, done_rx).await;
        self.speaking.store(false, Ordering::SeqCst);

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SpeechOutputError::Interrupted),
            Err(_) => {
                warn!("Host playback ack timed out");
                Err(SpeechOutputError::SynthesisFailed(
                    "playback timeout".to_string(),
                ))
            }
        }
    }

    fn stop(&self) {
        self.speaking.store(false, Ordering::SeqCst);
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }
}
