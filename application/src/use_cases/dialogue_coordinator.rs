//! Spoken dialogue coordinator.
//!
//! Bridges speech input, the dialogue service, speech output, and the
//! session/character controllers into one turn-taking protocol:
//!
//! 1. A final transcript above the length threshold arrives while no turn
//!    is processing (concurrent transcripts are dropped, not queued).
//! 2. The transcript plus the trailing history window goes to the gateway.
//! 3. The reply's emotion and message land in the session state, the
//!    gesture fires on the character, and the message is spoken with the
//!    emotion's voice style.
//! 4. A `Breathing` suggestion schedules the exercise after a fixed delay,
//!    then fetches and speaks supplementary guidance.
//!
//! The gateway is treated as unreliable: any error or timeout is replaced
//! by the fixed empathetic fallback reply. The user never sees a failure.

use crate::config::SessionParams;
use crate::ports::dialogue_gateway::{DialogueGateway, DialogueRequest, SessionContext};
use crate::ports::session_logger::{NoSessionLogger, SessionEvent, SessionEventLogger};
use crate::ports::speech_input::TranscriptEvent;
use crate::ports::speech_output::SpeechOutputPort;
use crate::scheduler::Scheduler;
use crate::use_cases::character_controller::CharacterController;
use crate::use_cases::session_controller::SessionController;
use halcyon_domain::{
    BREATHING_GUIDANCE_FALLBACK, ConversationHistory, DialogueTurn, SuggestedAction,
    TherapistEmotion, TherapistReply, VoiceStyle, fallback_reply,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct Inner {
    gateway: Arc<dyn DialogueGateway>,
    speech_out: Arc<dyn SpeechOutputPort>,
    session: SessionController,
    character: CharacterController,
    scheduler: Scheduler,
    history: Mutex<ConversationHistory>,
    processing: AtomicBool,
    context: SessionContext,
    params: SessionParams,
    logger: Arc<dyn SessionEventLogger>,
}

/// Coordinator for spoken conversation turns. Cheap to clone.
#[derive(Clone)]
pub struct DialogueCoordinator {
    inner: Arc<Inner>,
}

impl DialogueCoordinator {
    pub fn new(
        gateway: Arc<dyn DialogueGateway>,
        speech_out: Arc<dyn SpeechOutputPort>,
        session: SessionController,
        character: CharacterController,
        scheduler: Scheduler,
        context: SessionContext,
        params: SessionParams,
    ) -> Self {
        let history = ConversationHistory::new(params.history_window);
        Self {
            inner: Arc::new(Inner {
                gateway,
                speech_out,
                session,
                character,
                scheduler,
                history: Mutex::new(history),
                processing: AtomicBool::new(false),
                context,
                params,
                logger: Arc::new(NoSessionLogger),
            }),
        }
    }

    /// Attach a structured event logger.
    pub fn with_logger(mut self, logger: Arc<dyn SessionEventLogger>) -> Self {
        // Sole owner until the coordinator is cloned, so this cannot fail in
        // practice; fall back to leaving the no-op logger in place.
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.logger = logger;
        }
        self
    }

    /// Drain transcript events until the channel closes.
    pub async fn run(&self, mut transcripts: mpsc::Receiver<TranscriptEvent>) {
        while let Some(event) = transcripts.recv().await {
            match event {
                TranscriptEvent::Final(text) => self.handle_transcript(&text).await,
                TranscriptEvent::Interim(_) => {}
                TranscriptEvent::Ended => break,
            }
        }
        debug!("Transcript stream ended");
    }

    /// Process one finalized transcript. Too-short transcripts are ignored;
    /// transcripts arriving while a turn is in flight are dropped so at most
    /// one turn is ever processing.
    pub async fn handle_transcript(&self, text: &str) {
        if text.chars().count() <= self.inner.params.min_transcript_chars {
            debug!("Transcript below threshold, ignoring");
            return;
        }

        if self
            .inner
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Turn already processing, transcript dropped");
            return;
        }

        self.process_turn(text).await;
        self.inner.processing.store(false, Ordering::SeqCst);
    }

    pub fn is_processing(&self) -> bool {
        self.inner.processing.load(Ordering::SeqCst)
    }

    /// Conversation history length (full transcript, not just the window).
    pub fn history_len(&self) -> usize {
        self.lock_history().len()
    }

    /// Discard the transcript (session reset).
    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    // ==================== Turn protocol ====================

    async fn process_turn(&self, text: &str) {
        let request = {
            let mut history = self.lock_history();
            history.push(DialogueTurn::user(text));
            DialogueRequest {
                conversation_history: history.recent().to_vec(),
                session_context: self.current_context(),
            }
        };

        let reply = match tokio::time::timeout(
            self.inner.params.dialogue_timeout,
            self.inner.gateway.generate_reply(&request),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!("Dialogue service failed, using fallback: {}", e);
                fallback_reply()
            }
            Err(_) => {
                warn!("Dialogue service timed out, using fallback");
                fallback_reply()
            }
        };

        self.apply_reply(&reply).await;
    }

    async fn apply_reply(&self, reply: &TherapistReply) {
        let inner = &self.inner;

        inner.session.set_therapist_emotion(reply.emotion);
        inner.session.set_current_message(&reply.message);

        if let Some(gesture) = reply.gesture {
            inner.character.perform_gesture(gesture);
        }

        inner.character.set_speaking(true);
        let style = VoiceStyle::for_emotion(reply.emotion);
        if let Err(e) = inner.speech_out.speak(&reply.message, style).await {
            warn!("Speech synthesis failed: {}", e);
        }
        inner.character.set_speaking(false);

        {
            let mut history = self.lock_history();
            history.push(DialogueTurn::assistant(reply));
        }
        inner.session.increment_conversation();

        inner.logger.log(SessionEvent::new(
            "turn_completed",
            serde_json::json!({
                "message": reply.message,
                "emotion": reply.emotion,
                "gesture": reply.gesture,
                "suggested_action": reply.suggested_action,
            }),
        ));
        info!("Turn completed ({} total)", self.inner.session.snapshot().conversation_count);

        if reply.suggested_action == Some(SuggestedAction::Breathing) {
            self.schedule_breathing();
        }
    }

    /// After the configured delay, raise the session's breathing flag (the
    /// scene reacts by starting the exercise), then fetch and speak the
    /// supplementary guidance line.
    fn schedule_breathing(&self) {
        let delay = self.inner.params.breathing_start_delay;
        let scheduler = self.inner.scheduler.clone();
        let inner = self.inner.clone();
        scheduler.spawn_after(delay, async move {
            inner.session.set_breathing_active(true);

            let guidance = match inner
                .gateway
                .breathing_guidance(&contextualize(&inner))
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    warn!("Breathing guidance fetch failed, using fallback: {}", e);
                    BREATHING_GUIDANCE_FALLBACK.to_string()
                }
            };

            let style = VoiceStyle::for_emotion(TherapistEmotion::Empathetic);
            if let Err(e) = inner.speech_out.speak(&guidance, style).await {
                warn!("Speech synthesis failed for guidance: {}", e);
            }
        });
    }

    // ==================== Internals ====================

    fn current_context(&self) -> SessionContext {
        contextualize(&self.inner)
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, ConversationHistory> {
        self.inner.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn contextualize(inner: &Inner) -> SessionContext {
    let snapshot = inner.session.snapshot();
    let mut context = inner.context.clone();
    context.duration_seconds = snapshot.duration_seconds;
    context
}
