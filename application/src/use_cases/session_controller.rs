//! Session controller — the session state machine service.
//!
//! Owns the one [`SessionState`] entity and publishes a [`SessionSnapshot`]
//! through a `watch` channel after every mutation, so observers see each
//! transition exactly once and never a half-applied reset. While the session
//! is active a scheduler-owned ticker recomputes the elapsed duration once
//! per tick period; the ticker is cancelled the moment the session leaves
//! the active phase.

use crate::ports::session_logger::{NoSessionLogger, SessionEvent, SessionEventLogger};
use crate::scheduler::{Scheduler, TaskHandle};
use halcyon_domain::{SessionSnapshot, SessionState, TherapistEmotion, Transition};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

struct Inner {
    state: Mutex<SessionState>,
    started_at: Mutex<Option<Instant>>,
    ticker: Mutex<Option<TaskHandle>>,
    tx: watch::Sender<SessionSnapshot>,
    logger: Arc<dyn SessionEventLogger>,
}

/// Handle to the session state machine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
    scheduler: Scheduler,
    tick_period: Duration,
}

impl SessionController {
    pub fn new(scheduler: Scheduler, tick_period: Duration) -> Self {
        Self::with_logger(scheduler, tick_period, Arc::new(NoSessionLogger))
    }

    pub fn with_logger(
        scheduler: Scheduler,
        tick_period: Duration,
        logger: Arc<dyn SessionEventLogger>,
    ) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::initial());
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState::new()),
                started_at: Mutex::new(None),
                ticker: Mutex::new(None),
                tx,
                logger,
            }),
            scheduler,
            tick_period,
        }
    }

    /// Subscribe to state snapshots. The receiver always holds the latest.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner()).snapshot()
    }

    // ==================== Transitions ====================

    /// `Idle -> Active`; starts the duration ticker. Calling while already
    /// active is a no-op that leaves the running clock untouched.
    pub fn start(&self) {
        {
            let mut state = self.lock_state();
            if state.start() != Transition::Applied {
                debug!("start() ignored in phase {:?}", state.phase());
                return;
            }
            *self.lock_started_at() = Some(Instant::now());
            self.publish(&state);
        }

        let inner = self.inner.clone();
        let handle = self.scheduler.spawn_interval(self.tick_period, move || {
            let inner = inner.clone();
            async move {
                tick_duration(&inner);
            }
        });
        self.store_ticker(Some(handle));

        info!("Session started");
        self.inner
            .logger
            .log(SessionEvent::new("phase_changed", serde_json::json!({"phase": "active"})));
    }

    /// `Active -> Ended`; cancels the duration ticker immediately.
    pub fn end(&self) {
        {
            let mut state = self.lock_state();
            if state.end() != Transition::Applied {
                debug!("end() ignored in phase {:?}", state.phase());
                return;
            }
            self.publish(&state);
        }
        self.store_ticker(None);

        info!("Session ended");
        self.inner
            .logger
            .log(SessionEvent::new("phase_changed", serde_json::json!({"phase": "ended"})));
    }

    /// Return to `Idle`, restoring every field in one published snapshot.
    pub fn reset(&self) {
        {
            let mut state = self.lock_state();
            if state.reset() != Transition::Applied {
                return;
            }
            *self.lock_started_at() = None;
            self.publish(&state);
        }
        self.store_ticker(None);

        info!("Session reset");
        self.inner
            .logger
            .log(SessionEvent::new("phase_changed", serde_json::json!({"phase": "idle"})));
    }

    // ==================== Field mutators ====================

    pub fn set_breathing_active(&self, active: bool) {
        let mut state = self.lock_state();
        state.set_breathing_active(active);
        self.publish(&state);
        self.inner
            .logger
            .log(SessionEvent::new("breathing_toggled", serde_json::json!({"active": active})));
    }

    pub fn set_current_message(&self, message: impl Into<String>) {
        let mut state = self.lock_state();
        state.set_current_message(message);
        self.publish(&state);
    }

    pub fn set_therapist_emotion(&self, emotion: TherapistEmotion) {
        let mut state = self.lock_state();
        state.set_therapist_emotion(emotion);
        self.publish(&state);
    }

    pub fn increment_conversation(&self) {
        let mut state = self.lock_state();
        state.increment_conversation();
        self.publish(&state);
    }

    // ==================== Internals ====================

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_started_at(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.inner
            .started_at
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &SessionState) {
        // send_replace updates the value even with no subscribers yet, so a
        // late subscriber always sees the current state
        self.inner.tx.send_replace(state.snapshot());
    }

    /// Replace the ticker handle, cancelling the previous one.
    fn store_ticker(&self, handle: Option<TaskHandle>) {
        let mut slot = self.inner.ticker.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = slot.take() {
            old.cancel();
        }
        *slot = handle;
    }
}

fn tick_duration(inner: &Inner) {
    let started_at = *inner.started_at.lock().unwrap_or_else(|e| e.into_inner());
    let Some(started_at) = started_at else {
        return;
    };
    let secs = started_at.elapsed().as_secs();

    let mut state = inner.state.lock().unwrap_or_else(|e| e.into_inner());
    // set_duration_seconds refuses outside Active, so a straggling tick
    // racing the end() transition cannot resurrect the clock
    if state.set_duration_seconds(secs) {
        inner.tx.send_replace(state.snapshot());
    }
}
