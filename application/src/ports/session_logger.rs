//! Port for structured session-event logging.
//!
//! Separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, while this port captures the session
//! transcript (turns, phase changes, breathing toggles) in a
//! machine-readable format (JSONL).

use serde_json::Value;

/// A structured session event for logging.
pub struct SessionEvent {
    /// Event type identifier (e.g., "turn_completed", "phase_changed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SessionEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging session events to a structured log.
///
/// The `log` method is intentionally synchronous and non-fallible so logging
/// can never disrupt the session — failures are swallowed by the adapter.
pub trait SessionEventLogger: Send + Sync {
    fn log(&self, event: SessionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoSessionLogger;

impl SessionEventLogger for NoSessionLogger {
    fn log(&self, _event: SessionEvent) {}
}
