//! Immersive (XR) session port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// Errors from the immersive runtime
#[derive(Error, Debug)]
pub enum ImmersiveError {
    #[error("Immersive mode is not supported on this device")]
    Unsupported,

    #[error("Session initialization failed: {0}")]
    InitFailed(String),

    #[error("Session ended unexpectedly: {0}")]
    SessionLost(String),
}

/// Head-tracked origin pose reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: [f32; 3],
    /// Yaw in radians around the vertical axis.
    pub yaw: f32,
}

/// Immersive presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmersiveState {
    EnteredImmersive,
    ExitedImmersive,
}

/// Port for starting immersive presentation.
///
/// `create_session` failing (or `is_supported` returning false) is non-fatal
/// everywhere: the scene continues flat.
#[async_trait]
pub trait ImmersivePort: Send + Sync {
    fn is_supported(&self) -> bool;

    async fn create_session(&self) -> Result<Box<dyn ImmersiveSession>, ImmersiveError>;
}

/// An active immersive session.
#[async_trait]
pub trait ImmersiveSession: Send + Sync {
    /// Observe enter/exit transitions.
    fn state(&self) -> watch::Receiver<ImmersiveState>;

    /// Current head-tracked origin, used to reposition the camera.
    fn origin(&self) -> Pose;

    /// End the session. Idempotent.
    async fn end(&mut self) -> Result<(), ImmersiveError>;
}
