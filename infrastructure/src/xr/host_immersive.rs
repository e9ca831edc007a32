//! Immersive runtime adapters.
//!
//! [`HostImmersiveBridge`] adapts a host-owned XR runtime: the host drives
//! enter/exit transitions and head poses through a [`ImmersiveFeed`] handle.
//! [`UnsupportedImmersive`] is the degradation adapter for flat-only hosts.

use async_trait::async_trait;
use halcyon_application::{
    ImmersiveError, ImmersivePort, ImmersiveSession, ImmersiveState, Pose,
};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

/// Immersive adapter for devices with no XR runtime.
pub struct UnsupportedImmersive;

#[async_trait]
impl ImmersivePort for UnsupportedImmersive {
    fn is_supported(&self) -> bool {
        false
    }

    async fn create_session(&self) -> Result<Box<dyn ImmersiveSession>, ImmersiveError> {
        Err(ImmersiveError::Unsupported)
    }
}

/// Host-side handle for driving immersive state and head poses.
#[derive(Clone)]
pub struct ImmersiveFeed {
    state_tx: watch::Sender<ImmersiveState>,
    origin: Arc<Mutex<Pose>>,
}

impl ImmersiveFeed {
    pub fn enter(&self, origin: Pose) {
        *self.origin.lock().unwrap_or_else(|e| e.into_inner()) = origin;
        let _ = self.state_tx.send(ImmersiveState::EnteredImmersive);
    }

    pub fn exit(&self) {
        let _ = self.state_tx.send(ImmersiveState::ExitedImmersive);
    }

    pub fn update_origin(&self, origin: Pose) {
        *self.origin.lock().unwrap_or_else(|e| e.into_inner()) = origin;
    }
}

/// Immersive port bridged from a host-owned XR runtime.
pub struct HostImmersiveBridge {
    state_tx: watch::Sender<ImmersiveState>,
    origin: Arc<Mutex<Pose>>,
}

impl HostImmersiveBridge {
    pub fn new() -> (Self, ImmersiveFeed) {
        let (state_tx, _rx) = watch::channel(ImmersiveState::ExitedImmersive);
        let origin = Arc::new(Mutex::new(Pose::default()));
        let feed = ImmersiveFeed {
            state_tx: state_tx.clone(),
            origin: origin.clone(),
        };
        (Self { state_tx, origin }, feed)
    }
}

#[async_trait]
impl ImmersivePort for HostImmersiveBridge {
    fn is_supported(&self) -> bool {
        true
    }

    async fn create_session(&self) -> Result<Box<dyn ImmersiveSession>, ImmersiveError> {
        debug!("Host immersive session created");
        Ok(Box::new(HostImmersiveSession {
            state_rx: self.state_tx.subscribe(),
            state_tx: self.state_tx.clone(),
            origin: self.origin.clone(),
        }))
    }
}

struct HostImmersiveSession {
    state_rx: watch::Receiver<ImmersiveState>,
    state_tx: watch::Sender<ImmersiveState>,
    origin: Arc<Mutex<Pose>>,
}

#[async_trait]
impl ImmersiveSession for HostImmersiveSession {
    fn state(&self) -> watch::Receiver<ImmersiveState> {
        self.state_rx.clone()
    }

    fn origin(&self) -> Pose {
        *self.origin.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn end(&mut self) -> Result<(), ImmersiveError> {
        let _ = self.state_tx.send(ImmersiveState::ExitedImmersive);
        debug!("Host immersive session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_reports_and_fails() {
        let port = UnsupportedImmersive;
        assert!(!port.is_supported());
        assert!(matches!(
            port.create_session().await,
            Err(ImmersiveError::Unsupported)
        ));
    }

    #[tokio::test]
    async fn test_feed_drives_session_state() {
        let (port, feed) = HostImmersiveBridge::new();
        let session = port.create_session().await.unwrap();
        let mut rx = session.state();
        assert_eq!(*rx.borrow(), ImmersiveState::ExitedImmersive);

        let origin = Pose {
            position: [0.0, 1.7, 0.0],
            yaw: 0.3,
        };
        feed.enter(origin);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ImmersiveState::EnteredImmersive);
        assert_eq!(session.origin(), origin);

        feed.exit();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ImmersiveState::ExitedImmersive);
    }

    #[tokio::test]
    async fn test_end_publishes_exit() {
        let (port, feed) = HostImmersiveBridge::new();
        let mut session = port.create_session().await.unwrap();
        feed.enter(Pose::default());
        let mut rx = session.state();
        session.end().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ImmersiveState::ExitedImmersive);
    }
}
