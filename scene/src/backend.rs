//! Render backend abstraction.
//!
//! The actual 3D engine is an external collaborator: the scene layer only
//! needs to bind it to an output surface, push composed frames, and tear the
//! binding down. [`HeadlessBackend`] implements the contract without a GPU
//! and is used by tests and by hosts that mount the session logic without a
//! visible surface.

use crate::camera::CameraPose;
use halcyon_domain::VisualState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the scene lifecycle
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Render backend error: {0}")]
    BackendError(String),

    #[error("Scene is already mounted")]
    AlreadyMounted,

    #[error("Scene is not mounted")]
    NotMounted,

    #[error("Speech input unavailable: {0}")]
    SpeechUnavailable(String),
}

/// Description of the output surface the backend binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceDescriptor {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceDescriptor {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Window-level events delivered by the embedding host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Resized { width: u32, height: u32 },
    Closed,
}

/// Directional key light for the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightRig {
    pub direction: [f32; 3],
    pub intensity: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        // Soft key light from above and slightly behind the camera
        Self {
            direction: [-0.2, -1.0, -0.4],
            intensity: 0.9,
        }
    }
}

/// One entity's composed visual state for a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEntity {
    pub name: &'static str,
    pub visual: VisualState,
}

/// Everything the backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    pub time_secs: f32,
    pub camera: CameraPose,
    pub light: LightRig,
    pub entities: Vec<RenderedEntity>,
}

/// Port to the rendering engine.
///
/// `dispose` must be idempotent; the lifecycle manager calls it on every
/// teardown path.
pub trait RenderBackend: Send {
    fn bind(&mut self, surface: &SurfaceDescriptor) -> Result<(), SceneError>;

    fn resize(&mut self, width: u32, height: u32);

    fn present(&mut self, frame: &SceneFrame);

    fn dispose(&mut self);
}

/// In-memory backend: records frames instead of drawing them.
pub struct HeadlessBackend {
    bound: Option<SurfaceDescriptor>,
    frames_presented: u64,
    last_frame: Option<SceneFrame>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            bound: None,
            frames_presented: 0,
            last_frame: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn surface(&self) -> Option<SurfaceDescriptor> {
        self.bound
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn last_frame(&self) -> Option<&SceneFrame> {
        self.last_frame.as_ref()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn bind(&mut self, surface: &SurfaceDescriptor) -> Result<(), SceneError> {
        if self.bound.is_some() {
            return Err(SceneError::AlreadyMounted);
        }
        self.bound = Some(*surface);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = &mut self.bound {
            surface.width = width;
            surface.height = height;
        }
    }

    fn present(&mut self, frame: &SceneFrame) {
        if self.bound.is_none() {
            return;
        }
        self.frames_presented += 1;
        self.last_frame = Some(frame.clone());
    }

    fn dispose(&mut self) {
        self.bound = None;
        self.last_frame = None;
    }
}
