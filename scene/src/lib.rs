//! Scene layer for halcyon
//!
//! This crate owns the render lifecycle of the 3D session: the backend
//! binding, camera and light, scene entities, and the render loop that
//! samples the animation mixers and reacts to session, surface, and
//! immersive events. It composes the application-layer controllers; hosts
//! inject the port adapters and the render backend.

pub mod backend;
pub mod camera;
pub mod entities;
pub mod manager;

// Re-export commonly used types
pub use backend::{
    HeadlessBackend, LightRig, RenderBackend, RenderedEntity, SceneError, SceneFrame,
    SurfaceDescriptor, SurfaceEvent,
};
pub use camera::{CameraPose, CameraRig};
pub use entities::SceneEntities;
pub use manager::SceneManager;
