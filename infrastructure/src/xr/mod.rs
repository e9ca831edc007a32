//! Immersive runtime adapters

mod host_immersive;

pub use host_immersive::{HostImmersiveBridge, ImmersiveFeed, UnsupportedImmersive};
