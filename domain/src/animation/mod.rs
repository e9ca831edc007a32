//! Animation timeline engine.
//!
//! Keyframe tracks ([`Track`]) produce interpolated values at arbitrary query
//! times; named channels ([`ChannelKind`]) on a [`Mixer`] compose multiple
//! concurrent behaviors over one visual target deterministically.

pub mod channel;
pub mod keyframe;

pub use channel::{ChannelKind, Clip, Mixer, VisualState};
pub use keyframe::{Interpolate, Keyframe, PlayMode, Track};
