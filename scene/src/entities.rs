//! Scene entity construction.
//!
//! The manager owns three visual targets: the environment shell, the
//! therapist character rig (body + mouth), and the breathing orb. Each has
//! its own [`Mixer`]; controllers animate channels, the render loop samples.

use halcyon_application::CharacterRig;
use halcyon_domain::{Color, Mixer, Vec3, VisualState};
use std::sync::{Arc, Mutex};

/// Entity names used in rendered frames and logs.
pub const ENVIRONMENT: &str = "environment";
pub const CHARACTER_BODY: &str = "character.body";
pub const CHARACTER_MOUTH: &str = "character.mouth";
pub const BREATHING_ORB: &str = "breathing_orb";

/// The scene's animated targets.
pub struct SceneEntities {
    pub environment: Arc<Mutex<Mixer>>,
    pub character: CharacterRig,
    pub orb: Arc<Mutex<Mixer>>,
}

impl SceneEntities {
    /// Build the default room: warm dim environment, neutral character,
    /// resting orb. Controllers overwrite bases where they own them (the
    /// breathing controller pins the orb's base to the resting visual).
    pub fn build() -> Self {
        let environment = VisualState {
            scale: Vec3::new(6.0, 3.0, 6.0),
            color: Color::new(0.16, 0.17, 0.22),
            opacity: 1.0,
            rotation: Vec3::ZERO,
        };

        Self {
            environment: Arc::new(Mutex::new(Mixer::new(environment))),
            character: CharacterRig::new(),
            orb: Arc::new(Mutex::new(Mixer::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_produces_distinct_targets() {
        let entities = SceneEntities::build();
        let env = entities.environment.lock().unwrap().base();
        let orb = entities.orb.lock().unwrap().base();
        assert_ne!(env, orb);
        assert_eq!(env.scale, Vec3::new(6.0, 3.0, 6.0));
    }
}
