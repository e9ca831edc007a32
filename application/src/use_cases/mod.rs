//! Long-lived controllers coordinating the session runtime.

pub mod breathing_controller;
pub mod character_controller;
pub mod dialogue_coordinator;
pub mod session_controller;

pub use breathing_controller::BreathingController;
pub use character_controller::{CharacterController, CharacterRig};
pub use dialogue_coordinator::DialogueCoordinator;
pub use session_controller::SessionController;
