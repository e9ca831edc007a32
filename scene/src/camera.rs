//! Camera framing.
//!
//! Default is a seated framing: eye height at a sitting posture, looking at
//! the therapist across the virtual room. Entering immersive mode replaces
//! the framing with the head-tracked origin reported by the XR runtime;
//! exiting restores the seated framing.

use halcyon_application::Pose;
use serde::{Deserialize, Serialize};

/// Camera position and orientation for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_deg: f32,
}

impl CameraPose {
    /// Seated default: sitting eye height, therapist ~1.8 m away at eye level.
    pub fn seated() -> Self {
        Self {
            position: [0.0, 1.2, 0.0],
            target: [0.0, 1.3, -1.8],
            fov_deg: 60.0,
        }
    }
}

/// Tracks whether the camera follows the seated framing or an immersive
/// head-tracked origin.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pose: CameraPose,
    immersive: bool,
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            pose: CameraPose::seated(),
            immersive: false,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn is_immersive(&self) -> bool {
        self.immersive
    }

    /// Reposition the camera origin to the head-tracked origin.
    pub fn enter_immersive(&mut self, origin: Pose) {
        let [x, y, z] = origin.position;
        // Look direction from yaw, level gaze
        let (sin, cos) = origin.yaw.sin_cos();
        self.pose = CameraPose {
            position: [x, y, z],
            target: [x - sin, y, z - cos],
            fov_deg: self.pose.fov_deg,
        };
        self.immersive = true;
    }

    /// Restore the seated framing.
    pub fn exit_immersive(&mut self) {
        self.pose = CameraPose::seated();
        self.immersive = false;
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_seated() {
        let rig = CameraRig::new();
        assert!(!rig.is_immersive());
        assert_eq!(rig.pose(), CameraPose::seated());
    }

    #[test]
    fn test_enter_and_exit_immersive() {
        let mut rig = CameraRig::new();
        let origin = Pose {
            position: [0.5, 1.6, 0.2],
            yaw: 0.0,
        };
        rig.enter_immersive(origin);
        assert!(rig.is_immersive());
        assert_eq!(rig.pose().position, [0.5, 1.6, 0.2]);
        // Level gaze straight ahead at yaw 0
        assert_eq!(rig.pose().target, [0.5, 1.6, -0.8]);

        rig.exit_immersive();
        assert!(!rig.is_immersive());
        assert_eq!(rig.pose(), CameraPose::seated());
    }
}
