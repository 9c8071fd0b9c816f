//! Phase camera direction.
//!
//! Eases the camera pose and field of view toward each phase's target and
//! layers a small idle orbit on top.

/// Camera pose, director and idle orbit.
pub mod camera_director;

pub use camera_director::{CameraDirector, CameraPose, IdleOrbit};
