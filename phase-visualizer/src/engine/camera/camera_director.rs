use bevy::math::Vec3;
use bevy::math::curve::EaseFunction;

use crate::engine::animation::{Animated, Blend};
use crate::engine::phases::CameraTarget;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_degrees: f32,
}

impl CameraPose {
    pub fn from_target(target: &CameraTarget) -> Self {
        Self {
            position: target.position,
            look_at: target.look_at,
            fov_degrees: target.fov_degrees,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.look_at.is_finite() && self.fov_degrees.is_finite()
    }
}

impl Blend for CameraPose {
    fn blend(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.blend(&other.position, t),
            look_at: self.look_at.blend(&other.look_at, t),
            fov_degrees: self.fov_degrees.blend(&other.fov_degrees, t),
        }
    }
}

/// Continuous orbit and bob, sized relative to the viewing distance so it
/// reads the same in small and large phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleOrbit {
    pub orbit_fraction: f32,
    /// Radians per second.
    pub orbit_speed: f32,
    pub bob_fraction: f32,
    /// Radians per second.
    pub bob_speed: f32,
}

impl Default for IdleOrbit {
    fn default() -> Self {
        Self {
            orbit_fraction: 0.04,
            orbit_speed: 0.15,
            bob_fraction: 0.015,
            bob_speed: 0.4,
        }
    }
}

impl IdleOrbit {
    pub fn offset(&self, pose: &CameraPose, clock_ms: f64) -> Vec3 {
        let distance = pose.position.distance(pose.look_at);
        let t = (clock_ms / 1000.0) as f32;
        let orbit = distance * self.orbit_fraction;
        let angle = t * self.orbit_speed;
        Vec3::new(
            angle.sin() * orbit,
            (t * self.bob_speed).sin() * distance * self.bob_fraction,
            (angle.cos() - 1.0) * orbit,
        )
    }
}

pub struct CameraDirector {
    pose: Animated<CameraPose>,
    idle: Option<IdleOrbit>,
}

impl CameraDirector {
    pub fn new(initial: CameraPose, easing: Option<EaseFunction>, idle: Option<IdleOrbit>) -> Self {
        Self {
            pose: Animated::new(initial, easing),
            idle,
        }
    }

    pub fn animate_to(&mut self, target: &CameraTarget) {
        self.pose
            .animate_to(CameraPose::from_target(target), target.duration_ms);
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.pose.advance(dt_ms);
    }

    /// Eased base pose with the idle orbit added on top.
    pub fn sample(&self, clock_ms: f64) -> CameraPose {
        let mut pose = self.pose.current();
        if let Some(idle) = &self.idle {
            pose.position += idle.offset(&pose, clock_ms);
        }
        pose
    }

    pub fn base(&self) -> CameraPose {
        self.pose.current()
    }

    pub fn target(&self) -> CameraPose {
        self.pose.target()
    }

    pub fn is_animating(&self) -> bool {
        self.pose.is_animating()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(z: f32, fov: f32) -> CameraTarget {
        CameraTarget {
            position: Vec3::new(0.0, 0.0, z),
            look_at: Vec3::ZERO,
            fov_degrees: fov,
            duration_ms: 1000.0,
        }
    }

    #[test]
    fn eases_toward_the_phase_target() {
        let start = CameraPose::from_target(&target(70.0, 60.0));
        let mut director = CameraDirector::new(start, Some(EaseFunction::CubicInOut), None);
        director.animate_to(&target(650.0, 70.0));

        director.advance(500.0);
        let midway = director.sample(0.0);
        assert!(midway.position.z > 70.0 && midway.position.z < 650.0);
        assert!(midway.fov_degrees > 60.0 && midway.fov_degrees < 70.0);

        director.advance(500.0);
        assert_eq!(director.base(), CameraPose::from_target(&target(650.0, 70.0)));
        assert!(!director.is_animating());
    }

    #[test]
    fn idle_orbit_is_additive_and_small() {
        let pose = CameraPose::from_target(&target(100.0, 60.0));
        let director = CameraDirector::new(pose, None, Some(IdleOrbit::default()));

        assert_eq!(director.sample(0.0).position, pose.position);
        let later = director.sample(5_000.0);
        assert_ne!(later.position, pose.position);
        assert!(later.position.distance(pose.position) < 100.0 * 0.1);
        assert_eq!(director.base(), pose);
    }

    #[test]
    fn without_easing_the_target_applies_at_once() {
        let mut director = CameraDirector::new(CameraPose::from_target(&target(70.0, 60.0)), None, None);
        director.animate_to(&target(120.0, 58.0));
        assert_eq!(director.sample(1234.0).position.z, 120.0);
    }
}
