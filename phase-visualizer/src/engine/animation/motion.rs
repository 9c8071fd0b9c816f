use std::f32::consts::TAU;

use crate::engine::phases::PhaseMotion;

/// Transform and opacity applied to the resident phase for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub rotation_y: f32,
    pub rotation_x: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Default for MotionSample {
    fn default() -> Self {
        Self {
            rotation_y: 0.0,
            rotation_x: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

impl PhaseMotion {
    /// Procedural spin and pulse at `clock_ms`. Reduced motion keeps the tilt
    /// but holds rotation and pulse still.
    pub fn sample(&self, clock_ms: f64, reduced_motion: bool, opacity: f32) -> MotionSample {
        if reduced_motion {
            return MotionSample {
                rotation_x: self.tilt,
                opacity,
                ..MotionSample::default()
            };
        }

        let t = (clock_ms / 1000.0) as f32;
        MotionSample {
            rotation_y: (t * self.spin_speed) % TAU,
            rotation_x: self.tilt,
            scale: 1.0 + self.pulse_amplitude * (t * self.pulse_speed * TAU).sin(),
            opacity,
        }
    }
}
