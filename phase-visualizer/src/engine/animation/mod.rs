//! Easing and tween primitives shared by the phase controller and the
//! camera and lighting directors.

pub mod motion;
pub mod tween;

use bevy::log::warn;
use bevy::math::curve::EaseFunction;

use crate::error::VisualizerError;

pub use motion::MotionSample;
pub use tween::{Animated, Blend, Tween, ease};

/// Optional host facilities. Missing ones degrade to immediate assignment or
/// no idle motion; phase cycling and rendering keep working either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capabilities {
    pub easing: Option<EaseFunction>,
    pub idle_motion: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            easing: Some(EaseFunction::CubicInOut),
            idle_motion: true,
        }
    }
}

impl Capabilities {
    /// No easing and no idle motion: every change is applied at once.
    pub fn immediate() -> Self {
        Self {
            easing: None,
            idle_motion: false,
        }
    }

    /// Log each missing facility once at setup.
    pub fn report_unsupported(&self) {
        if self.easing.is_none() {
            warn!(
                "{}; transitions will switch immediately",
                VisualizerError::UnsupportedFeature("easing")
            );
        }
        if !self.idle_motion {
            warn!(
                "{}; camera and lights hold still between transitions",
                VisualizerError::UnsupportedFeature("idle motion")
            );
        }
    }
}
