use bevy::math::curve::EaseFunction;
use std::f32::consts::TAU;

use crate::engine::animation::{Animated, Blend};
use crate::engine::phases::LightingProfile;

/// Ambient breathing depth as a fraction of the ambient level.
const BREATH_DEPTH: f32 = 0.06;
/// Breaths per second.
const BREATH_RATE: f32 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightLevels {
    pub ambient: f32,
    pub key: f32,
    pub rim: f32,
}

impl From<&LightingProfile> for LightLevels {
    fn from(profile: &LightingProfile) -> Self {
        Self {
            ambient: profile.ambient,
            key: profile.key,
            rim: profile.rim,
        }
    }
}

impl Blend for LightLevels {
    fn blend(&self, other: &Self, t: f32) -> Self {
        Self {
            ambient: self.ambient.blend(&other.ambient, t),
            key: self.key.blend(&other.key, t),
            rim: self.rim.blend(&other.rim, t),
        }
    }
}

pub struct LightingDirector {
    levels: Animated<LightLevels>,
    breathing: bool,
}

impl LightingDirector {
    pub fn new(initial: LightLevels, easing: Option<EaseFunction>, breathing: bool) -> Self {
        Self {
            levels: Animated::new(initial, easing),
            breathing,
        }
    }

    pub fn animate_to(&mut self, profile: &LightingProfile, duration_ms: f64) {
        self.levels.animate_to(LightLevels::from(profile), duration_ms);
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.levels.advance(dt_ms);
    }

    pub fn sample(&self, clock_ms: f64) -> LightLevels {
        let mut levels = self.levels.current();
        if self.breathing {
            let t = (clock_ms / 1000.0) as f32;
            levels.ambient *= 1.0 + BREATH_DEPTH * (t * BREATH_RATE * TAU).sin();
        }
        levels
    }

    pub fn base(&self) -> LightLevels {
        self.levels.current()
    }

    pub fn is_animating(&self) -> bool {
        self.levels.is_animating()
    }
}
