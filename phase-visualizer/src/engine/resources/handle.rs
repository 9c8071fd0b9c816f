use bevy::math::Vec3;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::phases::PhaseId;

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one built set of phase buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl ResourceId {
    pub(crate) fn next() -> Self {
        Self(NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A line between two particles, optionally bowed through a quadratic control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub start: Vec3,
    pub end: Vec3,
    pub control: Option<Vec3>,
}

impl Connection {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Tessellate the connection into `segments + 1` points from start to end.
    pub fn points(&self, segments: usize) -> Vec<Vec3> {
        let Some(control) = self.control else {
            return vec![self.start, self.end];
        };

        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let a = self.start.lerp(control, t);
                let b = control.lerp(self.end, t);
                a.lerp(b, t)
            })
            .collect()
    }
}

/// Point and line buffers for one phase, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceHandle {
    pub id: ResourceId,
    pub phase: PhaseId,
    /// Flat XYZ, 3 floats per particle.
    pub positions: Vec<f32>,
    /// Flat linear RGB, 3 floats per particle.
    pub colors: Vec<f32>,
    pub sizes: Vec<f32>,
    pub connections: Vec<Connection>,
}

impl ResourceHandle {
    pub fn particle_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let i = index * 3;
        Vec3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    pub fn colors_rgba(&self) -> Vec<[f32; 4]> {
        self.colors
            .chunks_exact(3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2], 1.0])
            .collect()
    }

    /// Buffer lengths agree with the particle count.
    pub fn is_consistent(&self) -> bool {
        let count = self.sizes.len();
        self.positions.len() == count * 3 && self.colors.len() == count * 3
    }
}
