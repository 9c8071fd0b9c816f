use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::device::DeviceTier;
use crate::error::{VisualizerError, VisualizerResult};

/// Identifier of a built-in phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseId {
    Neuron,
    Brain,
    Network,
    Cosmos,
}

impl PhaseId {
    pub const ALL: [PhaseId; 4] = [
        PhaseId::Neuron,
        PhaseId::Brain,
        PhaseId::Network,
        PhaseId::Cosmos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Neuron => "neuron",
            Self::Brain => "brain",
            Self::Network => "network",
            Self::Cosmos => "cosmos",
        }
    }

    /// Resolve a phase from its lowercase name, as used by RPC and config files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "neuron" => Some(Self::Neuron),
            "brain" => Some(Self::Brain),
            "network" => Some(Self::Network),
            "cosmos" => Some(Self::Cosmos),
            _ => None,
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PhaseId {
    type Err = VisualizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| VisualizerError::Configuration(format!("unknown phase '{s}'")))
    }
}

/// A `(desktop, mobile)` budget pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCounts {
    pub desktop: usize,
    pub mobile: usize,
}

impl TierCounts {
    pub const fn from_pair(pair: (usize, usize)) -> Self {
        Self {
            desktop: pair.0,
            mobile: pair.1,
        }
    }

    pub fn for_tier(&self, tier: DeviceTier) -> usize {
        match tier {
            DeviceTier::Desktop => self.desktop,
            DeviceTier::Mobile => self.mobile,
        }
    }
}

/// Spatial rule used to scatter particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Spherical shell of neuron somas.
    NeuronField { inner_radius: f32, outer_radius: f32 },
    /// Two ellipsoidal lobes separated along X.
    BrainVolume { semi_axes: Vec3, hemisphere_gap: f32 },
    /// Concentric shells of network nodes.
    NetworkLattice {
        layers: u32,
        inner_radius: f32,
        outer_radius: f32,
    },
    /// Galaxy clusters joined by filaments.
    CosmicWeb {
        inner_radius: f32,
        outer_radius: f32,
        clusters: u32,
        filaments: u32,
        cluster_share: f32,
    },
}

impl Distribution {
    /// Minimum and maximum distance from the origin any particle may have.
    pub fn radial_bounds(&self) -> (f32, f32) {
        match *self {
            Self::NeuronField {
                inner_radius,
                outer_radius,
            } => (inner_radius, outer_radius),
            Self::BrainVolume {
                semi_axes,
                hemisphere_gap,
            } => (0.0, semi_axes.max_element() + hemisphere_gap * 0.5 + semi_axes.x),
            Self::NetworkLattice {
                inner_radius,
                outer_radius,
                ..
            } => (inner_radius, outer_radius),
            Self::CosmicWeb {
                inner_radius,
                outer_radius,
                ..
            } => (inner_radius, outer_radius),
        }
    }

    fn validate(&self, phase: PhaseId) -> VisualizerResult<()> {
        let (min, max) = self.radial_bounds();
        if !(min >= 0.0 && max > min) {
            return Err(VisualizerError::resource_build(
                phase,
                format!("invalid radial bounds {min}..{max}"),
            ));
        }
        match *self {
            Self::BrainVolume { semi_axes, .. } if semi_axes.min_element() <= 0.0 => Err(
                VisualizerError::resource_build(phase, "brain semi-axes must be positive"),
            ),
            Self::NetworkLattice { layers, .. } if layers == 0 => Err(
                VisualizerError::resource_build(phase, "network lattice needs at least one layer"),
            ),
            Self::CosmicWeb {
                clusters,
                filaments,
                cluster_share,
                ..
            } if clusters == 0 || filaments == 0 || !(0.0..=1.0).contains(&cluster_share) => {
                Err(VisualizerError::resource_build(
                    phase,
                    "cosmic web needs clusters, filaments and a cluster share in 0..=1",
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Linear RGB colour rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorModel {
    /// Blend from `inner` to `outer` by normalised radius.
    RadialGradient {
        inner: [f32; 3],
        outer: [f32; 3],
        jitter: f32,
    },
    /// Pick uniformly from a fixed palette.
    Palette {
        colors: &'static [[f32; 3]],
        jitter: f32,
    },
    /// Blend from `low` to `high` by normalised height.
    HeightGradient {
        low: [f32; 3],
        high: [f32; 3],
        jitter: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    pub counts: TierCounts,
    pub distribution: Distribution,
    pub colors: ColorModel,
    pub sizes: SizeRange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveStyle {
    Straight,
    /// Quadratic arc bowed away from the origin by `lift` times the chord length.
    Arc { lift: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionSpec {
    pub max_distance: f32,
    /// Candidate pairs sampled per particle.
    pub sampling_density: f32,
    pub max_connections: TierCounts,
    pub curve: CurveStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_degrees: f32,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingProfile {
    pub ambient: f32,
    pub key: f32,
    pub rim: f32,
}

/// Per-phase procedural animation applied to the resident resources every rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseMotion {
    /// Radians per second around Y.
    pub spin_speed: f32,
    /// Constant tilt around X (radians).
    pub tilt: f32,
    pub pulse_amplitude: f32,
    /// Pulses per second.
    pub pulse_speed: f32,
}

/// Immutable phase descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub id: PhaseId,
    pub particles: ParticleSpec,
    pub connections: ConnectionSpec,
    pub camera: CameraTarget,
    pub lighting: LightingProfile,
    pub motion: PhaseMotion,
}

impl Phase {
    pub fn particle_count(&self, tier: DeviceTier) -> usize {
        self.particles.counts.for_tier(tier)
    }

    pub fn connection_cap(&self, tier: DeviceTier) -> usize {
        self.connections.max_connections.for_tier(tier)
    }

    /// Reject descriptors that could not produce valid buffers.
    pub fn validate(&self) -> VisualizerResult<()> {
        let counts = self.particles.counts;
        if counts.desktop == 0 || counts.mobile == 0 {
            return Err(VisualizerError::resource_build(
                self.id,
                "particle count must be non-zero on every tier",
            ));
        }

        self.particles.distribution.validate(self.id)?;

        let sizes = self.particles.sizes;
        if !(sizes.min > 0.0 && sizes.max >= sizes.min) {
            return Err(VisualizerError::resource_build(
                self.id,
                format!("invalid size range {}..{}", sizes.min, sizes.max),
            ));
        }

        if let ColorModel::Palette { colors, .. } = self.particles.colors {
            if colors.is_empty() {
                return Err(VisualizerError::resource_build(self.id, "empty colour palette"));
            }
        }

        let connections = &self.connections;
        if !(connections.max_distance > 0.0) {
            return Err(VisualizerError::resource_build(
                self.id,
                "connection max distance must be positive",
            ));
        }
        if !(connections.sampling_density >= 0.0) {
            return Err(VisualizerError::resource_build(
                self.id,
                "connection sampling density must not be negative",
            ));
        }

        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(VisualizerError::resource_build(
                self.id,
                format!("camera fov {} out of range", self.camera.fov_degrees),
            ));
        }

        Ok(())
    }
}
