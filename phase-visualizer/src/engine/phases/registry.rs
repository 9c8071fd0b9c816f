use bevy::math::Vec3;
use std::collections::HashSet;

use constants::particle_budget::{
    BRAIN_CONNECTIONS, BRAIN_PARTICLES, COSMOS_CONNECTIONS, COSMOS_PARTICLES, NETWORK_CONNECTIONS,
    NETWORK_PARTICLES, NEURON_CONNECTIONS, NEURON_PARTICLES,
};

use super::descriptor::{
    CameraTarget, ColorModel, ConnectionSpec, CurveStyle, Distribution, LightingProfile,
    ParticleSpec, Phase, PhaseId, PhaseMotion, SizeRange, TierCounts,
};
use crate::error::{VisualizerError, VisualizerResult};

const COSMOS_PALETTE: &[[f32; 3]] = &[
    [0.62, 0.72, 1.0],
    [1.0, 0.86, 0.68],
    [0.86, 0.62, 1.0],
    [1.0, 1.0, 1.0],
];

/// Ordered, read-only phase catalogue.
#[derive(Debug, Clone)]
pub struct PhaseRegistry {
    phases: Vec<Phase>,
}

impl PhaseRegistry {
    /// The built-in `neuron → brain → network → cosmos` cycle.
    pub fn standard() -> Self {
        Self {
            phases: vec![neuron_phase(), brain_phase(), network_phase(), cosmos_phase()],
        }
    }

    /// Build a registry from a custom ordered list of phases.
    pub fn from_phases(phases: Vec<Phase>) -> VisualizerResult<Self> {
        if phases.is_empty() {
            return Err(VisualizerError::Configuration(
                "phase registry must contain at least one phase".into(),
            ));
        }

        let mut seen = HashSet::new();
        for phase in &phases {
            if !seen.insert(phase.id) {
                return Err(VisualizerError::Configuration(format!(
                    "phase '{}' registered twice",
                    phase.id
                )));
            }
            phase.validate()?;
        }

        Ok(Self { phases })
    }

    pub fn get(&self, id: PhaseId) -> VisualizerResult<&Phase> {
        self.phases
            .iter()
            .find(|phase| phase.id == id)
            .ok_or_else(|| VisualizerError::Configuration(format!("phase '{id}' is not registered")))
    }

    /// Next phase in cycle order. Unregistered ids restart the cycle.
    pub fn next(&self, id: PhaseId) -> PhaseId {
        match self.position(id) {
            Some(index) => self.phases[(index + 1) % self.phases.len()].id,
            None => self.first(),
        }
    }

    /// Previous phase in cycle order. Unregistered ids restart the cycle.
    pub fn previous(&self, id: PhaseId) -> PhaseId {
        match self.position(id) {
            Some(index) => {
                let len = self.phases.len();
                self.phases[(index + len - 1) % len].id
            }
            None => self.first(),
        }
    }

    pub fn first(&self) -> PhaseId {
        self.phases[0].id
    }

    /// Phase at a 0-based cycle position, used by numeric key selection.
    pub fn at(&self, index: usize) -> Option<PhaseId> {
        self.phases.get(index).map(|phase| phase.id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PhaseId> + '_ {
        self.phases.iter().map(|phase| phase.id)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    fn position(&self, id: PhaseId) -> Option<usize> {
        self.phases.iter().position(|phase| phase.id == id)
    }
}

fn neuron_phase() -> Phase {
    Phase {
        id: PhaseId::Neuron,
        particles: ParticleSpec {
            counts: TierCounts::from_pair(NEURON_PARTICLES),
            distribution: Distribution::NeuronField {
                inner_radius: 8.0,
                outer_radius: 33.0,
            },
            colors: ColorModel::RadialGradient {
                inner: [0.45, 0.85, 1.0],
                outer: [0.25, 0.35, 0.95],
                jitter: 0.08,
            },
            sizes: SizeRange { min: 1.2, max: 2.6 },
        },
        connections: ConnectionSpec {
            max_distance: 14.0,
            sampling_density: 6.0,
            max_connections: TierCounts::from_pair(NEURON_CONNECTIONS),
            curve: CurveStyle::Arc { lift: 0.18 },
        },
        camera: CameraTarget {
            position: Vec3::new(0.0, 6.0, 70.0),
            look_at: Vec3::ZERO,
            fov_degrees: 60.0,
            duration_ms: 2000.0,
        },
        lighting: LightingProfile {
            ambient: 0.35,
            key: 1.2,
            rim: 0.6,
        },
        motion: PhaseMotion {
            spin_speed: 0.08,
            tilt: 0.1,
            pulse_amplitude: 0.06,
            pulse_speed: 0.8,
        },
    }
}

fn brain_phase() -> Phase {
    Phase {
        id: PhaseId::Brain,
        particles: ParticleSpec {
            counts: TierCounts::from_pair(BRAIN_PARTICLES),
            distribution: Distribution::BrainVolume {
                semi_axes: Vec3::new(16.0, 20.0, 26.0),
                hemisphere_gap: 2.0,
            },
            colors: ColorModel::HeightGradient {
                low: [0.9, 0.35, 0.55],
                high: [1.0, 0.75, 0.85],
                jitter: 0.06,
            },
            sizes: SizeRange { min: 0.6, max: 1.4 },
        },
        connections: ConnectionSpec {
            max_distance: 6.0,
            sampling_density: 1.5,
            max_connections: TierCounts::from_pair(BRAIN_CONNECTIONS),
            curve: CurveStyle::Straight,
        },
        camera: CameraTarget {
            position: Vec3::new(0.0, 10.0, 95.0),
            look_at: Vec3::ZERO,
            fov_degrees: 55.0,
            duration_ms: 2200.0,
        },
        lighting: LightingProfile {
            ambient: 0.3,
            key: 1.0,
            rim: 0.9,
        },
        motion: PhaseMotion {
            spin_speed: 0.12,
            tilt: 0.05,
            pulse_amplitude: 0.03,
            pulse_speed: 0.5,
        },
    }
}

fn network_phase() -> Phase {
    Phase {
        id: PhaseId::Network,
        particles: ParticleSpec {
            counts: TierCounts::from_pair(NETWORK_PARTICLES),
            distribution: Distribution::NetworkLattice {
                layers: 5,
                inner_radius: 10.0,
                outer_radius: 48.0,
            },
            colors: ColorModel::RadialGradient {
                inner: [0.3, 1.0, 0.75],
                outer: [0.15, 0.55, 1.0],
                jitter: 0.05,
            },
            sizes: SizeRange { min: 0.9, max: 2.0 },
        },
        connections: ConnectionSpec {
            max_distance: 16.0,
            sampling_density: 3.0,
            max_connections: TierCounts::from_pair(NETWORK_CONNECTIONS),
            curve: CurveStyle::Arc { lift: 0.08 },
        },
        camera: CameraTarget {
            position: Vec3::new(0.0, 25.0, 120.0),
            look_at: Vec3::ZERO,
            fov_degrees: 58.0,
            duration_ms: 2400.0,
        },
        lighting: LightingProfile {
            ambient: 0.4,
            key: 0.9,
            rim: 0.5,
        },
        motion: PhaseMotion {
            spin_speed: 0.15,
            tilt: 0.2,
            pulse_amplitude: 0.04,
            pulse_speed: 1.2,
        },
    }
}

fn cosmos_phase() -> Phase {
    Phase {
        id: PhaseId::Cosmos,
        particles: ParticleSpec {
            counts: TierCounts::from_pair(COSMOS_PARTICLES),
            distribution: Distribution::CosmicWeb {
                inner_radius: 120.0,
                outer_radius: 400.0,
                clusters: 14,
                filaments: 22,
                cluster_share: 0.45,
            },
            colors: ColorModel::Palette {
                colors: COSMOS_PALETTE,
                jitter: 0.1,
            },
            sizes: SizeRange { min: 0.8, max: 3.2 },
        },
        connections: ConnectionSpec {
            max_distance: 45.0,
            sampling_density: 0.8,
            max_connections: TierCounts::from_pair(COSMOS_CONNECTIONS),
            curve: CurveStyle::Straight,
        },
        camera: CameraTarget {
            position: Vec3::new(0.0, 80.0, 650.0),
            look_at: Vec3::ZERO,
            fov_degrees: 70.0,
            duration_ms: 3000.0,
        },
        lighting: LightingProfile {
            ambient: 0.15,
            key: 0.6,
            rim: 1.1,
        },
        motion: PhaseMotion {
            spin_speed: 0.02,
            tilt: 0.35,
            pulse_amplitude: 0.0,
            pulse_speed: 0.0,
        },
    }
}
