use bevy::log::debug;
use bevy::math::Vec3;
use rand::prelude::*;
use rand::rngs::StdRng;

use super::distribution::{ParticleScatter, particle_color, particle_size};
use super::handle::{Connection, ResourceHandle, ResourceId};
use crate::engine::device::DeviceTier;
use crate::engine::phases::{CurveStyle, Phase};
use crate::error::VisualizerResult;

/// Turns phase descriptors into point and line buffers.
///
/// Output is random unless a seed is injected.
pub struct ResourceBuilder {
    rng: StdRng,
}

impl Default for ResourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceBuilder {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn build(&mut self, phase: &Phase, tier: DeviceTier) -> VisualizerResult<ResourceHandle> {
        phase.validate()?;

        let count = phase.particle_count(tier);
        let spec = &phase.particles;
        let bounds = spec.distribution.radial_bounds();
        let scatter = ParticleScatter::new(spec.distribution, &mut self.rng);

        let mut positions = Vec::with_capacity(count * 3);
        let mut colors = Vec::with_capacity(count * 3);
        let mut sizes = Vec::with_capacity(count);
        let mut points = Vec::with_capacity(count);

        for _ in 0..count {
            let point = scatter.sample(&mut self.rng);
            let colour = particle_color(&spec.colors, point, bounds, &mut self.rng);

            positions.extend_from_slice(&point.to_array());
            colors.extend_from_slice(&colour);
            sizes.push(particle_size(&spec.sizes, &mut self.rng));
            points.push(point);
        }

        let connections = self.build_connections(phase, tier, &points);

        debug!(
            "Built '{}' resources: {} particles, {} connections",
            phase.id,
            count,
            connections.len()
        );

        Ok(ResourceHandle {
            id: ResourceId::next(),
            phase: phase.id,
            positions,
            colors,
            sizes,
            connections,
        })
    }

    /// Sample random index pairs, keeping those closer than the phase's
    /// maximum distance, until the tier cap is reached or samples run out.
    fn build_connections(
        &mut self,
        phase: &Phase,
        tier: DeviceTier,
        points: &[Vec3],
    ) -> Vec<Connection> {
        let spec = &phase.connections;
        let cap = phase.connection_cap(tier);
        if points.len() < 2 || cap == 0 {
            return Vec::new();
        }

        let attempts = (points.len() as f32 * spec.sampling_density).ceil() as usize;
        let mut connections = Vec::with_capacity(cap.min(attempts));

        for _ in 0..attempts {
            if connections.len() >= cap {
                break;
            }

            let i = self.rng.random_range(0..points.len());
            let j = self.rng.random_range(0..points.len());
            if i == j {
                continue;
            }

            let (start, end) = (points[i], points[j]);
            let distance = start.distance(end);
            if distance >= spec.max_distance {
                continue;
            }

            let control = match spec.curve {
                CurveStyle::Straight => None,
                CurveStyle::Arc { lift } => {
                    let midpoint = (start + end) * 0.5;
                    let outward = midpoint.try_normalize().unwrap_or(Vec3::Y);
                    Some(midpoint + outward * distance * lift)
                }
            };

            connections.push(Connection {
                start,
                end,
                control,
            });
        }

        connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::phases::{PhaseId, PhaseRegistry, TierCounts};

    const TIERS: [DeviceTier; 2] = [DeviceTier::Desktop, DeviceTier::Mobile];

    #[test]
    fn buffer_lengths_match_the_tier_count() {
        let registry = PhaseRegistry::standard();
        let mut builder = ResourceBuilder::new();

        for id in registry.ids() {
            let phase = registry.get(id).unwrap();
            for tier in TIERS {
                let handle = builder.build(phase, tier).unwrap();
                let count = phase.particle_count(tier);
                assert_eq!(handle.positions.len(), 3 * count, "{id} {tier:?}");
                assert_eq!(handle.colors.len(), 3 * count, "{id} {tier:?}");
                assert_eq!(handle.sizes.len(), count, "{id} {tier:?}");
                assert!(handle.is_consistent());
                assert_eq!(handle.phase, id);
            }
        }
    }

    #[test]
    fn connections_respect_distance_and_cap() {
        let registry = PhaseRegistry::standard();
        let mut builder = ResourceBuilder::with_seed(42);

        for id in registry.ids() {
            let phase = registry.get(id).unwrap();
            for tier in TIERS {
                let handle = builder.build(phase, tier).unwrap();
                assert!(handle.connections.len() <= phase.connection_cap(tier));
                for connection in &handle.connections {
                    assert!(connection.length() <= phase.connections.max_distance);
                }
            }
        }
    }

    #[test]
    fn particles_stay_within_radial_bounds() {
        let registry = PhaseRegistry::standard();
        let mut builder = ResourceBuilder::new();

        for id in registry.ids() {
            let phase = registry.get(id).unwrap();
            let (min, max) = phase.particles.distribution.radial_bounds();
            let handle = builder.build(phase, DeviceTier::Desktop).unwrap();
            for index in 0..handle.particle_count() {
                let radius = handle.position(index).length();
                assert!(radius >= min - 1e-3 && radius <= max + 1e-3, "{id}: {radius}");
            }
        }
    }

    #[test]
    fn neuron_and_cosmos_use_documented_shells() {
        let registry = PhaseRegistry::standard();
        let neuron = registry.get(PhaseId::Neuron).unwrap();
        let cosmos = registry.get(PhaseId::Cosmos).unwrap();
        assert_eq!(neuron.particles.distribution.radial_bounds(), (8.0, 33.0));
        assert_eq!(cosmos.particles.distribution.radial_bounds(), (120.0, 400.0));
    }

    #[test]
    fn dense_sampling_is_capped() {
        let registry = PhaseRegistry::standard();
        let mut phase = registry.get(PhaseId::Brain).unwrap().clone();
        phase.connections.max_distance = 1_000.0;
        phase.connections.sampling_density = 50.0;
        phase.connections.max_connections = TierCounts {
            desktop: 25,
            mobile: 10,
        };

        let mut builder = ResourceBuilder::with_seed(1);
        assert_eq!(
            builder.build(&phase, DeviceTier::Desktop).unwrap().connections.len(),
            25
        );
        assert_eq!(
            builder.build(&phase, DeviceTier::Mobile).unwrap().connections.len(),
            10
        );
    }

    #[test]
    fn seeded_builders_are_reproducible() {
        let registry = PhaseRegistry::standard();
        let phase = registry.get(PhaseId::Network).unwrap();
        let a = ResourceBuilder::with_seed(9).build(phase, DeviceTier::Mobile).unwrap();
        let b = ResourceBuilder::with_seed(9).build(phase, DeviceTier::Mobile).unwrap();
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.connections, b.connections);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn malformed_descriptor_fails_to_build() {
        let registry = PhaseRegistry::standard();
        let mut phase = registry.get(PhaseId::Neuron).unwrap().clone();
        phase.particles.counts.mobile = 0;
        assert!(ResourceBuilder::new().build(&phase, DeviceTier::Mobile).is_err());
    }
}
