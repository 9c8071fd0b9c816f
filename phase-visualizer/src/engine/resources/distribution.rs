use bevy::math::Vec3;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::f32::consts::TAU;

use crate::engine::phases::{ColorModel, Distribution, SizeRange};

/// Particle sampler for one build. Cosmic web anchors are drawn once per
/// build so every particle in the cloud shares the same structure.
pub(crate) struct ParticleScatter {
    distribution: Distribution,
    cluster_centres: Vec<Vec3>,
    filaments: Vec<(Vec3, Vec3)>,
}

impl ParticleScatter {
    pub(crate) fn new(distribution: Distribution, rng: &mut StdRng) -> Self {
        let mut cluster_centres = Vec::new();
        let mut filaments = Vec::new();

        if let Distribution::CosmicWeb {
            inner_radius,
            outer_radius,
            clusters,
            filaments: filament_count,
            ..
        } = distribution
        {
            let span = outer_radius - inner_radius;
            let near = inner_radius + span * 0.2;
            let far = outer_radius - span * 0.2;
            cluster_centres = (0..clusters)
                .map(|_| random_direction(rng) * rng.random_range(near..=far))
                .collect();

            filaments = (0..filament_count)
                .map(|_| {
                    let a = rng.random_range(0..cluster_centres.len());
                    let mut b = rng.random_range(0..cluster_centres.len());
                    if cluster_centres.len() > 1 {
                        while b == a {
                            b = rng.random_range(0..cluster_centres.len());
                        }
                    }
                    (cluster_centres[a], cluster_centres[b])
                })
                .collect();
        }

        Self {
            distribution,
            cluster_centres,
            filaments,
        }
    }

    pub(crate) fn sample(&self, rng: &mut StdRng) -> Vec3 {
        match self.distribution {
            Distribution::NeuronField {
                inner_radius,
                outer_radius,
            } => {
                // Uniform in shell volume
                let inner3 = inner_radius.powi(3);
                let outer3 = outer_radius.powi(3);
                let radius = rng
                    .random_range(inner3..=outer3)
                    .cbrt()
                    .clamp(inner_radius, outer_radius);
                random_direction(rng) * radius
            }
            Distribution::BrainVolume {
                semi_axes,
                hemisphere_gap,
            } => {
                let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                let centre = Vec3::new(side * (semi_axes.x + hemisphere_gap * 0.5), 0.0, 0.0);
                let direction = random_direction(rng);
                // Sulci: shallow radial folds, never pushing past the lobe surface
                let fold = 1.0 - 0.08 * (direction.y * 9.0 + direction.z * 7.0).sin().powi(2);
                let depth = rng.random_range(0.0f32..=1.0).cbrt() * fold;
                centre + direction * semi_axes * depth
            }
            Distribution::NetworkLattice {
                layers,
                inner_radius,
                outer_radius,
            } => {
                let span = outer_radius - inner_radius;
                let layer = rng.random_range(0..layers);
                let shell = if layers > 1 {
                    inner_radius + span * layer as f32 / (layers - 1) as f32
                } else {
                    inner_radius + span * 0.5
                };
                let jitter = span * 0.02;
                let radius =
                    (shell + rng.random_range(-jitter..=jitter)).clamp(inner_radius, outer_radius);
                random_direction(rng) * radius
            }
            Distribution::CosmicWeb {
                inner_radius,
                outer_radius,
                cluster_share,
                ..
            } => {
                let spread = (outer_radius - inner_radius) * 0.08;
                let point = if rng.random_bool(f64::from(cluster_share)) {
                    let centre = self.cluster_centres[rng.random_range(0..self.cluster_centres.len())];
                    centre + random_direction(rng) * gaussian_like(rng).abs() * spread
                } else {
                    let (a, b) = self.filaments[rng.random_range(0..self.filaments.len())];
                    a.lerp(b, rng.random_range(0.0f32..=1.0))
                        + random_direction(rng) * gaussian_like(rng).abs() * spread * 0.3
                };
                clamp_radius(point, inner_radius, outer_radius, rng)
            }
        }
    }
}

/// Colour for a particle at `position`, with radial bounds used for gradients.
pub(crate) fn particle_color(
    model: &ColorModel,
    position: Vec3,
    bounds: (f32, f32),
    rng: &mut StdRng,
) -> [f32; 3] {
    let (min, max) = bounds;
    let (base, jitter) = match *model {
        ColorModel::RadialGradient {
            inner,
            outer,
            jitter,
        } => {
            let t = ((position.length() - min) / (max - min)).clamp(0.0, 1.0);
            (mix(inner, outer, t), jitter)
        }
        ColorModel::Palette { colors, jitter } => (colors[rng.random_range(0..colors.len())], jitter),
        ColorModel::HeightGradient { low, high, jitter } => {
            let t = ((position.y + max) / (2.0 * max)).clamp(0.0, 1.0);
            (mix(low, high, t), jitter)
        }
    };

    base.map(|channel| {
        let offset = if jitter > 0.0 {
            rng.random_range(-jitter..=jitter)
        } else {
            0.0
        };
        (channel + offset).clamp(0.0, 1.0)
    })
}

pub(crate) fn particle_size(range: &SizeRange, rng: &mut StdRng) -> f32 {
    rng.random_range(range.min..=range.max)
}

pub(crate) fn random_direction(rng: &mut StdRng) -> Vec3 {
    let z: f32 = rng.random_range(-1.0..=1.0);
    let theta: f32 = rng.random_range(0.0..TAU);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(ring * theta.cos(), ring * theta.sin(), z)
}

/// Approximate unit normal sample (Irwin-Hall, n = 3).
fn gaussian_like(rng: &mut StdRng) -> f32 {
    let sum: f32 = (0..3).map(|_| rng.random_range(0.0f32..1.0)).sum();
    (sum - 1.5) * 2.0
}

fn clamp_radius(point: Vec3, inner: f32, outer: f32, rng: &mut StdRng) -> Vec3 {
    let length = point.length();
    if length < f32::EPSILON {
        return random_direction(rng) * inner;
    }
    point * (length.clamp(inner, outer) / length)
}

fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_directions_are_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!((random_direction(&mut rng).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn clamp_radius_pulls_points_into_the_shell() {
        let mut rng = StdRng::seed_from_u64(3);
        let inside = clamp_radius(Vec3::new(10.0, 0.0, 0.0), 120.0, 400.0, &mut rng);
        let outside = clamp_radius(Vec3::new(0.0, 900.0, 0.0), 120.0, 400.0, &mut rng);
        let origin = clamp_radius(Vec3::ZERO, 120.0, 400.0, &mut rng);
        assert!((inside.length() - 120.0).abs() < 1e-3);
        assert!((outside.length() - 400.0).abs() < 1e-3);
        assert!((origin.length() - 120.0).abs() < 1e-3);
    }

    #[test]
    fn colours_stay_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let model = ColorModel::RadialGradient {
            inner: [1.0, 1.0, 1.0],
            outer: [0.0, 0.0, 0.0],
            jitter: 0.5,
        };
        for _ in 0..200 {
            let colour = particle_color(&model, random_direction(&mut rng) * 20.0, (8.0, 33.0), &mut rng);
            assert!(colour.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}
