//! Static phase catalogue.
//!
//! Each phase is a closed descriptor: particle distribution, connection rule,
//! camera target, lighting profile and procedural motion.

/// Phase descriptor types and validation.
pub mod descriptor;

/// Ordered phase registry with cyclic iteration.
pub mod registry;

pub use descriptor::{
    CameraTarget, ColorModel, ConnectionSpec, CurveStyle, Distribution, LightingProfile,
    ParticleSpec, Phase, PhaseId, PhaseMotion, SizeRange, TierCounts,
};
pub use registry::PhaseRegistry;
