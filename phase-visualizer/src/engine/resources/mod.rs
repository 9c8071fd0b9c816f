//! Per-phase GPU resource construction.
//!
//! Builds point and connection buffers from a phase descriptor and a device tier.

/// Resource builder turning descriptors into buffers.
pub mod builder;

/// Particle scatter, colour and size sampling.
mod distribution;

/// Built buffers and connection primitives.
pub mod handle;

pub use builder::ResourceBuilder;
pub use handle::{Connection, ResourceHandle, ResourceId};
