//! Particle and connection budgets per device tier, as `(desktop, mobile)` pairs.

/// Neuron field soma count.
pub const NEURON_PARTICLES: (usize, usize) = (120, 40);

/// Brain volume particle count across both lobes.
pub const BRAIN_PARTICLES: (usize, usize) = (1800, 700);

/// Network lattice node count.
pub const NETWORK_PARTICLES: (usize, usize) = (600, 240);

/// Cosmic web galaxy count.
pub const COSMOS_PARTICLES: (usize, usize) = (4000, 1500);

/// Upper bound on accepted connections for each phase, keeps line buffers bounded
pub const NEURON_CONNECTIONS: (usize, usize) = (260, 90);
pub const BRAIN_CONNECTIONS: (usize, usize) = (500, 180);
pub const NETWORK_CONNECTIONS: (usize, usize) = (700, 260);
pub const COSMOS_CONNECTIONS: (usize, usize) = (900, 300);

/// Line segments used when tessellating a curved connection.
pub const CURVE_SEGMENTS: usize = 12;
