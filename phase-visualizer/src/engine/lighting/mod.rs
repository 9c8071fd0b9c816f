//! Phase lighting direction.

/// Light intensity levels and the director easing between them.
pub mod lighting_director;

pub use lighting_director::{LightLevels, LightingDirector};
