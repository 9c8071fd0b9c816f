//! Bevy scene integration.
//!
//! Turns render graph commands into mesh entities, applies each frame
//! snapshot to the camera, lights and resident phase, and tracks whether the
//! page is visible.

/// Camera and light spawning plus the per-frame snapshot application.
pub mod presentation;

/// Command-queue render graph and the system that syncs it into the world.
pub mod scene_graph;

/// Page and window visibility tracking for native and WASM builds.
pub mod visibility;

pub use presentation::{KeyLight, PhaseCamera, RimLight, drive_visualizer, host_now_ms};
pub use scene_graph::{PhaseMaterials, PhaseResource, SceneCommand, SceneGraphQueue, sync_render_graph};
pub use visibility::{PageVisibility, track_page_visibility};

#[cfg(not(target_arch = "wasm32"))]
pub use visibility::throttle_hidden_updates;
