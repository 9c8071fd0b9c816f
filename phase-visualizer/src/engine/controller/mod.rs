//! Phase transition state machine and the render graph seam it drives.

/// Transition state machine owning the resident phase resources.
pub mod phase_controller;

/// Render graph trait and the in-memory recording implementation.
pub mod render_graph;

pub use phase_controller::{ControllerState, PhaseController, TransitionOrigin, TransitionRequest};
pub use render_graph::{GraphEvent, RecordingGraph, RenderGraph};
