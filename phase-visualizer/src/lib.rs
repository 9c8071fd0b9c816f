//! Phased particle visualization engine.
//!
//! A fixed cycle of particle scenes (neuron, brain, network, cosmos) with
//! eased camera and lighting transitions, a frame-budgeted render loop and
//! timed auto-advance. The core in [`engine::visualizer`] is host-independent
//! and driven by millisecond timestamps; [`engine::core::app_setup`] wires it
//! into a Bevy app.

pub mod engine;
pub mod error;
pub mod rpc;

pub use engine::visualizer::{FrameSnapshot, PhaseVisualizer, SchedulerState, VisualizerStats};
pub use error::{VisualizerError, VisualizerResult};
