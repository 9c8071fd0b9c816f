//! Runtime drivers for the visualizer.
//!
//! Frame budgeting, timed phase cycling, keyboard routing and FPS/stats
//! reporting.

/// Timer that requests the next phase on a fixed interval.
pub mod auto_transition;

/// FPS overlay and `stats_update` notifications to the web frontend.
///
/// Native builds show an on-screen overlay; all builds push stats over RPC.
pub mod fps_tracking;

/// Frame-budgeted scheduler with visibility-aware parking.
pub mod frame_scheduler;

/// Keyboard routing to phase selection and auto-transition toggling.
pub mod interaction;
