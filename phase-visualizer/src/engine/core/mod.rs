//! Core application setup and state management.
//!
//! Handles configuration loading, the application lifecycle and plugin
//! initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Registers the config asset, the web RPC bridge and the runtime systems
/// that drive the visualizer each frame.
pub mod app_setup;

/// Application state machine: config loading, running and fallback.
pub mod app_state;

/// Runtime configuration loaded from `assets/visualizer.json`.
pub mod config;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
