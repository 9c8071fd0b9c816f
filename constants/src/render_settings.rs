/// Target frame rate on desktop class devices
pub const DESKTOP_TARGET_FPS: u32 = 60;

/// Target frame rate on mobile class devices
pub const MOBILE_TARGET_FPS: u32 = 30;

/// Re-check interval while the page is hidden (ms)
pub const HIDDEN_RECHECK_MS: f64 = 1000.0;

/// Upper bound for a single rendered frame delta (ms), so paused tabs do not jump animations
pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

/// Phase transition duration (ms)
pub const TRANSITION_DURATION_MS: f64 = 2000.0;

/// Auto-transition cycle interval (ms)
pub const AUTO_TRANSITION_INTERVAL_MS: f64 = 8000.0;
