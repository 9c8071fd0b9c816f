use bevy::log::{debug, info};

/// Outcome of one scheduler callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameTick {
    /// Render this frame; `delta_ms` is the clamped time since the previous render.
    Render { delta_ms: f64 },
    /// Inside the frame budget, nothing to do.
    Skip,
    /// Page hidden; rendering is paused cooperatively.
    Parked,
    Stopped,
}

/// Frame-budgeted render loop with visibility-aware throttling.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    frame_interval_ms: f64,
    hidden_recheck_ms: f64,
    max_delta_ms: f64,
    last_frame_timestamp: f64,
    last_render_at: f64,
    last_hidden_check: f64,
    frame_count: u64,
    running: bool,
    hidden: bool,
}

impl FrameScheduler {
    pub fn new(target_fps: u32, hidden_recheck_ms: f64, max_delta_ms: f64) -> Self {
        Self {
            frame_interval_ms: 1000.0 / f64::from(target_fps.max(1)),
            hidden_recheck_ms,
            max_delta_ms,
            last_frame_timestamp: 0.0,
            last_render_at: 0.0,
            last_hidden_check: 0.0,
            frame_count: 0,
            running: false,
            hidden: false,
        }
    }

    pub fn start(&mut self, now: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.hidden = false;
        // Backdate so the first callback renders
        self.last_frame_timestamp = now - self.frame_interval_ms;
        self.last_render_at = now;
        info!(
            "Frame scheduler started at {:.1} ms budget",
            self.frame_interval_ms
        );
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("Frame scheduler stopped after {} frames", self.frame_count);
        }
        self.running = false;
    }

    pub fn tick(&mut self, now: f64, visible: bool) -> FrameTick {
        if !self.running {
            return FrameTick::Stopped;
        }

        if !visible {
            if !self.hidden {
                self.hidden = true;
                self.last_hidden_check = now;
                info!("Page hidden, parking render loop");
            } else if now - self.last_hidden_check >= self.hidden_recheck_ms {
                self.last_hidden_check = now;
                debug!("Page still hidden");
            }
            return FrameTick::Parked;
        }

        if self.hidden {
            self.hidden = false;
            self.last_frame_timestamp = now - self.frame_interval_ms;
            self.last_render_at = now;
            info!("Page visible, resuming render loop");
        }

        let elapsed = now - self.last_frame_timestamp;
        if elapsed < self.frame_interval_ms {
            return FrameTick::Skip;
        }

        self.last_frame_timestamp = now - (elapsed % self.frame_interval_ms);
        let delta_ms = (now - self.last_render_at).clamp(0.0, self.max_delta_ms);
        self.last_render_at = now;
        self.frame_count += 1;

        FrameTick::Render { delta_ms }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    /// How often the host needs to call back while parked.
    pub fn hidden_recheck_ms(&self) -> f64 {
        self.hidden_recheck_ms
    }

    pub fn last_frame_timestamp(&self) -> f64 {
        self.last_frame_timestamp
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_parked(&self) -> bool {
        self.running && self.hidden
    }
}
