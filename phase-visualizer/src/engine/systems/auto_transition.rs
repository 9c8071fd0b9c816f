use bevy::log::{debug, info};

/// Timer-driven phase cycling. Manual transitions suspend it until they complete.
#[derive(Debug, Clone)]
pub struct AutoTransitionTimer {
    interval_ms: f64,
    next_fire_at: f64,
    running: bool,
    suspended: bool,
}

impl AutoTransitionTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            next_fire_at: 0.0,
            running: false,
            suspended: false,
        }
    }

    pub fn start(&mut self, now: f64, interval_ms: f64) {
        self.interval_ms = interval_ms;
        self.next_fire_at = now + interval_ms;
        self.running = true;
        self.suspended = false;
        info!("Auto-transition every {:.0} ms", interval_ms);
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("Auto-transition stopped");
        }
        self.running = false;
        self.suspended = false;
    }

    /// Start if stopped, stop if running. Returns the new running state.
    pub fn toggle(&mut self, now: f64) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start(now, self.interval_ms);
        }
        self.running
    }

    /// Hold the timer while a manual transition is in flight.
    pub fn suspend(&mut self) {
        if self.running && !self.suspended {
            debug!("Auto-transition suspended for manual transition");
            self.suspended = true;
        }
    }

    /// Release a suspension; the full interval restarts from `now`.
    pub fn resume(&mut self, now: f64) {
        if self.suspended {
            self.suspended = false;
            self.next_fire_at = now + self.interval_ms;
            debug!("Auto-transition resumed");
        }
    }

    /// True when the timer fires at `now`.
    pub fn poll(&mut self, now: f64) -> bool {
        if !self.running || self.suspended || now < self.next_fire_at {
            return false;
        }
        self.next_fire_at = now + self.interval_ms;
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut timer = AutoTransitionTimer::new(8000.0);
        timer.start(0.0, 1000.0);
        let fired = (0..=3500).filter(|now| timer.poll(f64::from(*now))).count();
        assert_eq!(fired, 3);
    }

    #[test]
    fn stop_is_idempotent_and_toggle_flips() {
        let mut timer = AutoTransitionTimer::new(1000.0);
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());
        assert!(timer.toggle(0.0));
        assert!(timer.is_running());
        assert!(!timer.toggle(10.0));
        assert!(!timer.poll(5000.0));
    }

    #[test]
    fn suspension_holds_and_resume_restarts_the_interval() {
        let mut timer = AutoTransitionTimer::new(1000.0);
        timer.start(0.0, 1000.0);
        timer.suspend();
        assert!(!timer.poll(1500.0));
        timer.resume(1500.0);
        assert!(!timer.poll(2000.0));
        assert!(timer.poll(2500.0));
    }

    #[test]
    fn suspend_is_ignored_while_stopped() {
        let mut timer = AutoTransitionTimer::new(1000.0);
        timer.suspend();
        assert!(!timer.is_suspended());
    }
}
