pub fn clamp_frame_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_dt)
}

// No delta while paused, suspended or stopped. The first tick after that only re-arms
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
    paused: bool,
    suspended: bool,
    stopped: bool,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> FrameClock {
        FrameClock {
            last: None,
            max_dt,
            paused: false,
            suspended: false,
            stopped: false,
        }
    }

    pub fn tick(&mut self, now: f64) -> Option<f32> {
        if self.stopped || self.paused || self.suspended {
            self.last = None;
            return None;
        }

        let Some(last) = self.last.replace(now) else {
            return Some(0.0);
        };
        Some(clamp_frame_dt((now - last) as f32, self.max_dt))
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        !(self.stopped || self.paused || self.suspended)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn unsuspend(&mut self) {
        self.suspended = false;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_frame_dt() {
        assert_eq!(clamp_frame_dt(0.016, 0.033), 0.016);
        assert_eq!(clamp_frame_dt(2.0, 0.033), 0.033);
        assert_eq!(clamp_frame_dt(-0.5, 0.033), 0.0);
        assert_eq!(clamp_frame_dt(f32::NAN, 0.033), 0.0);
        assert_eq!(clamp_frame_dt(f32::INFINITY, 0.033), 0.0);
    }

    #[test]
    fn test_tick_clamps_deltas() {
        let mut clock = FrameClock::new(0.033);
        assert_eq!(clock.tick(10.0), Some(0.0));
        let dt = clock.tick(10.016).unwrap();
        assert!((dt - 0.016).abs() < 1e-5);
        assert_eq!(clock.tick(15.0), Some(0.033));
        // Clock going backwards
        assert_eq!(clock.tick(14.0), Some(0.0));
    }

    #[test]
    fn test_resume_has_no_jump() {
        let mut clock = FrameClock::new(0.033);
        clock.tick(1.0);
        clock.tick(1.016);

        assert!(clock.toggle_pause());
        assert_eq!(clock.tick(1.032), None);
        assert_eq!(clock.tick(30.0), None);
        assert!(!clock.toggle_pause());
        assert_eq!(clock.tick(31.0), Some(0.0));
        let dt = clock.tick(31.01).unwrap();
        assert!((dt - 0.01).abs() < 1e-5);

        clock.suspend();
        assert_eq!(clock.tick(40.0), None);
        clock.unsuspend();
        assert_eq!(clock.tick(50.0), Some(0.0));
    }

    #[test]
    fn test_stop_is_final() {
        let mut clock = FrameClock::new(0.033);
        clock.tick(1.0);
        clock.stop();
        clock.toggle_pause();
        clock.toggle_pause();
        assert_eq!(clock.tick(1.01), None);
        assert!(!clock.is_running());
    }
}
