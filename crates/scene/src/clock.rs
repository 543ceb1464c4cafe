/// Frame-loop tunables.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Upper bound on a single frame's delta, in seconds.
    pub max_delta: f32,
    /// Texture mix coefficient at startup.
    pub initial_mix: f32,
    /// Viewport width / height until the first resize.
    pub aspect: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_delta: 0.1,
            initial_mix: 0.5,
            aspect: 1.0,
        }
    }
}

/// Turns monotonically increasing timestamps into per-frame deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_delta: f32,
    last: Option<f64>,
    elapsed: f64,
    delta: f32,
    frame: u64,
}

impl FrameClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            max_delta: max_delta.max(0.0),
            last: None,
            elapsed: 0.0,
            delta: 0.0,
            frame: 0,
        }
    }

    /// Advance to `now` (seconds since start). Returns the clamped frame delta.
    ///
    /// The first call yields zero. A timestamp that goes backwards also yields zero.
    pub fn advance(&mut self, now: f64) -> f32 {
        let delta = match self.last {
            Some(last) => ((now - last) as f32).clamp(0.0, self.max_delta),
            None => 0.0,
        };
        self.last = Some(now);
        self.elapsed = now;
        self.delta = delta;
        self.frame += 1;
        delta
    }

    /// Seconds since start as of the last advance; drives the animation.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.advance(5.0), 0.0);
        assert_eq!(clock.elapsed(), 5.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn delta_is_time_between_frames() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(1.0);
        let dt = clock.advance(1.025);
        assert!((dt - 0.025).abs() < 1e-6);
        assert_eq!(clock.delta(), dt);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn stalled_frame_is_clamped() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(0.0);
        assert_eq!(clock.advance(3.0), 0.1);
        assert_eq!(clock.elapsed(), 3.0);
    }

    #[test]
    fn backwards_time_yields_zero() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(2.0);
        assert_eq!(clock.advance(1.5), 0.0);
    }

    #[test]
    fn negative_bound_freezes_motion() {
        let mut clock = FrameClock::new(-1.0);
        clock.advance(0.0);
        assert_eq!(clock.advance(1.0), 0.0);
    }

    #[test]
    fn default_config() {
        let config = FrameConfig::default();
        assert_eq!(config.max_delta, 0.1);
        assert_eq!(config.initial_mix, 0.5);
    }
}
