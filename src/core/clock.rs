//! Frame timing.

#[cfg(feature = "web")]
use web_sys::window;

#[cfg(not(feature = "web"))]
use std::time::Instant;

/// Measures per-frame delta time and total elapsed time in seconds.
pub struct Clock {
    running: bool,
    old_time: f64,
    elapsed_time: f64,

    #[cfg(not(feature = "web"))]
    instant: Option<Instant>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a new clock (not started).
    pub fn new() -> Self {
        Self {
            running: false,
            old_time: 0.0,
            elapsed_time: 0.0,
            #[cfg(not(feature = "web"))]
            instant: None,
        }
    }

    /// Create and start a new clock.
    pub fn start_new() -> Self {
        let mut clock = Self::new();
        clock.start();
        clock
    }

    fn now(&self) -> f64 {
        #[cfg(feature = "web")]
        {
            window()
                .and_then(|w| w.performance())
                .map(|p| p.now() / 1000.0)
                .unwrap_or(0.0)
        }

        #[cfg(not(feature = "web"))]
        {
            self.instant
                .map(|i| i.elapsed().as_secs_f64())
                .unwrap_or(0.0)
        }
    }

    /// Start the clock and reset elapsed time.
    pub fn start(&mut self) {
        #[cfg(not(feature = "web"))]
        {
            self.instant = Some(Instant::now());
        }

        self.old_time = self.now();
        self.elapsed_time = 0.0;
        self.running = true;
    }

    /// Seconds since the last call to `delta`. Starts the clock on first
    /// use, returning 0.
    pub fn delta(&mut self) -> f64 {
        if !self.running {
            self.start();
            return 0.0;
        }

        let new_time = self.now();
        let diff = new_time - self.old_time;
        self.old_time = new_time;
        self.elapsed_time += diff;
        diff
    }

    /// Total seconds accumulated while running.
    pub fn elapsed(&mut self) -> f64 {
        self.delta();
        self.elapsed_time
    }

    /// Whether the clock has been started.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_stopped() {
        let clock = Clock::new();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_first_delta_is_zero() {
        let mut clock = Clock::new();
        assert_eq!(clock.delta(), 0.0);
        assert!(clock.is_running());
    }

    #[test]
    fn test_elapsed_accumulates() {
        let mut clock = Clock::start_new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let elapsed = clock.elapsed();
        assert!(elapsed > 0.0);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.elapsed() > elapsed);
    }
}
