//! Rotating testimonials shown on the brand panel of the auth screens.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Testimonial {
    pub quote: &'static str,
    pub author: &'static str,
    pub role: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        quote: "StuffsDrop completely changed how I find vintage gear. The community is unreal.",
        author: "Alex Chen",
        role: "Verified Collector",
    },
    Testimonial {
        quote: "I cleared out two closets in a weekend and every piece went to someone who wanted it.",
        author: "Maya Okafor",
        role: "Top Supplier",
    },
    Testimonial {
        quote: "Claimed a leather jacket three blocks away before my coffee got cold.",
        author: "Jordan Reyes",
        role: "All Access Member",
    },
];

/// Interval between rotations.
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(6);

/// Rotation cursor advanced by UI ticks.
#[derive(Debug, Clone)]
pub struct TestimonialsState {
    index: usize,
    last_rotated: Instant,
    interval: Duration,
}

impl Default for TestimonialsState {
    fn default() -> Self {
        Self::with_interval(ROTATION_INTERVAL)
    }
}

impl TestimonialsState {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            index: 0,
            last_rotated: Instant::now(),
            interval,
        }
    }

    pub fn current(&self) -> &'static Testimonial {
        &TESTIMONIALS[self.index % TESTIMONIALS.len()]
    }

    /// Advances when the interval has elapsed at `now`. Returns `true` on rotation.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_rotated) < self.interval {
            return false;
        }
        self.index = (self.index + 1) % TESTIMONIALS.len();
        self.last_rotated = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_only_after_interval_and_wraps() {
        let mut state = TestimonialsState::with_interval(Duration::from_secs(5));
        let start = Instant::now();
        assert!(!state.tick(start + Duration::from_secs(1)));
        assert_eq!(state.current().author, "Alex Chen");

        let mut now = start;
        for _ in 0..TESTIMONIALS.len() {
            now += Duration::from_secs(5);
            assert!(state.tick(now));
        }
        assert_eq!(state.index, 0);
        assert_eq!(state.current().author, "Alex Chen");
    }
}
