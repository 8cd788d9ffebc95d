use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Measured frame rate over a sliding one-second window.
#[derive(Debug, Default)]
pub struct FpsCounter {
    presented: VecDeque<Instant>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, now: Instant) {
        self.presented.push_back(now);
        while let Some(oldest) = self.presented.front() {
            if now.duration_since(*oldest) > WINDOW {
                self.presented.pop_front();
            } else {
                break;
            }
        }
    }

    /// Frames presented within the last second.
    pub fn current(&self) -> f64 {
        self.presented.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_recent_frames() {
        let start = Instant::now();
        let mut fps = FpsCounter::new();
        for i in 0..30 {
            fps.record(start + Duration::from_millis(i * 50));
        }
        // Frames at 0..=1450ms; the window ending at 1450ms holds 450..=1450.
        assert_eq!(fps.current(), 21.0);
    }

    #[test]
    fn empty_counter_is_zero() {
        assert_eq!(FpsCounter::new().current(), 0.0);
    }
}
