use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::thread;
use std::time::Duration;

/// Keeps outbound calls at least `spacing` apart. Calls made too early are
/// delayed, never rejected.
pub struct CallPacer {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    clock: DefaultClock,
    spacing: Duration,
}

impl CallPacer {
    pub fn new(spacing: Duration) -> Self {
        // Burst of one: each cell replenishes after a full period
        let limiter = Quota::with_period(spacing).map(RateLimiter::direct);
        CallPacer {
            limiter,
            clock: DefaultClock::default(),
            spacing,
        }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Blocks until a call slot is available and claims it.
    pub fn wait_turn(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };

        loop {
            match limiter.check() {
                Ok(()) => return,
                Err(not_until) => {
                    let wait = not_until.wait_time_from(self.clock.now());
                    thread::sleep(wait.max(Duration::from_millis(1)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_zero_spacing_never_waits() {
        let pacer = CallPacer::new(Duration::ZERO);
        let started = Instant::now();
        for _ in 0..50 {
            pacer.wait_turn();
        }
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn test_consecutive_calls_are_spaced() {
        let pacer = CallPacer::new(Duration::from_millis(60));
        let started = Instant::now();
        pacer.wait_turn();
        pacer.wait_turn();
        pacer.wait_turn();
        assert!(started.elapsed() >= Duration::from_millis(110));
    }
}
