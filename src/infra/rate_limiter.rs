use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Politeness spacing shared by every fetch of a run: request starts are at
/// least `min_interval` apart, whichever task issues them.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    // start time reserved for the next request
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for this caller's slot. Slots are handed out in lock order, so
    /// concurrent callers queue rather than burst.
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let slot = {
            let mut guard = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *guard {
                Some(next) if next > now => next,
                _ => now,
            };
            *guard = Some(slot + self.min_interval);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}
