//! Request pacing for the remote catalog API.

use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum wall-clock interval between successive acquisitions.
///
/// The remote API enforces a hard per-second request ceiling, and one batch
/// window issues several concurrent requests that must all land within one
/// rate-limit epoch. Strict fixed spacing between windows keeps every epoch
/// within the ceiling; there is no token bucket and no burst allowance.
///
/// Owned and driven by the single coordinating harvest task, so it carries
/// no synchronization.
pub struct RateLimiter {
    min_interval: Duration,
    last_acquired: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_acquired: None,
        }
    }

    /// Suspends until at least `min_interval` has elapsed since the
    /// previous `acquire` returned. The first call returns immediately.
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_acquired {
            tokio::time::sleep_until(last + self.min_interval).await;
        }
        self.last_acquired = Some(Instant::now());
    }
}
