//! Call gating for upstream RPC rate limits
//!
//! Public RPC providers throttle bursts of independent calls; a throttled
//! call surfaces as a spurious no-liquidity result, so pacing is a
//! correctness concern here, not a latency tweak. `CallGate` bounds
//! concurrent in-flight calls and enforces a minimum spacing between call
//! admissions, replacing ad hoc sleeps between venues.

use std::time::Duration;

use tokio::sync::{Mutex, Semaphore, SemaphorePermit};
use tokio::time::Instant;

/// Bounded-concurrency, minimum-spacing admission gate shared by all chain
/// calls issued for one request.
pub struct CallGate {
    permits: Semaphore,
    next_slot: Mutex<Instant>,
    spacing: Duration,
}

/// Held for the duration of one gated chain call
pub struct GatePass<'a> {
    _permit: SemaphorePermit<'a>,
}

impl CallGate {
    pub fn new(max_concurrent: usize, spacing: Duration) -> Self {
        Self {
            permits: Semaphore::new(max_concurrent.max(1)),
            next_slot: Mutex::new(Instant::now()),
            spacing,
        }
    }

    /// Wait for an admission slot. The returned pass must be held until the
    /// call completes; dropping it frees the concurrency slot.
    pub async fn admit(&self) -> GatePass<'_> {
        let permit = self
            .permits
            .acquire()
            .await
            .expect("call gate semaphore is never closed");

        let wake_at = {
            let mut next = self.next_slot.lock().await;
            let slot = (*next).max(Instant::now());
            *next = slot + self.spacing;
            slot
        };
        tokio::time::sleep_until(wake_at).await;

        GatePass { _permit: permit }
    }
}
