pub mod claims;
pub mod funds;
pub mod handlers;
pub mod ingest;
pub mod issuance;
pub mod status;

use std::sync::atomic::{AtomicBool, Ordering};

/// Per-job re-entrancy guard: if the prior invocation is still running when
/// the timer fires, the new one is skipped entirely, never queued.
pub struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
