// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time source used to stamp actor lifecycle changes.
#[cfg(any(test, feature = "test_utils"))]
use std::sync::Arc;
#[cfg(any(test, feature = "test_utils"))]
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// UNIX timestamp in seconds.
pub type Timestamp = u64;

/// Interface for a clock handing out timestamps.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Clock reading the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        current_timestamp()
    }
}

pub fn current_timestamp() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is not behind")
        .as_secs()
}

/// Clock which only moves when told to. Clones share the same time.
#[cfg(any(test, feature = "test_utils"))]
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Arc<AtomicU64>);

#[cfg(any(test, feature = "test_utils"))]
impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self(Arc::new(AtomicU64::new(now)))
    }

    pub fn set(&self, now: Timestamp) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test_utils"))]
impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.0.load(Ordering::SeqCst)
    }
}
