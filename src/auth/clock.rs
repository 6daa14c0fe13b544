/// Time source for token expiry
///
/// Issuance and verification read the current instant through `Clock`
/// so tests can pin time instead of sleeping.

use std::sync::atomic::{AtomicI64, Ordering};

/// Supplies the current time as a Unix timestamp in seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time, used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        let clock = SystemClock;
        let t1 = clock.now();
        let t2 = clock.now();

        // After 2020-01-01
        assert!(t1 > 1_577_836_800);
        assert!(t2 >= t1);
    }

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(chrono::Duration::minutes(30));
        assert_eq!(clock.now(), 2800);

        clock.set(42);
        assert_eq!(clock.now(), 42);
    }
}
