//! Clock abstraction for deterministic signing in tests.
//!
//! Request signing reads the current UTC time on every request; this trait
//! lets tests substitute a fixed instant instead of racing the system clock.

use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the current Unix timestamp used to stamp and sign a request.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now_unix_secs(&self) -> u64;
}

/// Reads the process clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time is after Unix epoch")
            .as_secs()
    }
}

/// Returns a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_unix_secs(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_returns_its_value() {
        let clock = FixedClock(1_369_353_600);
        assert_eq!(clock.now_unix_secs(), 1_369_353_600);
    }

    #[test]
    fn system_clock_is_plausible() {
        let clock = SystemClock;
        assert!(clock.now_unix_secs() > 1_700_000_000);
    }
}
