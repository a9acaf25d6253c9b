//! Time sources for token issuance and verification.

use chrono::Utc;

/// Source of the current time in unix seconds.
///
/// Implementations must be immutable once shared; the verifier reads the
/// clock on every call and never caches the result.
pub trait Clock: Send + Sync {
    /// Current time as seconds since the unix epoch.
    fn now(&self) -> i64;
}

/// Wall-clock time via `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock frozen at one instant. Useful for exercising expiry boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
