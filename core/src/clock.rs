//! Time abstraction.
//!
//! Handlers and middleware never call `Utc::now()` directly; they ask a
//! [`Clock`] that is injected through application state. Production code uses
//! [`SystemClock`], tests use a fixed clock.

use chrono::{DateTime, SecondsFormat, Utc};

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```ignore
/// // Production - uses system clock
/// let clock = SystemClock;
/// let now = clock.now();
///
/// // Test - fixed time for deterministic tests
/// struct FixedClock { time: DateTime<Utc> }
/// impl Clock for FixedClock {
///     fn now(&self) -> DateTime<Utc> {
///         self.time
///     }
/// }
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Render a timestamp the way every response body does: RFC 3339, UTC,
/// millisecond precision, `Z` suffix (e.g. `2025-01-01T00:00:00.000Z`).
#[must_use]
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_uses_millis_and_z_suffix() {
        let time = Utc.with_ymd_and_hms(2025, 1, 1, 12, 30, 5).single();
        assert_eq!(
            time.map(format_timestamp).as_deref(),
            Some("2025-01-01T12:30:05.000Z")
        );
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
