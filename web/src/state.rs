//! Process-level state shared by handlers and middleware.
//!
//! Applications embed [`ProcessState`] in their own router state and expose
//! it through `axum::extract::FromRef`, the same way domain state is exposed
//! to the handlers that need it.

use std::sync::Arc;
use std::time::{Duration, Instant};
use ticket_trader_core::clock::{Clock, SystemClock, format_timestamp};
use ticket_trader_core::constants::Environment;

/// Clock, environment profile and start instant of the running process.
///
/// # Examples
///
/// ```ignore
/// #[derive(Clone)]
/// struct AppState {
///     process: ProcessState,
///     database: Arc<DatabaseConnector>,
/// }
///
/// impl FromRef<AppState> for ProcessState {
///     fn from_ref(state: &AppState) -> Self {
///         state.process.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct ProcessState {
    clock: Arc<dyn Clock>,
    environment: Environment,
    started_at: Instant,
}

impl ProcessState {
    /// Create state for a process starting now.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, environment: Environment) -> Self {
        Self {
            clock,
            environment,
            started_at: Instant::now(),
        }
    }

    /// State backed by the system clock.
    #[must_use]
    pub fn system(environment: Environment) -> Self {
        Self::new(Arc::new(SystemClock), environment)
    }

    /// Injected time source.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Current time as it appears in response bodies.
    #[must_use]
    pub fn timestamp(&self) -> String {
        format_timestamp(self.clock.now())
    }

    /// Active environment profile.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Time since this state was created. Monotonic.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl std::fmt::Debug for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessState")
            .field("environment", &self.environment)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_trader_testing::{TEST_CLOCK_TIMESTAMP, test_clock};

    #[test]
    fn test_state_is_clone() {
        // Axum router state must be Clone
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<ProcessState>();
    }

    #[test]
    fn test_timestamp_uses_injected_clock() {
        let state = ProcessState::new(Arc::new(test_clock()), Environment::Test);
        assert_eq!(state.timestamp(), TEST_CLOCK_TIMESTAMP);
        assert_eq!(state.environment(), Environment::Test);
    }

    #[test]
    fn test_uptime_is_monotonic() {
        let state = ProcessState::system(Environment::Development);
        let first = state.uptime();
        let second = state.uptime();
        assert!(second >= first);
    }
}
