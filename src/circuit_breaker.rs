//! # Circuit Breaker Module
//!
//! Stops calling a failing collaborator (OCR engine, product API) for a while
//! after repeated failures.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::recovery::RecoveryConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure: Option<Instant>,
}

/// Circuit breaker guarding one external collaborator
///
/// # State Machine
///
/// - **Closed**: normal operation, requests pass through
/// - **Open**: `circuit_breaker_threshold` consecutive failures were recorded
///   less than `circuit_breaker_reset_secs` ago; requests fail fast
/// - Once the reset time has elapsed the breaker closes again and the next
///   request is let through
#[derive(Debug)]
pub struct CircuitBreaker {
    name: &'static str,
    state: Mutex<BreakerState>,
    config: RecoveryConfig,
}

impl CircuitBreaker {
    /// Create a closed circuit breaker
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pawcheck::circuit_breaker::CircuitBreaker;
    /// use pawcheck::recovery::RecoveryConfig;
    ///
    /// let breaker = CircuitBreaker::new(RecoveryConfig::default());
    /// assert!(!breaker.is_open());
    /// ```
    pub fn new(config: RecoveryConfig) -> Self {
        Self::named("default", config)
    }

    /// Create a closed circuit breaker with a name used in log events
    pub fn named(name: &'static str, config: RecoveryConfig) -> Self {
        Self {
            name,
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    /// True while the breaker rejects requests
    pub fn is_open(&self) -> bool {
        let mut state = self.lock();

        if state.failure_count < self.config.circuit_breaker_threshold {
            return false;
        }

        let reset_after = Duration::from_secs(self.config.circuit_breaker_reset_secs);
        match state.last_failure {
            Some(last) if last.elapsed() < reset_after => true,
            _ => {
                info!(breaker = self.name, "Circuit breaker reset after cool-down");
                *state = BreakerState::default();
                false
            }
        }
    }

    /// Record a failed call
    pub fn record_failure(&self) {
        let mut state = self.lock();
        state.failure_count = state.failure_count.saturating_add(1);
        state.last_failure = Some(Instant::now());

        if state.failure_count == self.config.circuit_breaker_threshold {
            warn!(
                breaker = self.name,
                failures = state.failure_count,
                "Circuit breaker opened"
            );
        }
    }

    /// Record a successful call, closing the breaker
    pub fn record_success(&self) {
        *self.lock() = BreakerState::default();
    }

    /// Consecutive failures recorded since the last success or reset
    pub fn failure_count(&self) -> u32 {
        self.lock().failure_count
    }

    // A poisoned lock still holds valid counters
    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u32, reset_secs: u64) -> CircuitBreaker {
        CircuitBreaker::named(
            "test",
            RecoveryConfig {
                circuit_breaker_threshold: threshold,
                circuit_breaker_reset_secs: reset_secs,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_opens_after_threshold() {
        let breaker = breaker(2, 60);

        assert!(!breaker.is_open());
        breaker.record_failure();
        assert!(!breaker.is_open());
        breaker.record_failure();
        assert!(breaker.is_open());
        assert_eq!(breaker.failure_count(), 2);
    }

    #[test]
    fn test_success_closes_breaker() {
        let breaker = breaker(1, 60);

        breaker.record_failure();
        assert!(breaker.is_open());
        breaker.record_success();
        assert!(!breaker.is_open());
        assert_eq!(breaker.failure_count(), 0);
    }

    #[test]
    fn test_resets_after_cool_down() {
        let breaker = breaker(1, 0);

        breaker.record_failure();
        // A zero-second reset window has always elapsed
        assert!(!breaker.is_open());
        assert_eq!(breaker.failure_count(), 0);
    }
}
