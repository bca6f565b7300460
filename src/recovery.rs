//! # Recovery Module
//!
//! Retry and backoff policy shared by the OCR pipeline and the product lookup
//! client.

use rand::Rng;

/// Recovery configuration for error handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts after the first one
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single attempt in seconds
    pub operation_timeout_secs: u64,
    /// Consecutive failures before the circuit breaker opens
    pub circuit_breaker_threshold: u32,
    /// Time the circuit breaker stays open, in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 1000,  // 1 second
            max_retry_delay_ms: 10000,  // 10 seconds
            operation_timeout_secs: 30, // 30 seconds
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Delay before retry number `attempt` (1-based), in milliseconds
///
/// Exponential backoff from `base_retry_delay_ms`, capped at
/// `max_retry_delay_ms`, plus up to 10% random jitter.
pub fn calculate_retry_delay(attempt: u32, config: &RecoveryConfig) -> u64 {
    let exponent = attempt.saturating_sub(1).min(16);
    let backoff = config
        .base_retry_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(config.max_retry_delay_ms);

    let jitter_range = backoff / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..=jitter_range)
    } else {
        0
    };

    backoff + jitter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_config_defaults() {
        let recovery = RecoveryConfig::default();

        assert_eq!(recovery.max_retries, 3);
        assert_eq!(recovery.base_retry_delay_ms, 1000);
        assert_eq!(recovery.max_retry_delay_ms, 10000);
        assert_eq!(recovery.operation_timeout_secs, 30);
        assert_eq!(recovery.circuit_breaker_threshold, 5);
        assert_eq!(recovery.circuit_breaker_reset_secs, 60);
    }

    #[test]
    fn test_calculate_retry_delay_backoff() {
        let recovery = RecoveryConfig::default();

        let delay1 = calculate_retry_delay(1, &recovery);
        assert!((1000..=1100).contains(&delay1));

        let delay2 = calculate_retry_delay(2, &recovery);
        assert!((2000..=2200).contains(&delay2));

        let delay3 = calculate_retry_delay(3, &recovery);
        assert!((4000..=4400).contains(&delay3));
    }

    #[test]
    fn test_calculate_retry_delay_is_capped() {
        let recovery = RecoveryConfig::default();

        for attempt in [5, 10, 40, u32::MAX] {
            let delay = calculate_retry_delay(attempt, &recovery);
            assert!(delay >= recovery.max_retry_delay_ms);
            assert!(delay <= recovery.max_retry_delay_ms + recovery.max_retry_delay_ms / 10);
        }
    }

    #[test]
    fn test_calculate_retry_delay_without_base() {
        let recovery = RecoveryConfig {
            base_retry_delay_ms: 0,
            ..Default::default()
        };
        assert_eq!(calculate_retry_delay(3, &recovery), 0);
    }
}
