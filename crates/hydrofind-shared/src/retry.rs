//! # Retry / Backoff Policy
//!
//! Transient failures are retried with exponential backoff, capped at 30
//! seconds, up to a configurable maximum retry count. Only
//! `transient_upstream` failures are retried; everything else is terminal.

use std::time::Duration;

/// Delay before the next attempt, given the number of retries already made:
/// `min(30, 2^retry_count)` seconds.
pub fn backoff_delay(retry_count: u32) -> Duration {
    let capped_exp = retry_count.min(5); // 2^5 = 32 already exceeds the 30s cap
    let secs = 2u64.saturating_pow(capped_exp).min(30);
    Duration::from_secs(secs)
}

/// Whether another attempt should be made, given the retry count already
/// recorded on the task and the configured maximum.
pub fn should_retry(retry_count: u32, max_retries: u32) -> bool {
    retry_count < max_retries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn backoff_never_exceeds_thirty_seconds() {
        assert_eq!(backoff_delay(10), Duration::from_secs(30));
        assert_eq!(backoff_delay(100), Duration::from_secs(30));
    }

    #[test]
    fn should_retry_respects_configured_max() {
        assert!(should_retry(0, 3));
        assert!(should_retry(2, 3));
        assert!(!should_retry(3, 3));
    }
}
