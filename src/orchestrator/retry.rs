use crate::engine::types::ProviderResult;
use std::time::Duration;
use tokio::time::sleep;

pub struct RetryPolicy {
    max_retries: u8,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u8) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(2),
        }
    }

    /// Transport and vendor errors may be retried; `Unavailable` means a
    /// missing credential and is final for the session.
    pub fn should_retry(&self, attempt: u8, result: &ProviderResult) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        result.is_retryable()
    }

    pub async fn wait_before_retry(&self, attempt: u8) {
        let multiplier = 2u64.saturating_pow(attempt as u32);
        let delay_secs = self.base_delay.as_secs().saturating_mul(multiplier);
        let delay = Duration::from_secs(delay_secs.max(1));

        tracing::info!("Retrying in {}s (attempt {})", delay.as_secs(), attempt + 2);
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_errors_within_bound() {
        let policy = RetryPolicy::new(2);
        let error = ProviderResult::Error {
            message: "reset".to_string(),
        };

        assert!(policy.should_retry(0, &error));
        assert!(policy.should_retry(1, &error));
        assert!(!policy.should_retry(2, &error));
    }

    #[test]
    fn never_retries_unavailable() {
        let policy = RetryPolicy::new(3);
        let unavailable = ProviderResult::Unavailable {
            reason: "no key".to_string(),
        };

        assert!(!policy.should_retry(0, &unavailable));
    }

    #[test]
    fn never_retries_success() {
        let policy = RetryPolicy::new(3);
        let success = ProviderResult::Success {
            text: "ok".to_string(),
        };

        assert!(!policy.should_retry(0, &success));
    }
}
