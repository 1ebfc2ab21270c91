//! Availability lookups with bounded exponential backoff.
//!
//! Only throttling is retried. Every other failure ends the check for that
//! domain immediately and is reported as [`AvailabilityStatus::Error`].

use crate::protocols::Registrar;
use crate::types::{AvailabilityStatus, RetryPolicy};
use rand::Rng;
use std::time::Duration;

/// Wraps a [`Registrar`] with the retry policy applied to throttled calls.
#[derive(Debug, Clone)]
pub struct AvailabilityClient<R> {
    registrar: R,
    policy: RetryPolicy,
}

impl<R: Registrar> AvailabilityClient<R> {
    pub fn new(registrar: R, policy: RetryPolicy) -> Self {
        Self { registrar, policy }
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Check one ASCII domain, retrying while the registrar throttles.
    ///
    /// Never fails: every outcome, including exhaustion of the retry budget,
    /// is an [`AvailabilityStatus`].
    pub async fn check(&self, domain: &str) -> AvailabilityStatus {
        let max_attempts = self.policy.max_attempts;

        for attempt in 0..max_attempts {
            match self.registrar.check_availability(domain).await {
                Ok(availability) => {
                    tracing::debug!(
                        "{} -> {:?} (attempt {}/{})",
                        domain,
                        availability,
                        attempt + 1,
                        max_attempts
                    );
                    return availability.into();
                }
                Err(e) if e.is_throttle() => {
                    if attempt + 1 == max_attempts {
                        tracing::debug!("{} still throttled after {} attempts", domain, max_attempts);
                        return AvailabilityStatus::RateLimited;
                    }
                    let wait = backoff_delay(&self.policy, attempt);
                    tracing::warn!(
                        "Rate limit hit. Waiting for {:.2} seconds before retry.",
                        wait.as_secs_f64()
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => {
                    tracing::debug!("{} lookup failed on {}: {}", domain, self.registrar.name(), e);
                    return AvailabilityStatus::Error(e.to_string());
                }
            }
        }

        AvailabilityStatus::MaxRetriesReached
    }
}

/// Delay before retrying after `attempt` (0-based) was throttled.
fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let jitter = policy.max_jitter.mul_f64(rand::thread_rng().gen::<f64>());
    policy.base_backoff(attempt).saturating_add(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HomoglyphError;
    use crate::types::RegistrarAvailability;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    type Reply = Result<RegistrarAvailability, HomoglyphError>;

    /// Replays scripted replies; answers Unavailable once the script runs out.
    struct ScriptedRegistrar {
        replies: Mutex<VecDeque<Reply>>,
        calls: AtomicUsize,
    }

    impl ScriptedRegistrar {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Registrar for ScriptedRegistrar {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn check_availability(&self, _domain: &str) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(RegistrarAvailability::Unavailable))
        }
    }

    fn throttle() -> Reply {
        Err(HomoglyphError::throttled("scripted", "Rate exceeded"))
    }

    #[test]
    fn test_backoff_delay_bounds() {
        let policy = RetryPolicy::default();
        for attempt in 0..4 {
            let delay = backoff_delay(&policy, attempt);
            let base = Duration::from_secs(1 << attempt);
            assert!(delay >= base, "attempt {}: {:?}", attempt, delay);
            assert!(delay < base + Duration::from_secs(1), "attempt {}: {:?}", attempt, delay);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_call() {
        let client = AvailabilityClient::new(
            ScriptedRegistrar::new(vec![Ok(RegistrarAvailability::Available)]),
            RetryPolicy::default(),
        );
        let start = Instant::now();

        assert_eq!(client.check("a4.com").await, AvailabilityStatus::Available);
        assert_eq!(client.registrar().calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_then_success() {
        let client = AvailabilityClient::new(
            ScriptedRegistrar::new(vec![
                throttle(),
                throttle(),
                Ok(RegistrarAvailability::Available),
            ]),
            RetryPolicy::default(),
        );
        let start = Instant::now();

        assert_eq!(client.check("a4.com").await, AvailabilityStatus::Available);
        assert_eq!(client.registrar().calls(), 3);

        // 1s + 2s of backoff, each with under a second of jitter
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "{:?}", elapsed);
        assert!(elapsed < Duration::from_secs(5), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_every_attempt() {
        let client = AvailabilityClient::new(
            ScriptedRegistrar::new((0..10).map(|_| throttle()).collect()),
            RetryPolicy::default(),
        );
        let start = Instant::now();

        assert_eq!(client.check("a4.com").await, AvailabilityStatus::RateLimited);
        assert_eq!(client.registrar().calls(), 5);

        // No sleep after the final attempt: 1 + 2 + 4 + 8 plus jitter
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(15), "{:?}", elapsed);
        assert!(elapsed < RetryPolicy::default().worst_case_wait(), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_error_is_not_retried() {
        let client = AvailabilityClient::new(
            ScriptedRegistrar::new(vec![Err(HomoglyphError::registrar_with_code(
                "scripted",
                "UnsupportedTLD",
                "TLD is not supported",
            ))]),
            RetryPolicy::default(),
        );

        let status = client.check("a4.com").await;
        assert_eq!(client.registrar().calls(), 1);
        match status {
            AvailabilityStatus::Error(message) => assert!(message.contains("UnsupportedTLD")),
            other => panic!("expected error status, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_after_throttle_stops_retrying() {
        let client = AvailabilityClient::new(
            ScriptedRegistrar::new(vec![
                throttle(),
                Err(HomoglyphError::network("connection reset")),
                Ok(RegistrarAvailability::Available),
            ]),
            RetryPolicy::default(),
        );

        assert!(matches!(
            client.check("a4.com").await,
            AvailabilityStatus::Error(_)
        ));
        assert_eq!(client.registrar().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_classification_passes_through() {
        let client = AvailabilityClient::new(
            ScriptedRegistrar::new(vec![Ok(RegistrarAvailability::Other(
                "RESERVED".to_string(),
            ))]),
            RetryPolicy::default(),
        );

        assert_eq!(
            client.check("a4.com").await,
            AvailabilityStatus::Other("RESERVED".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let client = AvailabilityClient::new(ScriptedRegistrar::new(vec![]), policy);

        assert_eq!(
            client.check("a4.com").await,
            AvailabilityStatus::MaxRetriesReached
        );
        assert_eq!(client.registrar().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        let client = AvailabilityClient::new(ScriptedRegistrar::new(vec![throttle()]), policy);
        let start = Instant::now();

        assert_eq!(client.check("a4.com").await, AvailabilityStatus::RateLimited);
        assert_eq!(client.registrar().calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
