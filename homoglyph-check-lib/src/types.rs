//! Core data types for homoglyph checking.
//!
//! This module defines the availability outcome of a lookup, the retry
//! policy applied to throttled lookups and the runtime configuration that
//! the CLI assembles from files, environment and flags.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Classification reported by a registrar for a single domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrarAvailability {
    /// The domain can be registered
    Available,
    /// The domain is registered
    Unavailable,
    /// Any other classification, kept verbatim (e.g. "PENDING", "RESERVED")
    Other(String),
}

/// Outcome of one availability check, after retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
    /// Registrar classification other than available/unavailable
    Other(String),
    /// Throttled on every allowed attempt
    RateLimited,
    /// Non-retryable registrar or transport failure
    Error(String),
    /// Retry loop ended without a terminal answer
    MaxRetriesReached,
}

impl AvailabilityStatus {
    /// Whether the registrar said the domain can be registered.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl From<RegistrarAvailability> for AvailabilityStatus {
    fn from(availability: RegistrarAvailability) -> Self {
        match availability {
            RegistrarAvailability::Available => Self::Available,
            RegistrarAvailability::Unavailable => Self::Unavailable,
            RegistrarAvailability::Other(classification) => Self::Other(classification),
        }
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "AVAILABLE"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::Other(classification) => write!(f, "{}", classification),
            Self::RateLimited => write!(f, "Rate limit exceeded"),
            Self::Error(message) => write!(f, "ERROR: {}", message),
            Self::MaxRetriesReached => write!(f, "Max retries reached"),
        }
    }
}

/// Bounded exponential backoff applied to throttled lookups.
///
/// Attempt `n` (0-based) that gets throttled waits
/// `base_delay * 2^n + uniform(0, max_jitter)` before attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of lookups allowed per domain
    pub max_attempts: u32,
    /// Delay before the first retry, doubled on every further retry
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random jitter added to each delay
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retrying after `attempt` was throttled, without jitter.
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }

    /// Worst-case time spent sleeping for a single domain.
    pub fn worst_case_wait(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt| self.base_backoff(attempt) + self.max_jitter)
            .fold(Duration::ZERO, |total, d| total.saturating_add(d))
    }
}

/// Which registrar service answers availability lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// AWS Route 53 Domains `CheckDomainAvailability`
    #[default]
    Route53,
    /// RDAP over HTTPS
    Rdap,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "route53" | "route53domains" | "aws" => Ok(Self::Route53),
            "rdap" => Ok(Self::Rdap),
            other => Err(format!(
                "unknown registrar backend '{}', expected 'route53' or 'rdap'",
                other
            )),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Route53 => write!(f, "Route 53 Domains"),
            Backend::Rdap => write!(f, "RDAP"),
        }
    }
}

/// Runtime configuration for a checking run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Registrar backend
    /// Default: Route 53 Domains
    pub backend: Backend,

    /// AWS region for the Route 53 Domains API
    /// Default: us-east-1 (the only region that serves it)
    pub region: String,

    /// Fixed RDAP endpoint base URL, bypassing TLD lookup
    pub rdap_endpoint: Option<String>,

    /// Timeout for a single RDAP request
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Backoff policy for throttled lookups
    pub retry: RetryPolicy,

    /// Pause between consecutive candidates
    /// Default: 1 second
    pub pacing: Duration,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            region: "us-east-1".to_string(),
            rdap_endpoint: None,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            pacing: Duration::from_secs(1),
        }
    }
}

impl CheckConfig {
    /// Select the registrar backend.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the AWS region.
    pub fn with_region<R: Into<String>>(mut self, region: R) -> Self {
        self.region = region.into();
        self
    }

    /// Set the maximum number of lookups per domain.
    ///
    /// Capped at 10 so a fully throttled domain cannot stall the run for
    /// more than a few minutes.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry.max_attempts = max_attempts.clamp(1, 10);
        self
    }

    /// Set the pause between consecutive candidates.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pin the RDAP endpoint.
    pub fn with_rdap_endpoint<E: Into<String>>(mut self, endpoint: E) -> Self {
        self.rdap_endpoint = Some(endpoint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_matches_report_text() {
        assert_eq!(AvailabilityStatus::Available.to_string(), "AVAILABLE");
        assert_eq!(AvailabilityStatus::Unavailable.to_string(), "UNAVAILABLE");
        assert_eq!(
            AvailabilityStatus::RateLimited.to_string(),
            "Rate limit exceeded"
        );
        assert_eq!(
            AvailabilityStatus::Error("boom".to_string()).to_string(),
            "ERROR: boom"
        );
        assert_eq!(
            AvailabilityStatus::Other("PENDING".to_string()).to_string(),
            "PENDING"
        );
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base_backoff(0), Duration::from_secs(1));
        assert_eq!(policy.base_backoff(1), Duration::from_secs(2));
        assert_eq!(policy.base_backoff(4), Duration::from_secs(16));
    }

    #[test]
    fn test_worst_case_wait_default() {
        // Four sleeps for five attempts: 1 + 2 + 4 + 8 seconds plus up to 1s jitter each.
        let policy = RetryPolicy::default();
        assert_eq!(policy.worst_case_wait(), Duration::from_secs(15 + 4));
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("route53".parse::<Backend>(), Ok(Backend::Route53));
        assert_eq!(" RDAP ".parse::<Backend>(), Ok(Backend::Rdap));
        assert!("whois".parse::<Backend>().is_err());
    }

    #[test]
    fn test_max_attempts_clamped() {
        let config = CheckConfig::default().with_max_attempts(0);
        assert_eq!(config.retry.max_attempts, 1);
        let config = CheckConfig::default().with_max_attempts(50);
        assert_eq!(config.retry.max_attempts, 10);
    }

    #[test]
    fn test_builders_leave_retry_policy_alone() {
        let config = CheckConfig::default()
            .with_backend(Backend::Rdap)
            .with_region("eu-west-1")
            .with_timeout(Duration::from_secs(3))
            .with_pacing(Duration::from_millis(250))
            .with_rdap_endpoint("http://localhost:8080/domain/");

        assert_eq!(config.backend, Backend::Rdap);
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.pacing, Duration::from_millis(250));
        assert_eq!(
            config.rdap_endpoint.as_deref(),
            Some("http://localhost:8080/domain/")
        );
        assert_eq!(config.retry, RetryPolicy::default());
    }
}
