//! AWS Route 53 Domains backend.
//!
//! Calls `CheckDomainAvailability`. The service signals rate limiting with
//! the `ThrottlingException` error code; every other error code is final.

use crate::error::HomoglyphError;
use crate::protocols::Registrar;
use crate::types::RegistrarAvailability;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_route53domains::config::Region;
use aws_sdk_route53domains::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_route53domains::types::DomainAvailability;
use aws_sdk_route53domains::Client;

const SERVICE: &str = "Route 53 Domains";

/// Error code Route 53 Domains uses for rate limiting.
pub const THROTTLING_CODE: &str = "ThrottlingException";

/// Route 53 Domains client.
#[derive(Debug, Clone)]
pub struct Route53Registrar {
    client: Client,
}

impl Route53Registrar {
    /// Wrap an already configured SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client for `region` from the default AWS configuration chain.
    ///
    /// SDK-level retries are disabled: each call is exactly one request and
    /// throttling surfaces to the caller's retry policy.
    pub async fn from_region(region: &str) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(RetryConfig::disabled())
            .load()
            .await;
        tracing::debug!("Route 53 Domains client configured for region {}", region);
        Self::new(Client::new(&shared))
    }
}

impl Registrar for Route53Registrar {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn check_availability(
        &self,
        domain: &str,
    ) -> Result<RegistrarAvailability, HomoglyphError> {
        let result = self
            .client
            .check_domain_availability()
            .domain_name(domain)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output
                .availability()
                .map(classify)
                .unwrap_or_else(|| RegistrarAvailability::Other("UNKNOWN".to_string()))),
            Err(err) => {
                let message = err
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
                Err(map_error(err.code(), message))
            }
        }
    }
}

/// Map a Route 53 Domains availability value onto a registrar classification.
pub fn classify(availability: &DomainAvailability) -> RegistrarAvailability {
    match availability {
        DomainAvailability::Available => RegistrarAvailability::Available,
        DomainAvailability::Unavailable => RegistrarAvailability::Unavailable,
        other => RegistrarAvailability::Other(other.as_str().to_string()),
    }
}

/// Turn a service error code and message into a library error.
fn map_error(code: Option<&str>, message: String) -> HomoglyphError {
    match code {
        Some(THROTTLING_CODE) => HomoglyphError::throttled(SERVICE, message),
        Some(code) => HomoglyphError::registrar_with_code(SERVICE, code, message),
        None => HomoglyphError::registrar(SERVICE, message),
    }
}
