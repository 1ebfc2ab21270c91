//! RDAP (Registration Data Access Protocol) backend.
//!
//! A registry answers `GET <endpoint><domain>` with 200 when the domain is
//! registered and 404 when it is not. 429 means the client is being rate
//! limited.

use crate::error::HomoglyphError;
use crate::protocols::registry::get_rdap_endpoint;
use crate::protocols::Registrar;
use crate::types::RegistrarAvailability;
use crate::utils::extract_tld;
use reqwest::StatusCode;
use std::time::Duration;

const SERVICE: &str = "RDAP";

/// RDAP client for checking domain availability.
#[derive(Debug, Clone)]
pub struct RdapRegistrar {
    /// HTTP client for making RDAP requests
    http_client: reqwest::Client,
    /// Fixed endpoint base URL; when unset the endpoint is looked up per TLD
    endpoint: Option<String>,
}

impl RdapRegistrar {
    /// Create a new RDAP client with default settings.
    pub fn new() -> Result<Self, HomoglyphError> {
        Self::with_config(Duration::from_secs(10), None)
    }

    /// Create a new RDAP client with a request timeout and optional fixed endpoint.
    pub fn with_config(
        timeout: Duration,
        endpoint: Option<String>,
    ) -> Result<Self, HomoglyphError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("homoglyph-check/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                HomoglyphError::network(format!("Failed to create RDAP HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    async fn endpoint_for(&self, domain: &str) -> Result<String, HomoglyphError> {
        match &self.endpoint {
            Some(endpoint) => Ok(endpoint.clone()),
            None => {
                let tld = extract_tld(domain)?;
                get_rdap_endpoint(&tld, true).await
            }
        }
    }
}

impl Registrar for RdapRegistrar {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn check_availability(
        &self,
        domain: &str,
    ) -> Result<RegistrarAvailability, HomoglyphError> {
        let endpoint = self.endpoint_for(domain).await?;
        let rdap_url = format!("{}{}", endpoint, domain);

        tracing::debug!("RDAP request: {}", rdap_url);

        let response = self
            .http_client
            .get(&rdap_url)
            .send()
            .await
            .map_err(HomoglyphError::from)?;

        match response.status() {
            StatusCode::OK => Ok(RegistrarAvailability::Unavailable),
            StatusCode::NOT_FOUND => Ok(RegistrarAvailability::Available),
            StatusCode::TOO_MANY_REQUESTS => Err(HomoglyphError::throttled(
                SERVICE,
                format!("{} answered 429 Too Many Requests", endpoint),
            )),
            code => Err(HomoglyphError::registrar_with_code(
                SERVICE,
                code.as_u16().to_string(),
                format!("RDAP server returned {}", code),
            )),
        }
    }
}
