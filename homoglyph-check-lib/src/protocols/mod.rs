//! Registrar protocol implementations.
//!
//! Every backend answers one question: can this ASCII domain be registered?
//! Throttling is reported as [`HomoglyphError::Throttled`] so the
//! availability client can back off; any other failure is final.

/// RDAP (Registration Data Access Protocol) backend
pub mod rdap;

/// TLD -> RDAP endpoint mappings and IANA bootstrap discovery
pub mod registry;

/// AWS Route 53 Domains backend
pub mod route53;

use crate::error::HomoglyphError;
use crate::types::{Backend, CheckConfig, RegistrarAvailability};
use std::future::Future;

pub use rdap::RdapRegistrar;
pub use registry::{get_rdap_endpoint, get_rdap_registry_map};
pub use route53::Route53Registrar;

/// A remote service that reports whether a domain is registered.
pub trait Registrar: Send + Sync {
    /// Human-readable service name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Perform exactly one availability lookup for an ASCII domain.
    fn check_availability(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<RegistrarAvailability, HomoglyphError>> + Send;
}

/// The registrar selected by configuration.
#[derive(Debug, Clone)]
pub enum RegistrarBackend {
    Route53(Route53Registrar),
    Rdap(RdapRegistrar),
}

impl RegistrarBackend {
    /// Build the backend named by `config.backend`.
    ///
    /// Route 53 credentials come from the standard AWS provider chain and are
    /// only resolved on the first request.
    pub async fn from_config(config: &CheckConfig) -> Result<Self, HomoglyphError> {
        match config.backend {
            Backend::Route53 => Ok(Self::Route53(
                Route53Registrar::from_region(&config.region).await,
            )),
            Backend::Rdap => Ok(Self::Rdap(RdapRegistrar::with_config(
                config.timeout,
                config.rdap_endpoint.clone(),
            )?)),
        }
    }
}

impl Registrar for RegistrarBackend {
    fn name(&self) -> &'static str {
        match self {
            Self::Route53(registrar) => registrar.name(),
            Self::Rdap(registrar) => registrar.name(),
        }
    }

    async fn check_availability(
        &self,
        domain: &str,
    ) -> Result<RegistrarAvailability, HomoglyphError> {
        match self {
            Self::Route53(registrar) => registrar.check_availability(domain).await,
            Self::Rdap(registrar) => registrar.check_availability(domain).await,
        }
    }
}
