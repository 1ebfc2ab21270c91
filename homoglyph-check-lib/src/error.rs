//! Error handling for homoglyph checking.
//!
//! Only configuration, argument and client-setup failures ever leave the
//! library as errors. Per-candidate problems (encoding failures, throttling,
//! registrar errors) are folded into [`AvailabilityStatus`](crate::AvailabilityStatus)
//! values by the driver so a single bad candidate never aborts a run.

use thiserror::Error;

/// Main error type for homoglyph checking operations.
#[derive(Debug, Clone, Error)]
pub enum HomoglyphError {
    /// Invalid base domain passed by the caller
    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// Configuration file missing, unreadable or malformed
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File I/O errors when reading the configuration
    #[error("File error at '{path}': {message}")]
    FileError { path: String, message: String },

    /// The registrar rejected the request because of its rate quota
    #[error("Rate limited by {service}: {message}")]
    Throttled { service: String, message: String },

    /// Any non-throttle failure reported by the registrar
    #[error("{}", format_registrar_error(.service, .code, .message))]
    RegistrarError {
        service: String,
        code: Option<String>,
        message: String,
    },

    /// Network-related errors (connection, timeout, etc.)
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// RDAP bootstrap registry lookup failures
    #[error("Bootstrap error for TLD '{tld}': {message}")]
    BootstrapError { tld: String, message: String },

    /// Generic internal errors that don't fit other categories
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_registrar_error(service: &str, code: &Option<String>, message: &str) -> String {
    match code {
        Some(code) => format!("{} error ({}): {}", service, code, message),
        None => format!("{} error: {}", service, message),
    }
}

impl HomoglyphError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new throttling error.
    pub fn throttled<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Throttled {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new registrar error without a machine-readable code.
    pub fn registrar<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::RegistrarError {
            service: service.into(),
            code: None,
            message: message.into(),
        }
    }

    /// Create a new registrar error carrying the service's error code.
    pub fn registrar_with_code<S, C, M>(service: S, code: C, message: M) -> Self
    where
        S: Into<String>,
        C: Into<String>,
        M: Into<String>,
    {
        Self::RegistrarError {
            service: service.into(),
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Create a new bootstrap error.
    pub fn bootstrap<T: Into<String>, M: Into<String>>(tld: T, message: M) -> Self {
        Self::BootstrapError {
            tld: tld.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the availability client should back off and try again.
    ///
    /// Only throttling is transient; every other remote failure is final.
    pub fn is_throttle(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}

impl From<reqwest::Error> for HomoglyphError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            Self::network(format!("connection failed: {}", err))
        } else {
            Self::network(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<toml::de::Error> for HomoglyphError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}
