//! Configuration file parsing and management.
//!
//! The configuration file is a TOML document at a fixed relative path
//! (`similar_chars.toml` unless overridden). It must contain a
//! `[similar_chars]` table and may contain a `[registrar]` table:
//!
//! ```toml
//! [similar_chars]
//! a = ["a", "а", "4"]
//! o = ["o", "о", "0"]
//!
//! [registrar]
//! backend = "route53"
//! region = "us-east-1"
//! max_retries = 5
//! pacing = "1s"
//! ```

use crate::confusables::ConfusableMap;
use crate::error::HomoglyphError;
use crate::types::{Backend, CheckConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "similar_chars.toml";

/// Configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Confusable sets keyed by character (required)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar_chars: Option<BTreeMap<String, Vec<String>>>,

    /// Registrar and pacing settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<RegistrarConfig>,
}

/// `[registrar]` table of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistrarConfig {
    /// "route53" or "rdap"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    /// AWS region for Route 53 Domains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Fixed RDAP endpoint base URL (e.g. "https://rdap.verisign.com/com/v1/domain/")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap_endpoint: Option<String>,

    /// Per-request timeout (as string, e.g., "5s", "30s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Maximum lookups per domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Pause between candidates (as string, e.g., "500ms", "1s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pacing: Option<String>,
}

/// A fully loaded configuration file.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub confusables: ConfusableMap,
    pub registrar: Option<RegistrarConfig>,
}

/// Configuration loading functionality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigManager;

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new() -> Self {
        Self
    }

    /// Load and validate the configuration file at `path`.
    ///
    /// Fails if the file is missing or unreadable, is not valid TOML, lacks
    /// the `similar_chars` table, or holds invalid values.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<LoadedConfig, HomoglyphError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HomoglyphError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        tracing::debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            HomoglyphError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        self.load_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn load_str(&self, content: &str) -> Result<LoadedConfig, HomoglyphError> {
        let config: FileConfig = toml::from_str(content)?;
        self.validate_config(&config)?;

        let similar_chars = config.similar_chars.ok_or_else(|| {
            HomoglyphError::config("missing required top-level table 'similar_chars'")
        })?;
        let confusables = ConfusableMap::from_entries(similar_chars)?;

        tracing::debug!("Loaded {} confusable sets", confusables.len());

        Ok(LoadedConfig {
            confusables,
            registrar: config.registrar,
        })
    }

    /// Validate the `[registrar]` table.
    fn validate_config(&self, config: &FileConfig) -> Result<(), HomoglyphError> {
        let Some(registrar) = &config.registrar else {
            return Ok(());
        };

        if let Some(backend) = &registrar.backend {
            backend
                .parse::<Backend>()
                .map_err(HomoglyphError::config)?;
        }

        if let Some(max_retries) = registrar.max_retries {
            if max_retries == 0 || max_retries > 10 {
                return Err(HomoglyphError::config(
                    "max_retries must be between 1 and 10",
                ));
            }
        }

        for (name, value) in [("timeout", &registrar.timeout), ("pacing", &registrar.pacing)] {
            if let Some(value) = value {
                if parse_duration_string(value).is_none() {
                    return Err(HomoglyphError::config(format!(
                        "Invalid {} format '{}'. Use format like '500ms', '5s', '2m'",
                        name, value
                    )));
                }
            }
        }

        if let Some(region) = &registrar.region {
            if region.is_empty()
                || !region
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            {
                return Err(HomoglyphError::config(format!(
                    "Invalid AWS region '{}'",
                    region
                )));
            }
        }

        Ok(())
    }
}

/// Apply a `[registrar]` table on top of `config`.
///
/// Values are assumed validated by [`ConfigManager::load_file`].
pub fn merge_registrar_config(mut config: CheckConfig, registrar: &RegistrarConfig) -> CheckConfig {
    if let Some(backend) = registrar.backend.as_deref().and_then(|b| b.parse().ok()) {
        config = config.with_backend(backend);
    }
    if let Some(region) = &registrar.region {
        config = config.with_region(region.as_str());
    }
    if let Some(endpoint) = &registrar.rdap_endpoint {
        config = config.with_rdap_endpoint(endpoint.as_str());
    }
    if let Some(timeout) = registrar.timeout.as_deref().and_then(parse_duration_string) {
        config = config.with_timeout(timeout);
    }
    if let Some(max_retries) = registrar.max_retries {
        config = config.with_max_attempts(max_retries);
    }
    if let Some(pacing) = registrar.pacing.as_deref().and_then(parse_duration_string) {
        config = config.with_pacing(pacing);
    }
    config
}

/// Environment variable configuration that mirrors the config file.
///
/// Values are read from HOMOGLYPH_* variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub config: Option<String>,
    pub backend: Option<Backend>,
    pub region: Option<String>,
    pub max_retries: Option<u32>,
    pub pacing: Option<Duration>,
}

/// Load configuration from environment variables.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    let mut env_config = EnvConfig::default();

    // HOMOGLYPH_CONFIG - configuration file path
    if let Ok(path) = env::var("HOMOGLYPH_CONFIG") {
        if !path.trim().is_empty() {
            tracing::debug!("Using HOMOGLYPH_CONFIG={}", path);
            env_config.config = Some(path);
        }
    }

    // HOMOGLYPH_REGISTRAR - registrar backend
    if let Ok(val) = env::var("HOMOGLYPH_REGISTRAR") {
        match val.parse::<Backend>() {
            Ok(backend) => {
                tracing::debug!("Using HOMOGLYPH_REGISTRAR={}", val);
                env_config.backend = Some(backend);
            }
            Err(e) => tracing::warn!("Ignoring HOMOGLYPH_REGISTRAR: {}", e),
        }
    }

    // HOMOGLYPH_REGION - AWS region
    if let Ok(region) = env::var("HOMOGLYPH_REGION") {
        if !region.trim().is_empty() {
            tracing::debug!("Using HOMOGLYPH_REGION={}", region);
            env_config.region = Some(region.trim().to_string());
        }
    }

    // HOMOGLYPH_MAX_RETRIES - lookups per domain
    if let Ok(val) = env::var("HOMOGLYPH_MAX_RETRIES") {
        match val.trim().parse::<u32>() {
            Ok(n) if (1..=10).contains(&n) => {
                tracing::debug!("Using HOMOGLYPH_MAX_RETRIES={}", n);
                env_config.max_retries = Some(n);
            }
            _ => tracing::warn!("Invalid HOMOGLYPH_MAX_RETRIES='{}', must be 1-10", val),
        }
    }

    // HOMOGLYPH_PACING - pause between candidates
    if let Ok(val) = env::var("HOMOGLYPH_PACING") {
        match parse_duration_string(&val) {
            Some(pacing) => {
                tracing::debug!("Using HOMOGLYPH_PACING={}", val);
                env_config.pacing = Some(pacing);
            }
            None => tracing::warn!(
                "Invalid HOMOGLYPH_PACING='{}', use format like '500ms', '1s'",
                val
            ),
        }
    }

    env_config
}

impl EnvConfig {
    /// Apply environment values on top of `config`.
    pub fn apply(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(backend) = self.backend {
            config = config.with_backend(backend);
        }
        if let Some(region) = &self.region {
            config = config.with_region(region.as_str());
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_attempts(max_retries);
        }
        if let Some(pacing) = self.pacing {
            config = config.with_pacing(pacing);
        }
        config
    }
}

/// Parse a duration string like "500ms", "5s", "2m".
///
/// A bare number is taken as seconds.
pub fn parse_duration_string(value: &str) -> Option<Duration> {
    let value = value.trim().to_lowercase();

    if let Some(ms) = value.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(s) = value.strip_suffix('s') {
        s.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(m) = value.strip_suffix('m') {
        m.trim()
            .parse::<u64>()
            .ok()
            .map(|m| Duration::from_secs(m * 60))
    } else {
        value.parse::<u64>().ok().map(Duration::from_secs)
    }
}
