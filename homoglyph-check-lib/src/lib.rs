//! # Homoglyph Check Library
//!
//! Finds registrable look-alikes of a domain name.
//!
//! A base domain is expanded into every combination of visually confusable
//! characters, each candidate is converted to its IDNA ASCII form, and a
//! registrar is asked whether it can be registered. Lookups run one at a
//! time with a fixed pause between candidates; throttled lookups are retried
//! with exponential backoff and jitter.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use homoglyph_check_lib::{
//!     CheckConfig, ConfigManager, HomoglyphChecker, NullSink, RegistrarBackend,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loaded = ConfigManager::new().load_file("similar_chars.toml")?;
//!     let config = CheckConfig::default();
//!     let registrar = RegistrarBackend::from_config(&config).await?;
//!     let checker =
//!         HomoglyphChecker::new(loaded.confusables, registrar, config.retry, config.pacing);
//!
//!     let report = checker.run("apple.com", &mut NullSink).await;
//!     for row in report.available() {
//!         println!("{} ({})", row.domain, row.encoded);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Odometer expansion**: lazy, deterministic candidate generation
//! - **IDNA encoding**: UTS #46 with STD3 rules; invalid candidates are skipped
//! - **Route 53 Domains** and **RDAP** registrar backends
//! - **Bounded backoff**: only throttling is retried

pub use availability::AvailabilityClient;
pub use checker::{encodable_candidates, HomoglyphChecker};
pub use config::{
    load_env_config, merge_registrar_config, parse_duration_string, ConfigManager, EnvConfig,
    FileConfig, LoadedConfig, RegistrarConfig, DEFAULT_CONFIG_PATH,
};
pub use confusables::ConfusableMap;
pub use error::HomoglyphError;
pub use protocols::{
    get_rdap_endpoint, get_rdap_registry_map, RdapRegistrar, Registrar, RegistrarBackend,
    Route53Registrar,
};
pub use report::{NullSink, Progress, Report, ReportRow, ReportSink, ReportSummary};
pub use types::{AvailabilityStatus, Backend, CheckConfig, RegistrarAvailability, RetryPolicy};
pub use utils::{extract_tld, to_ascii, validate_base_domain};

// Public modules
pub mod generate;

pub use generate::{estimate_candidate_count, expand, split_suffix, Candidates, SUFFIX_LEN};

mod availability;
mod checker;
mod config;
mod confusables;
mod error;
mod protocols;
mod report;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, HomoglyphError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
