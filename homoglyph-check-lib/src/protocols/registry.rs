//! TLD -> RDAP endpoint mappings and IANA bootstrap discovery.
//!
//! Well-known registries are answered from a built-in table. Anything else
//! is looked up in the IANA RDAP bootstrap file, which is fetched once per
//! process and cached.

use crate::error::HomoglyphError;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

const BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";

/// Endpoints discovered from the IANA bootstrap registry.
struct BootstrapCache {
    /// TLD -> RDAP endpoint URL
    rdap_endpoints: HashMap<String, String>,
    /// TLDs known to have no RDAP endpoint
    no_rdap: HashSet<String>,
    /// Whether the bootstrap file has been fetched
    loaded: bool,
}

lazy_static::lazy_static! {
    static ref BOOTSTRAP_CACHE: Mutex<BootstrapCache> = Mutex::new(BootstrapCache {
        rdap_endpoints: HashMap::new(),
        no_rdap: HashSet::new(),
        loaded: false,
    });
}

/// Built-in RDAP endpoints for common three-letter TLDs.
pub fn get_rdap_registry_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        // Verisign
        ("com", "https://rdap.verisign.com/com/v1/domain/"),
        ("net", "https://rdap.verisign.com/net/v1/domain/"),
        (
            "org",
            "https://rdap.publicinterestregistry.org/rdap/domain/",
        ),
        ("biz", "https://rdap.nic.biz/domain/"),
        // Google
        ("app", "https://pubapi.registry.google/rdap/domain/"),
        ("dev", "https://pubapi.registry.google/rdap/domain/"),
        // CentralNic
        ("xyz", "https://rdap.centralnic.com/xyz/domain/"),
        ("top", "https://rdap.zdnsgtld.com/top/domain/"),
    ])
}

/// Find the RDAP endpoint for `tld`.
///
/// Checks the built-in table first, then the bootstrap cache. When
/// `use_bootstrap` is set and the cache has not been filled yet, the IANA
/// registry is fetched once.
pub async fn get_rdap_endpoint(tld: &str, use_bootstrap: bool) -> Result<String, HomoglyphError> {
    let tld_lower = tld.to_lowercase();

    if let Some(endpoint) = get_rdap_registry_map().get(tld_lower.as_str()) {
        return Ok(endpoint.to_string());
    }

    let needs_fetch = {
        let cache = lock_cache()?;
        if let Some(endpoint) = cache.rdap_endpoints.get(&tld_lower) {
            return Ok(endpoint.clone());
        }
        if cache.no_rdap.contains(&tld_lower) {
            return Err(HomoglyphError::bootstrap(
                &tld_lower,
                "TLD has no known RDAP endpoint",
            ));
        }
        !cache.loaded
    };

    if !use_bootstrap {
        return Err(HomoglyphError::bootstrap(
            &tld_lower,
            "No known RDAP endpoint and bootstrap disabled",
        ));
    }

    if needs_fetch {
        let endpoints = fetch_bootstrap().await?;
        let mut cache = lock_cache()?;
        cache.rdap_endpoints = endpoints;
        cache.loaded = true;
    }

    let mut cache = lock_cache()?;
    if let Some(endpoint) = cache.rdap_endpoints.get(&tld_lower) {
        return Ok(endpoint.clone());
    }
    cache.no_rdap.insert(tld_lower.clone());

    Err(HomoglyphError::bootstrap(
        &tld_lower,
        "TLD not found in IANA bootstrap registry",
    ))
}

fn lock_cache() -> Result<std::sync::MutexGuard<'static, BootstrapCache>, HomoglyphError> {
    BOOTSTRAP_CACHE
        .lock()
        .map_err(|_| HomoglyphError::internal("Failed to acquire bootstrap cache lock"))
}

/// Download the IANA RDAP bootstrap file.
async fn fetch_bootstrap() -> Result<HashMap<String, String>, HomoglyphError> {
    tracing::debug!("Fetching RDAP bootstrap registry from {}", BOOTSTRAP_URL);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| HomoglyphError::network(format!("Failed to create HTTP client: {}", e)))?;

    let response = client.get(BOOTSTRAP_URL).send().await.map_err(|e| {
        HomoglyphError::bootstrap("*", format!("Failed to fetch bootstrap registry: {}", e))
    })?;

    if !response.status().is_success() {
        return Err(HomoglyphError::bootstrap(
            "*",
            format!("Bootstrap registry returned HTTP {}", response.status()),
        ));
    }

    let json: serde_json::Value = response.json().await.map_err(|e| {
        HomoglyphError::bootstrap("*", format!("Failed to parse bootstrap JSON: {}", e))
    })?;

    parse_bootstrap(&json)
}

/// Parse an IANA bootstrap document into a TLD -> endpoint map.
///
/// Each service entry is `[[tld, ...], [url, ...]]`; the first URL wins.
fn parse_bootstrap(json: &serde_json::Value) -> Result<HashMap<String, String>, HomoglyphError> {
    let services = json
        .get("services")
        .and_then(|s| s.as_array())
        .ok_or_else(|| {
            HomoglyphError::bootstrap(
                "*",
                "Invalid bootstrap JSON: missing or invalid 'services' array",
            )
        })?;

    let mut endpoints = HashMap::new();

    for service in services.iter().filter_map(|s| s.as_array()) {
        let (Some(tlds), Some(urls)) = (
            service.first().and_then(|t| t.as_array()),
            service.get(1).and_then(|u| u.as_array()),
        ) else {
            continue;
        };

        let Some(url) = urls.first().and_then(|u| u.as_str()) else {
            continue;
        };
        let endpoint = format!("{}/domain/", url.trim_end_matches('/'));

        for tld in tlds.iter().filter_map(|t| t.as_str()) {
            endpoints.insert(tld.to_lowercase(), endpoint.clone());
        }
    }

    Ok(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate_base_domain;

    #[tokio::test]
    async fn test_builtin_endpoint() {
        let endpoint = get_rdap_endpoint("COM", false).await.unwrap();
        assert_eq!(endpoint, "https://rdap.verisign.com/com/v1/domain/");
    }

    #[tokio::test]
    async fn test_unknown_tld_without_bootstrap() {
        let result = get_rdap_endpoint("zzzz", false).await;
        assert!(matches!(result, Err(HomoglyphError::BootstrapError { .. })));
    }

    #[test]
    fn test_builtin_endpoints_end_with_slash() {
        for (tld, endpoint) in get_rdap_registry_map() {
            assert!(endpoint.starts_with("https://"), "{}", tld);
            assert!(endpoint.ends_with("/domain/"), "{}", tld);
        }
    }

    #[test]
    fn test_builtin_tlds_accepted_as_base_domains() {
        for tld in get_rdap_registry_map().keys() {
            let domain = format!("apple.{}", tld);
            assert!(validate_base_domain(&domain).is_ok(), "{}", domain);
        }
    }

    #[test]
    fn test_parse_bootstrap() {
        let json = serde_json::json!({
            "services": [
                [["shop", "SALE"], ["https://rdap.example-registry.net/rdap/"]],
                [["broken"]],
                [["tokyo"], ["https://rdap.tokyo.example/", "http://fallback.example/"]]
            ]
        });

        let endpoints = parse_bootstrap(&json).unwrap();
        assert_eq!(
            endpoints.get("shop").map(String::as_str),
            Some("https://rdap.example-registry.net/rdap/domain/")
        );
        assert!(endpoints.contains_key("sale"));
        assert_eq!(
            endpoints.get("tokyo").map(String::as_str),
            Some("https://rdap.tokyo.example/domain/")
        );
        assert!(!endpoints.contains_key("broken"));
    }

    #[test]
    fn test_parse_bootstrap_rejects_missing_services() {
        let json = serde_json::json!({ "version": "1.0" });
        assert!(parse_bootstrap(&json).is_err());
    }
}
