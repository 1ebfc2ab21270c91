//! Utility functions for domain encoding and validation.

use crate::error::HomoglyphError;
use crate::generate::{split_suffix, SUFFIX_LEN};

/// Convert a Unicode domain to its ASCII-compatible (punycode) form.
///
/// Applies UTS #46 ToASCII with STD3 character rules and DNS length checks.
/// Returns `None` for anything that cannot be registered as-is: empty
/// labels, disallowed code points, leading or trailing hyphens, labels over
/// 63 octets. Pure ASCII input comes back lower-cased and otherwise unchanged.
pub fn to_ascii(domain: &str) -> Option<String> {
    match idna::domain_to_ascii_strict(domain) {
        Ok(ascii) if !ascii.is_empty() => Some(ascii),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Cannot encode '{}': {:?}", domain, e);
            None
        }
    }
}

/// Validate and normalize a base domain given on the command line.
///
/// The last `SUFFIX_LEN` characters must be a dot followed by a
/// three-character top-level label (".com", ".net", ...), the local part
/// must be non-empty, and the whole name must survive IDNA encoding.
/// Returns the trimmed, lower-cased domain.
pub fn validate_base_domain(domain: &str) -> Result<String, HomoglyphError> {
    let domain = domain.trim().to_lowercase();

    if domain.is_empty() {
        return Err(HomoglyphError::invalid_domain(
            domain,
            "Domain name cannot be empty",
        ));
    }

    if domain.chars().count() <= SUFFIX_LEN {
        return Err(HomoglyphError::invalid_domain(
            domain,
            "Domain name too short",
        ));
    }

    let (local, suffix) = split_suffix(&domain);
    let mut suffix_chars = suffix.chars();
    if suffix_chars.next() != Some('.') || suffix_chars.any(|c| c == '.') {
        return Err(HomoglyphError::invalid_domain(
            domain.as_str(),
            format!(
                "expected a {}-character top-level suffix such as '.com'",
                SUFFIX_LEN
            ),
        ));
    }

    if local.ends_with('.') {
        return Err(HomoglyphError::invalid_domain(
            domain.as_str(),
            "empty label before the top-level suffix",
        ));
    }

    if to_ascii(&domain).is_none() {
        return Err(HomoglyphError::invalid_domain(
            domain.as_str(),
            "not a valid internationalized domain name",
        ));
    }

    Ok(domain)
}

/// Extract the top-level label of a domain ("com" for "example.com").
pub fn extract_tld(domain: &str) -> Result<String, HomoglyphError> {
    match domain.trim_end_matches('.').rsplit_once('.') {
        Some((_, tld)) if !tld.is_empty() => Ok(tld.to_lowercase()),
        _ => Err(HomoglyphError::invalid_domain(
            domain,
            "Domain must contain at least one dot",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(to_ascii("example.com").as_deref(), Some("example.com"));
        assert_eq!(to_ascii("a4.com").as_deref(), Some("a4.com"));
        assert_eq!(to_ascii("Example.COM").as_deref(), Some("example.com"));
    }

    #[test]
    fn test_already_encoded_is_stable() {
        let once = to_ascii("bücher.com").unwrap();
        assert_eq!(once, "xn--bcher-kva.com");
        assert_eq!(to_ascii(&once).as_deref(), Some("xn--bcher-kva.com"));
    }

    #[test]
    fn test_unicode_encoded() {
        assert_eq!(to_ascii("münchen.com").as_deref(), Some("xn--mnchen-3ya.com"));
    }

    #[test]
    fn test_invalid_labels_rejected() {
        assert_eq!(to_ascii("a..com"), None); // empty label
        assert_eq!(to_ascii(".com"), None);
        assert_eq!(to_ascii("exa_mple.com"), None); // STD3 disallows '_'
        assert_eq!(to_ascii("-abc.com"), None); // leading hyphen
        assert_eq!(to_ascii(&format!("{}.com", "a".repeat(64))), None); // label too long
    }

    #[test]
    fn test_validate_base_domain() {
        assert_eq!(validate_base_domain(" Example.com ").unwrap(), "example.com");
        assert!(validate_base_domain("münchen.com").is_ok());

        assert!(validate_base_domain("").is_err());
        assert!(validate_base_domain(".com").is_err());
        assert!(validate_base_domain("example.io").is_err()); // suffix would be "e.io"
        assert!(validate_base_domain("examplecom").is_err());
        assert!(validate_base_domain("a..com").is_err());
        assert!(validate_base_domain("ex ample.com").is_err());
    }

    #[test]
    fn test_extract_tld() {
        assert_eq!(extract_tld("example.com").unwrap(), "com");
        assert_eq!(extract_tld("xn--bcher-kva.NET").unwrap(), "net");
        assert!(extract_tld("localhost").is_err());
    }
}
