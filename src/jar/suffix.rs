//! Public suffix rules for cookie domain eligibility.
//!
//! Cookies may not be scoped to a public suffix such as `com` or `co.uk`,
//! otherwise one site could set cookies for every site under that suffix.

use psl::{List, Psl};

/// Decides which domains are public suffixes.
pub trait PublicSuffixList: Send + Sync {
    /// Whether `domain` is itself a public suffix.
    fn is_public_suffix(&self, domain: &str) -> bool;

    /// The registrable domain (public suffix plus one label) of `host`.
    ///
    /// Returns `None` when `host` is itself a public suffix.
    fn registrable_domain(&self, host: &str) -> Option<String> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        let labels: Vec<&str> = host.split('.').collect();
        for start in 0..labels.len() {
            if self.is_public_suffix(&labels[start..].join(".")) {
                return (start > 0).then(|| labels[start - 1..].join("."));
            }
        }
        None
    }
}

/// Mozilla's Public Suffix List as compiled into the `psl` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MozillaList;

impl PublicSuffixList for MozillaList {
    fn is_public_suffix(&self, domain: &str) -> bool {
        let domain = domain.trim_end_matches('.').to_ascii_lowercase();
        match List.suffix(domain.as_bytes()) {
            Some(suffix) => suffix.as_bytes() == domain.as_bytes(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MozillaList, PublicSuffixList};

    #[test]
    fn top_level_suffixes_are_public() {
        assert!(MozillaList.is_public_suffix("com"));
        assert!(MozillaList.is_public_suffix("CO.UK"));
        assert!(MozillaList.is_public_suffix("com."));
    }

    #[test]
    fn registrable_domains_are_not_public() {
        assert!(!MozillaList.is_public_suffix("example.com"));
        assert!(!MozillaList.is_public_suffix("www.example.co.uk"));
    }

    #[test]
    fn registrable_domain_strips_subdomains() {
        assert_eq!(
            MozillaList.registrable_domain("www.example.com"),
            Some("example.com".to_string())
        );
        assert_eq!(
            MozillaList.registrable_domain("a.b.example.co.uk"),
            Some("example.co.uk".to_string())
        );
        assert_eq!(MozillaList.registrable_domain("co.uk"), None);
    }
}
