//! Utility functions and helpers

use crate::error::{FfCookiesError, Result};
use std::path::PathBuf;
use url::Url;

/// URL schemes a cookie jar can be built for.
pub const JAR_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Parse a URL that cookies will be scoped to.
    ///
    /// Only http, https, ws and wss are accepted.
    pub fn parse_jar_url(input: &str) -> Result<Url> {
        let url = Url::parse(input)
            .map_err(|e| FfCookiesError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))?;
        let scheme = url.scheme().to_ascii_lowercase();
        if !JAR_SCHEMES.contains(&scheme.as_str()) {
            return Err(FfCookiesError::InvalidUrl(format!(
                "invalid url scheme {:?}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Host used to filter stored cookies for a URL (no port).
    pub fn cookie_host(url: &Url) -> Option<String> {
        url.host_str()
            .map(|host| host.trim_end_matches('.').to_ascii_lowercase())
    }

    /// Whether requests to this URL travel over a secure transport.
    pub fn is_secure_scheme(url: &Url) -> bool {
        matches!(url.scheme(), "https" | "wss")
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand tilde (~) in file paths
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        let rest = match path.strip_prefix('~') {
            Some(rest) => rest.trim_start_matches(['/', '\\']),
            None => return Ok(PathBuf::from(path)),
        };
        let home_dir = dirs::home_dir().ok_or_else(|| {
            FfCookiesError::Config("Cannot determine home directory".to_string())
        })?;
        if rest.is_empty() {
            Ok(home_dir)
        } else {
            Ok(home_dir.join(rest))
        }
    }

    /// Whether a profile argument looks like a filesystem path rather than a
    /// profile name.
    pub fn is_path_like(value: &str) -> bool {
        value.contains('/') || value.contains('\\') || value.starts_with('~')
    }
}
