//! Configuration for locating and opening the Firefox cookie store

use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::utils::FileUtils;

/// Open parameters appended to auto-constructed store locators.
///
/// The store is opened without file locks as an immutable, read-only snapshot
/// so a running browser never blocks a read and is never blocked by one.
pub const DEFAULT_OPEN_PARAMS: &str = "?nolock=1&immutable=1&mode=ro";

/// Directory name suffix of the profile Firefox creates by default.
pub const DEFAULT_PROFILE_SUFFIX: &str = ".default-release";

/// Cookie database file inside a profile directory.
pub const COOKIE_DB_FILE: &str = "cookies.sqlite";

/// Where cookies are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieSource {
    /// A profile under the Firefox profiles directory; `None` picks the
    /// default profile.
    Profile(Option<String>),
    /// A store locator passed to the store driver verbatim.
    Locator(String),
}

impl CookieSource {
    /// Parse a profile name, a filesystem path or a `file:` locator.
    ///
    /// Path-like input pointing at a directory is treated as a profile
    /// directory and gets `cookies.sqlite` appended.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(CookieSource::Profile(None));
        }
        if input.starts_with("file:") {
            return Ok(CookieSource::Locator(input.to_string()));
        }
        if FileUtils::is_path_like(input) {
            let mut path = FileUtils::expand_path(input)?;
            if path.is_dir() {
                path.push(COOKIE_DB_FILE);
            }
            return Ok(CookieSource::Locator(store_locator(&path)));
        }
        Ok(CookieSource::Profile(Some(input.to_string())))
    }
}

/// Build a read-only, lock-free store locator for a cookie database path.
pub fn store_locator(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            '?' => escaped.push_str("%3f"),
            '#' => escaped.push_str("%23"),
            _ => escaped.push(ch),
        }
    }
    format!("file:{}{}", escaped, DEFAULT_OPEN_PARAMS)
}

/// Options the command line tool runs with.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: Option<String>,
    pub host: Option<String>,
    pub url: Option<String>,
    pub exclude: Vec<String>,
    pub json: bool,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Source of the cookies, defaulting to the default profile.
    pub fn cookie_source(&self) -> Result<CookieSource> {
        CookieSource::parse(self.source.as_deref().unwrap_or(""))
    }
}
