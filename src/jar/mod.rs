//! Cookie jars scoped to a URL
//!
//! [`CookieJar`] applies the RFC 6265 storage model: cookies without a
//! domain are host-only, domain cookies must domain-match the URL host and
//! may not be scoped to a public suffix, and a missing or relative path is
//! replaced by the URL's default path. The jar implements
//! [`reqwest::cookie::CookieStore`] so it can be handed to a reqwest client.

use std::sync::{Arc, PoisonError, RwLock};

use cookie::Cookie;
use reqwest::header::HeaderValue;
use time::{OffsetDateTime, PrimitiveDateTime};
use tokio_util::sync::CancellationToken;
use url::{Host, Url};

use crate::config::CookieSource;
use crate::error::{FfCookiesError, Result};
use crate::reader::CookieReader;
use crate::utils::UrlUtils;

mod suffix;

pub use suffix::{MozillaList, PublicSuffixList};

struct Entry {
    cookie: Cookie<'static>,
    domain: String,
    host_only: bool,
    path: String,
    expires: Option<OffsetDateTime>,
}

impl Entry {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    fn same_key(&self, other: &Entry) -> bool {
        self.domain == other.domain
            && self.path == other.path
            && self.cookie.name() == other.cookie.name()
    }
}

/// Cookie container keyed by domain, path and name.
///
/// Cookies keep their insertion order; replacing a cookie keeps its
/// original position.
pub struct CookieJar {
    suffixes: Arc<dyn PublicSuffixList>,
    entries: RwLock<Vec<Entry>>,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar {
    /// Create an empty jar using Mozilla's public suffix list.
    pub fn new() -> Self {
        Self::with_suffix_list(Arc::new(MozillaList))
    }

    pub fn with_suffix_list(suffixes: Arc<dyn PublicSuffixList>) -> Self {
        Self {
            suffixes,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Store `cookies` as if they were received from `url`.
    ///
    /// Returns the number of cookies stored.
    pub fn insert_all<I>(&self, url: &Url, cookies: I) -> usize
    where
        I: IntoIterator<Item = Cookie<'static>>,
    {
        cookies
            .into_iter()
            .map(|cookie| self.insert(url, cookie))
            .filter(|stored| *stored)
            .count()
    }

    /// Store one cookie received from `url`.
    ///
    /// Returns `false` when the cookie is rejected or already expired. An
    /// expired cookie removes any stored cookie with the same key.
    pub fn insert(&self, url: &Url, cookie: Cookie<'static>) -> bool {
        let now = OffsetDateTime::now_utc();
        let entry = match self.new_entry(url, cookie, now) {
            Some(entry) => entry,
            None => return false,
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let existing = entries.iter().position(|e| e.same_key(&entry));
        if entry.is_expired(now) {
            if let Some(index) = existing {
                entries.remove(index);
            }
            log::debug!("dropping expired cookie {}", entry.cookie.name());
            return false;
        }
        match existing {
            Some(index) => entries[index] = entry,
            None => entries.push(entry),
        }
        true
    }

    fn new_entry(
        &self,
        url: &Url,
        mut cookie: Cookie<'static>,
        now: OffsetDateTime,
    ) -> Option<Entry> {
        let host = UrlUtils::cookie_host(url)?;
        let (domain, host_only) = self.domain_and_type(url, &host, cookie.domain())?;

        let explicit_path = cookie
            .path()
            .filter(|path| path.starts_with('/'))
            .map(str::to_string);
        let path = match explicit_path {
            Some(path) => path,
            None => {
                let path = default_path(url.path());
                cookie.set_path(path.clone());
                path
            }
        };

        let expires = match cookie.max_age() {
            Some(max_age) => Some(
                now.checked_add(max_age)
                    .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc()),
            ),
            None => cookie.expires_datetime(),
        };

        Some(Entry {
            cookie,
            domain,
            host_only,
            path,
            expires,
        })
    }

    fn domain_and_type(
        &self,
        url: &Url,
        host: &str,
        cookie_domain: Option<&str>,
    ) -> Option<(String, bool)> {
        let domain = cookie_domain
            .map(|d| d.trim_start_matches('.').trim_end_matches('.').to_ascii_lowercase())
            .unwrap_or_default();
        if domain.is_empty() {
            return Some((host.to_string(), true));
        }

        if matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_))) {
            if domain != host {
                log::debug!("rejecting domain cookie for ip host {}", host);
                return None;
            }
            return Some((host.to_string(), true));
        }

        if self.suffixes.is_public_suffix(&domain) {
            if domain == host {
                return Some((host.to_string(), true));
            }
            log::debug!("rejecting cookie scoped to public suffix {}", domain);
            return None;
        }

        if host == domain || host.ends_with(&format!(".{}", domain)) {
            return Some((domain, false));
        }
        log::debug!("rejecting cookie for {} set from {}", domain, host);
        None
    }

    /// Cookies that would be sent to `url`: longest path first, then
    /// insertion order.
    pub fn cookies_for_url(&self, url: &Url) -> Vec<Cookie<'static>> {
        let host = match UrlUtils::cookie_host(url) {
            Some(host) => host,
            None => return Vec::new(),
        };
        let secure = UrlUtils::is_secure_scheme(url);
        let now = OffsetDateTime::now_utc();

        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut matching: Vec<&Entry> = entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .filter(|entry| secure || !entry.cookie.secure().unwrap_or(false))
            .filter(|entry| domain_matches(entry, &host))
            .filter(|entry| path_matches(&entry.path, url.path()))
            .collect();
        matching.sort_by_key(|entry| std::cmp::Reverse(entry.path.len()));
        matching.into_iter().map(|entry| entry.cookie.clone()).collect()
    }

    /// `Cookie` request header value for `url`, if any cookie matches.
    pub fn header_value(&self, url: &Url) -> Option<String> {
        let cookies = self.cookies_for_url(url);
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(|c| format!("{}={}", c.name(), c.value()))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// All stored cookies in insertion order.
    pub fn all(&self) -> Vec<Cookie<'static>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|entry| entry.cookie.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies = cookie_headers
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse(value.to_string()).ok());
        self.insert_all(url, cookies);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.header_value(url)
            .and_then(|header| HeaderValue::from_str(&header).ok())
    }
}

fn domain_matches(entry: &Entry, host: &str) -> bool {
    if entry.host_only {
        return entry.domain == host;
    }
    host == entry.domain || host.ends_with(&format!(".{}", entry.domain))
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

/// Directory of the request path, per RFC 6265 section 5.1.4.
fn default_path(request_path: &str) -> String {
    if !request_path.starts_with('/') {
        return "/".to_string();
    }
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(index) => request_path[..index].to_string(),
    }
}

/// Build a jar holding `cookies` scoped to `url`.
pub fn build_jar(url: &Url, cookies: Vec<Cookie<'static>>) -> CookieJar {
    let jar = CookieJar::new();
    let stored = jar.insert_all(url, cookies);
    log::debug!("built cookie jar with {} cookies for {}", stored, url);
    jar
}

impl CookieReader {
    /// Read the cookies for `url` into a jar.
    ///
    /// Only http, https, ws and wss URLs are accepted.
    pub async fn read_jar_for_url(
        &self,
        cancel: &CancellationToken,
        source: &CookieSource,
        url: &str,
    ) -> Result<CookieJar> {
        self.read_jar_for_url_filtered(cancel, source, url, |_| true)
            .await
    }

    /// Like [`CookieReader::read_jar_for_url`], keeping only the cookies
    /// `predicate` accepts.
    pub async fn read_jar_for_url_filtered<F>(
        &self,
        cancel: &CancellationToken,
        source: &CookieSource,
        url: &str,
        predicate: F,
    ) -> Result<CookieJar>
    where
        F: Fn(&Cookie<'static>) -> bool,
    {
        let url = UrlUtils::parse_jar_url(url)?;
        let host = UrlUtils::cookie_host(&url)
            .ok_or_else(|| FfCookiesError::InvalidUrl(format!("URL has no host: {}", url)))?;
        let filter = MozillaList.registrable_domain(&host).unwrap_or(host);

        let cookies = self.read_source(cancel, source, &filter).await?;
        let cookies: Vec<_> = cookies.into_iter().filter(|c| predicate(c)).collect();
        Ok(build_jar(&url, cookies))
    }
}

/// Read the cookies for `url` from a profile name, path or store locator
/// with the bundled SQLite driver.
pub async fn read_jar_for_url(source: &str, url: &str) -> Result<CookieJar> {
    let source = CookieSource::parse(source)?;
    CookieReader::sqlite()
        .read_jar_for_url(&CancellationToken::new(), &source, url)
        .await
}
