//! Output formatting for the command line tool

use std::io::{self, Write};

use cookie::Cookie;
use serde::Serialize;

use crate::error::Result;

/// Serializable view of a cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieRecord {
    pub domain: String,
    pub name: String,
    pub value: String,
    pub path: String,
    /// Unix seconds.
    pub expires: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
}

impl From<&Cookie<'_>> for CookieRecord {
    fn from(cookie: &Cookie<'_>) -> Self {
        CookieRecord {
            domain: cookie.domain().unwrap_or_default().to_string(),
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            path: cookie.path().unwrap_or("/").to_string(),
            expires: cookie.expires_datetime().map(|t| t.unix_timestamp()),
            secure: cookie.secure().unwrap_or(false),
            http_only: cookie.http_only().unwrap_or(false),
        }
    }
}

/// Human readable listing, one indented block per cookie.
pub fn format_cookies(cookies: &[Cookie<'_>]) -> String {
    let mut out = String::new();
    for (i, cookie) in cookies.iter().enumerate() {
        let expires = cookie
            .expires_datetime()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "session".to_string());
        out.push_str(&format!("{}:\n", i));
        out.push_str(&format!("  domain: {}\n", cookie.domain().unwrap_or_default()));
        out.push_str(&format!("  name: {:?}\n", cookie.name()));
        out.push_str(&format!("  expires: {:?}\n", expires));
        out.push_str(&format!("  path: {:?}\n", cookie.path().unwrap_or("/")));
        out.push_str(&format!("  value: {:?}\n", cookie.value()));
    }
    out
}

/// Pretty JSON array of cookies.
pub fn format_cookies_json(cookies: &[Cookie<'_>]) -> Result<String> {
    let records: Vec<CookieRecord> = cookies.iter().map(CookieRecord::from).collect();
    let mut json = serde_json::to_string_pretty(&records)?;
    json.push('\n');
    Ok(json)
}

/// Output writer for stdout
pub struct OutputWriter {
    json: bool,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Write cookies in the configured format
    pub fn write_cookies(&self, cookies: &[Cookie<'_>]) -> Result<()> {
        let content = if self.json {
            format_cookies_json(cookies)?
        } else {
            format_cookies(cookies)
        };
        io::stdout().write_all(content.as_bytes())?;
        Ok(())
    }
}
