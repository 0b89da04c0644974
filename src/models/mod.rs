//! Rows of the Firefox `moz_cookies` table and the queries that read them.
//!
//! Only the seven columns needed to rebuild a cookie are selected. The table
//! enforces uniqueness of `(name, host, path, originAttributes)`; nothing here
//! deduplicates.

use rusqlite::{Connection, Row};
use tokio_util::sync::CancellationToken;

use crate::error::{FfCookiesError, Result};

pub mod convert;

pub use convert::convert;

/// Firefox schema version from which `expiry` is stored in milliseconds.
pub const MILLISECOND_EXPIRY_SCHEMA_VERSION: i64 = 16;

const SELECT_COOKIES: &str =
    "SELECT expiry, host, name, value, path, isSecure, isHttpOnly FROM moz_cookies";

const SELECT_COOKIES_LIKE_HOST: &str =
    "SELECT expiry, host, name, value, path, isSecure, isHttpOnly FROM moz_cookies WHERE host LIKE ?1";

/// One stored cookie row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCookie {
    /// Expiry in Unix seconds. May already be in the past.
    pub expiry: i64,
    /// Host, with or without a leading dot.
    pub host: String,
    pub name: String,
    pub value: String,
    pub path: String,
    pub is_secure: bool,
    pub is_http_only: bool,
}

/// Fetch every stored cookie in store order.
pub fn fetch_all(cancel: &CancellationToken, conn: &Connection) -> Result<Vec<StoredCookie>> {
    run_query(cancel, conn, SELECT_COOKIES, None)
}

/// Fetch cookies whose host matches a SQL `LIKE` pattern.
pub fn fetch_by_host_pattern(
    cancel: &CancellationToken,
    conn: &Connection,
    pattern: &str,
) -> Result<Vec<StoredCookie>> {
    run_query(cancel, conn, SELECT_COOKIES_LIKE_HOST, Some(pattern))
}

/// Read the store's `user_version` pragma.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Bring `expiry` to seconds for stores that keep it in milliseconds.
pub fn normalize_expiry(rows: &mut [StoredCookie], schema_version: i64) {
    if schema_version < MILLISECOND_EXPIRY_SCHEMA_VERSION {
        return;
    }
    for row in rows.iter_mut() {
        row.expiry /= 1000;
    }
}

fn run_query(
    cancel: &CancellationToken,
    conn: &Connection,
    sql: &str,
    pattern: Option<&str>,
) -> Result<Vec<StoredCookie>> {
    if cancel.is_cancelled() {
        return Err(FfCookiesError::Cancelled);
    }
    let mut stmt = conn.prepare(sql)?;
    let mut rows = match pattern {
        Some(pattern) => stmt.query([pattern])?,
        None => stmt.query([])?,
    };

    let mut cookies = Vec::new();
    while let Some(row) = rows.next()? {
        if cancel.is_cancelled() {
            return Err(FfCookiesError::Cancelled);
        }
        cookies.push(row_to_stored_cookie(row)?);
    }
    Ok(cookies)
}

fn row_to_stored_cookie(row: &Row<'_>) -> rusqlite::Result<StoredCookie> {
    let expiry: Option<i64> = row.get(0)?;
    let host: Option<String> = row.get(1)?;
    let name: Option<String> = row.get(2)?;
    let value: Option<String> = row.get(3)?;
    let path: Option<String> = row.get(4)?;
    let is_secure: Option<i64> = row.get(5)?;
    let is_http_only: Option<i64> = row.get(6)?;

    Ok(StoredCookie {
        expiry: expiry.unwrap_or_default(),
        host: host.unwrap_or_default(),
        name: name.unwrap_or_default(),
        value: value.unwrap_or_default(),
        path: path
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| "/".to_string()),
        is_secure: is_secure.unwrap_or_default() != 0,
        is_http_only: is_http_only.unwrap_or_default() != 0,
    })
}
