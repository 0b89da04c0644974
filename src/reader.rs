//! Cookie retrieval from a Firefox cookie store
//!
//! The store driver is injected through [`StoreOpener`]. Store work runs on a
//! blocking worker; cancelling the token interrupts the running statement and
//! waits for the worker so the connection is always released before the call
//! returns.

use std::sync::Arc;

use cookie::Cookie;
use rusqlite::{Connection, OpenFlags};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::config::{store_locator, CookieSource};
use crate::error::{FfCookiesError, Result};
use crate::models::{self, StoredCookie};
use crate::profile;

/// Opens a cookie store from a locator. This is the queryable-store
/// capability the embedding application registers.
pub trait StoreOpener: Send + Sync {
    fn open(&self, locator: &str) -> rusqlite::Result<Connection>;
}

/// Bundled SQLite driver, opening stores read-only with URI locators.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteOpener;

impl StoreOpener for SqliteOpener {
    fn open(&self, locator: &str) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(
            locator,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }
}

/// Reads cookies from Firefox profiles or explicit store locators.
#[derive(Clone, Default)]
pub struct CookieReader {
    opener: Option<Arc<dyn StoreOpener>>,
}

impl CookieReader {
    /// Create a reader using the given store driver.
    pub fn new(opener: Arc<dyn StoreOpener>) -> Self {
        Self {
            opener: Some(opener),
        }
    }

    /// Create a reader using the bundled SQLite driver.
    pub fn sqlite() -> Self {
        Self::new(Arc::new(SqliteOpener))
    }

    fn opener(&self) -> Result<Arc<dyn StoreOpener>> {
        self.opener.clone().ok_or_else(|| {
            FfCookiesError::Config("no cookie store driver registered".to_string())
        })
    }

    /// Read cookies from the store at `locator`.
    ///
    /// An empty `host` returns every cookie; otherwise only cookies whose host
    /// ends with `host` are returned.
    pub async fn read_from_store(
        &self,
        cancel: &CancellationToken,
        locator: &str,
        host: &str,
    ) -> Result<Vec<Cookie<'static>>> {
        let opener = self.opener()?;
        if cancel.is_cancelled() {
            return Err(FfCookiesError::Cancelled);
        }

        let locator = locator.to_string();
        let pattern = (!host.is_empty()).then(|| host_pattern(host));
        let token = cancel.clone();
        let (handle_tx, handle_rx) = oneshot::channel();

        let mut task = tokio::task::spawn_blocking(move || -> Result<Vec<StoredCookie>> {
            let conn = opener.open(&locator)?;
            let _ = handle_tx.send(conn.get_interrupt_handle());
            let rows = query_store(&token, &conn, pattern.as_deref());
            let closed = conn.close();
            let rows = rows?;
            closed.map_err(|(_, e)| e)?;
            Ok(rows)
        });

        tokio::select! {
            joined = &mut task => {
                let rows = joined.map_err(|e| FfCookiesError::Task(e.to_string()))??;
                log::debug!("read {} cookies from store", rows.len());
                Ok(models::convert(rows))
            }
            _ = cancel.cancelled() => {
                if let Ok(handle) = handle_rx.await {
                    handle.interrupt();
                }
                let _ = task.await;
                Err(FfCookiesError::Cancelled)
            }
        }
    }

    /// Read cookies from a named Firefox profile, or the default profile when
    /// `profile` is empty.
    pub async fn read_profile(
        &self,
        cancel: &CancellationToken,
        profile: &str,
        host: &str,
    ) -> Result<Vec<Cookie<'static>>> {
        self.opener()?;
        let base = profile::profile_dir()?;
        let path = profile::cookie_path(&base, profile)?;
        log::debug!("reading firefox cookies from {}", path.display());
        self.read_from_store(cancel, &store_locator(&path), host)
            .await
    }

    /// Read cookies from either a profile or a store locator.
    pub async fn read_source(
        &self,
        cancel: &CancellationToken,
        source: &CookieSource,
        host: &str,
    ) -> Result<Vec<Cookie<'static>>> {
        match source {
            CookieSource::Profile(name) => {
                self.read_profile(cancel, name.as_deref().unwrap_or(""), host)
                    .await
            }
            CookieSource::Locator(locator) => self.read_from_store(cancel, locator, host).await,
        }
    }
}

fn query_store(
    cancel: &CancellationToken,
    conn: &Connection,
    pattern: Option<&str>,
) -> Result<Vec<StoredCookie>> {
    let version = models::schema_version(conn)?;
    let mut rows = match pattern {
        Some(pattern) => {
            log::debug!("querying cookies with host LIKE {:?}", pattern);
            models::fetch_by_host_pattern(cancel, conn, pattern)?
        }
        None => models::fetch_all(cancel, conn)?,
    };
    models::normalize_expiry(&mut rows, version);
    Ok(rows)
}

/// `LIKE` pattern matching hosts that end with `host`.
///
/// Exactly one leading `%` is kept whether or not the caller supplied one.
pub fn host_pattern(host: &str) -> String {
    format!("%{}", host.trim_start_matches('%'))
}

/// Read cookies from the store at `locator` with the bundled SQLite driver.
pub async fn read_from_store(locator: &str, host: &str) -> Result<Vec<Cookie<'static>>> {
    CookieReader::sqlite()
        .read_from_store(&CancellationToken::new(), locator, host)
        .await
}

/// Read cookies from a Firefox profile with the bundled SQLite driver.
pub async fn read_profile(profile: &str, host: &str) -> Result<Vec<Cookie<'static>>> {
    CookieReader::sqlite()
        .read_profile(&CancellationToken::new(), profile, host)
        .await
}
