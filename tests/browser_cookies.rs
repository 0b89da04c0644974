use ffcookies::config::store_locator;
use ffcookies::{CancellationToken, CookieReader, CookieSource, FfCookiesError};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const FAR_FUTURE: i64 = 4_000_000_000;

fn create_firefox_cookie_db(path: &Path, rows: &[(i64, &str, &str, &str, bool, bool)]) {
    let conn = Connection::open(path).expect("open firefox db");
    conn.execute(
        "CREATE TABLE moz_cookies (
            id INTEGER PRIMARY KEY,
            originAttributes TEXT NOT NULL DEFAULT '',
            name TEXT,
            value TEXT,
            host TEXT,
            path TEXT,
            expiry INTEGER,
            lastAccessed INTEGER,
            creationTime INTEGER,
            isSecure INTEGER,
            isHttpOnly INTEGER,
            sameSite INTEGER DEFAULT 0,
            CONSTRAINT moz_uniqueid UNIQUE (name, host, path, originAttributes)
        )",
        [],
    )
    .expect("create moz_cookies");
    for (expiry, host, name, value, secure, http_only) in rows {
        conn.execute(
            "INSERT INTO moz_cookies (expiry, host, name, value, path, isSecure, isHttpOnly)
             VALUES (?1, ?2, ?3, ?4, '/', ?5, ?6)",
            (expiry, host, name, value, secure, http_only),
        )
        .expect("insert cookie");
    }
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_read_single_cookie_end_to_end() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("cookies.sqlite");
    create_firefox_cookie_db(
        &db_path,
        &[(1_700_000_000, "example.com", "sid", "xyz", true, true)],
    );

    let cookies = ffcookies::read_from_store(&store_locator(&db_path), "example.com")
        .await
        .expect("read cookies");

    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert_eq!(cookie.domain(), Some("example.com"));
    assert_eq!(cookie.name(), "sid");
    assert_eq!(cookie.value(), "xyz");
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(
        cookie.expires_datetime().map(|t| t.unix_timestamp()),
        Some(1_700_000_000)
    );
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_read_millisecond_expiry_schema() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("cookies.sqlite");
    create_firefox_cookie_db(
        &db_path,
        &[(1_700_000_000_000, "example.com", "sid", "xyz", false, false)],
    );
    Connection::open(&db_path)
        .expect("open")
        .execute_batch("PRAGMA user_version = 16;")
        .expect("set schema version");

    let cookies = ffcookies::read_from_store(&store_locator(&db_path), "")
        .await
        .expect("read cookies");
    assert_eq!(
        cookies[0].expires_datetime().map(|t| t.unix_timestamp()),
        Some(1_700_000_000)
    );
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_jar_for_url_from_profile_directory() {
    let dir = tempdir().expect("tempdir");
    let profile = dir.path().join("abcd1234.default-release");
    fs::create_dir(&profile).expect("profile dir");
    create_firefox_cookie_db(
        &profile.join("cookies.sqlite"),
        &[
            (FAR_FUTURE, ".example.com", "a", "1", false, false),
            (FAR_FUTURE, ".example.com", "b", "2", false, false),
            (FAR_FUTURE, "www.example.com", "c", "3", false, false),
            (FAR_FUTURE, "example.org", "d", "4", false, false),
        ],
    );

    let source = CookieSource::parse(profile.to_str().expect("utf-8 path")).expect("source");
    let jar = CookieReader::sqlite()
        .read_jar_for_url_filtered(
            &CancellationToken::new(),
            &source,
            "https://www.example.com/",
            |cookie| cookie.name() != "b",
        )
        .await
        .expect("jar");

    let url = url::Url::parse("https://www.example.com/").expect("url");
    let names: Vec<_> = jar
        .cookies_for_url(&url)
        .iter()
        .map(|cookie| cookie.name().to_string())
        .collect();
    assert_eq!(names, ["a", "c"]);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_jar_for_url_rejects_ftp() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("cookies.sqlite");
    create_firefox_cookie_db(&db_path, &[]);

    let result = ffcookies::read_jar_for_url(
        db_path.to_str().expect("utf-8 path"),
        "ftp://example.com/file",
    )
    .await;
    assert!(matches!(result, Err(FfCookiesError::InvalidUrl(_))));

    let jar = ffcookies::read_jar_for_url(
        db_path.to_str().expect("utf-8 path"),
        "https://example.com/",
    )
    .await
    .expect("https proceeds");
    assert!(jar.is_empty());
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_corrupt_store_is_a_store_error() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("cookies.sqlite");
    fs::write(&db_path, b"this is not a database").expect("write");

    let err = ffcookies::read_from_store(&store_locator(&db_path), "")
        .await
        .expect_err("corrupt store");
    assert!(matches!(err, FfCookiesError::Store(_)));
}
