//! ffcookies - read Firefox cookies into cookie jars
//!
//! This crate reads the cookies a Firefox profile keeps in `cookies.sqlite`
//! and turns them into [`Cookie`] values or a [`CookieJar`] ready to use with
//! an HTTP client.

pub mod cli;
pub mod config;
pub mod error;
pub mod jar;
pub mod logging;
pub mod models;
pub mod output;
pub mod profile;
pub mod reader;
pub mod utils;

pub use config::CookieSource;
pub use cookie::Cookie;
pub use error::{FfCookiesError, Result};
pub use jar::{build_jar, read_jar_for_url, CookieJar, MozillaList, PublicSuffixList};
pub use reader::{read_from_store, read_profile, CookieReader, SqliteOpener, StoreOpener};
pub use tokio_util::sync::CancellationToken;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
