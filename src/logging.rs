//! Logging initialization utilities.

use env_logger::Env;

/// Initialize logging with a default filter level.
///
/// The library only emits `debug` records; `RUST_LOG=ffcookies=debug` shows
/// profile resolution and jar decisions.
pub fn init() {
    let env = Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();
}
