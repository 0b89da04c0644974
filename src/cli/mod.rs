//! CLI argument parsing module
//!
//! This module handles command-line argument parsing and application entry point.

use std::time::Duration;

use clap::{Arg, ArgMatches, Command};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{exit_code_for_error, FfCookiesError, Result};
use crate::output::OutputWriter;
use crate::reader::CookieReader;
use crate::utils::UrlUtils;

/// Main entry point for the CLI application
pub fn run() {
    crate::logging::init();

    let app = create_app();
    let matches = app.get_matches();

    if let Err(e) = run_with_args(&matches) {
        eprintln!("ffcookies: error: {}", e);
        std::process::exit(exit_code_for_error(&e));
    }
}

/// Run ffcookies with parsed command line arguments
fn run_with_args(matches: &ArgMatches) -> Result<()> {
    let config = build_config_from_args(matches)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| FfCookiesError::Config(format!("Failed to create async runtime: {}", e)))?;

    rt.block_on(async {
        let cancel = CancellationToken::new();
        if let Some(timeout) = config.timeout {
            let trigger = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                trigger.cancel();
            });
        }

        let reader = CookieReader::sqlite();
        let source = config.cookie_source()?;
        let writer = OutputWriter::new(config.json);

        let cookies = match &config.url {
            Some(url) => {
                let exclude = &config.exclude;
                let jar = reader
                    .read_jar_for_url_filtered(&cancel, &source, url, |cookie| {
                        !exclude.iter().any(|name| name == cookie.name())
                    })
                    .await?;
                jar.cookies_for_url(&UrlUtils::parse_jar_url(url)?)
            }
            None => {
                let host = config.host.as_deref().unwrap_or("");
                reader.read_source(&cancel, &source, host).await?
            }
        };

        writer.write_cookies(&cookies)
    })
}

/// Create the CLI application structure
pub fn create_app() -> Command {
    Command::new("ffcookies")
        .version(crate::VERSION)
        .about("Read cookies from a Firefox profile")
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("PROFILE|PATH|LOCATOR")
                .env("FFCOOKIES_PROFILE")
                .help("Profile name, profile directory, cookies.sqlite path or file: locator"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Only read cookies whose host ends with HOST"),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .conflicts_with("host")
                .help("Print the cookies a jar built for URL would send"),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .value_name("NAME")
                .requires("url")
                .action(clap::ArgAction::Append)
                .help("Leave cookies named NAME out of the jar"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print cookies as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Cancel the read after SECONDS"),
        )
}

/// Build configuration from command line arguments
pub fn build_config_from_args(matches: &ArgMatches) -> Result<Config> {
    let mut config = Config {
        source: matches.get_one::<String>("profile").cloned(),
        host: matches.get_one::<String>("host").cloned(),
        url: matches.get_one::<String>("url").cloned(),
        json: matches.get_flag("json"),
        ..Config::default()
    };

    if let Some(names) = matches.get_many::<String>("exclude") {
        config.exclude = names.cloned().collect();
    }

    if let Some(timeout_str) = matches.get_one::<String>("timeout") {
        config.timeout = Some(parse_timeout(timeout_str)?);
    }

    Ok(config)
}

/// Parse timeout values (supports suffixes like 's', 'm', 'h')
fn parse_timeout(input: &str) -> Result<Duration> {
    if let Ok(seconds) = input.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    let (number_part, unit) = if let Some(stripped) = input.strip_suffix('s') {
        (stripped, 1)
    } else if let Some(stripped) = input.strip_suffix('m') {
        (stripped, 60)
    } else if let Some(stripped) = input.strip_suffix('h') {
        (stripped, 3600)
    } else {
        return Err(FfCookiesError::Config(format!(
            "Invalid timeout format: '{}'. Use number with optional suffix (s/m/h)",
            input
        )));
    };

    let number: u64 = number_part
        .parse()
        .map_err(|_| FfCookiesError::Config(format!("Invalid timeout number: '{}'", number_part)))?;

    Ok(Duration::from_secs(number * unit))
}
