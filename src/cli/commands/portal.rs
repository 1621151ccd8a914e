use crate::cli::globals::Mode;
use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;
use url::Url;

pub const ARG_APP_NAME: &str = "app-name";
pub const ARG_COMPANY_NAME: &str = "company-name";
pub const ARG_APP_URL: &str = "app-url";
pub const ARG_API_URL: &str = "api-url";
pub const ARG_MODE: &str = "mode";
pub const ARG_AUTH_DELAY_MS: &str = "auth-delay-ms";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_APP_NAME)
                .long(ARG_APP_NAME)
                .help("Product name used in page titles and structured data")
                .env("HEAPMIND_APP_NAME")
                .default_value("HEAPMIND SSO"),
        )
        .arg(
            Arg::new(ARG_COMPANY_NAME)
                .long(ARG_COMPANY_NAME)
                .help("Company name used in page descriptions")
                .env("HEAPMIND_COMPANY_NAME")
                .default_value("HeapMind"),
        )
        .arg(
            Arg::new(ARG_APP_URL)
                .long(ARG_APP_URL)
                .help("Public base URL of the portal (canonical links, sitemap, CORS origin)")
                .env("HEAPMIND_APP_URL")
                .default_value("http://localhost:5173"),
        )
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the backend API")
                .env("HEAPMIND_API_URL")
                .default_value("http://localhost:5000"),
        )
        .arg(
            Arg::new(ARG_MODE)
                .long(ARG_MODE)
                .help("Runtime mode")
                .env("HEAPMIND_MODE")
                .default_value("development")
                .value_parser(["development", "production", "test"]),
        )
        .arg(
            Arg::new(ARG_AUTH_DELAY_MS)
                .long(ARG_AUTH_DELAY_MS)
                .help("Simulated backend latency of the auth actions, in milliseconds")
                .env("HEAPMIND_AUTH_DELAY_MS")
                .default_value("750")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub app_name: String,
    pub company_name: String,
    pub app_url: String,
    pub api_url: String,
    pub mode: Mode,
    pub auth_delay: Duration,
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn parse_url(value: &str, id: &str) -> Result<String> {
    let parsed = Url::parse(value).with_context(|| format!("invalid --{id}: {value}"))?;
    if parsed.host_str().is_none() {
        return Err(anyhow!("--{id} must include a host: {value}"));
    }
    Ok(value.trim_end_matches('/').to_string())
}

impl Options {
    /// # Errors
    /// Returns an error when an argument is missing or a URL is invalid.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let app_url = parse_url(&required(matches, ARG_APP_URL)?, ARG_APP_URL)?;
        let api_url = parse_url(&required(matches, ARG_API_URL)?, ARG_API_URL)?;
        let mode = required(matches, ARG_MODE)?
            .parse::<Mode>()
            .map_err(|e| anyhow!(e))?;
        let auth_delay_ms = matches
            .get_one::<u64>(ARG_AUTH_DELAY_MS)
            .copied()
            .unwrap_or(750);

        Ok(Self {
            app_name: required(matches, ARG_APP_NAME)?,
            company_name: required(matches, ARG_COMPANY_NAME)?,
            app_url,
            api_url,
            mode,
            auth_delay: Duration::from_millis(auth_delay_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_args(Command::new("heapmind-sso"))
    }

    #[test]
    fn test_defaults() -> Result<()> {
        temp_env::with_vars(
            [
                ("HEAPMIND_APP_URL", None::<&str>),
                ("HEAPMIND_MODE", None::<&str>),
                ("HEAPMIND_AUTH_DELAY_MS", None::<&str>),
            ],
            || {
                let matches = command().try_get_matches_from(["heapmind-sso"])?;
                let options = Options::parse(&matches)?;
                assert_eq!(options.app_url, "http://localhost:5173");
                assert_eq!(options.app_name, "HEAPMIND SSO");
                assert_eq!(options.mode, Mode::Development);
                assert_eq!(options.auth_delay, Duration::from_millis(750));
                Ok(())
            },
        )
    }

    #[test]
    fn test_trailing_slash_trimmed() -> Result<()> {
        let matches =
            command().try_get_matches_from(["heapmind-sso", "--app-url", "https://sso.heapmind.dev/"])?;
        let options = Options::parse(&matches)?;
        assert_eq!(options.app_url, "https://sso.heapmind.dev");
        Ok(())
    }

    #[test]
    fn test_invalid_url_rejected() -> Result<()> {
        let matches = command().try_get_matches_from(["heapmind-sso", "--api-url", "not a url"])?;
        assert!(Options::parse(&matches).is_err());
        Ok(())
    }

    #[test]
    fn test_no_session_secret_flag() {
        let result = command().try_get_matches_from(["heapmind-sso", "--session-secret", "x"]);
        assert_eq!(
            result.map_err(|e| e.kind()).err(),
            Some(clap::error::ErrorKind::UnknownArgument)
        );
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let result = command().try_get_matches_from(["heapmind-sso", "--mode", "staging"]);
        assert_eq!(
            result.map_err(|e| e.kind()).err(),
            Some(clap::error::ErrorKind::InvalidValue)
        );
    }
}
