use crate::theme::{CookieSettings, SameSite};
use anyhow::{Result, anyhow};
use clap::{Arg, ArgMatches, Command};

pub const ARG_COOKIE_DOMAIN: &str = "cookie-domain";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_COOKIE_SAME_SITE: &str = "cookie-same-site";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_DOMAIN)
                .long(ARG_COOKIE_DOMAIN)
                .help("Domain attribute of the cookies set by the portal")
                .env("HEAPMIND_COOKIE_DOMAIN")
                .default_value("localhost"),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark cookies Secure (HTTPS only)")
                .env("HEAPMIND_COOKIE_SECURE")
                .default_value("false")
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SAME_SITE)
                .long(ARG_COOKIE_SAME_SITE)
                .help("SameSite policy of the cookies set by the portal")
                .env("HEAPMIND_COOKIE_SAME_SITE")
                .default_value("lax")
                .value_parser(["lax", "strict", "none"]),
        )
}

/// # Errors
/// Returns an error when the SameSite policy cannot be parsed.
pub fn parse(matches: &ArgMatches) -> Result<CookieSettings> {
    let domain = matches
        .get_one::<String>(ARG_COOKIE_DOMAIN)
        .cloned()
        .unwrap_or_else(|| "localhost".to_string());
    let secure = matches
        .get_one::<bool>(ARG_COOKIE_SECURE)
        .copied()
        .unwrap_or(false);
    let same_site = matches
        .get_one::<String>(ARG_COOKIE_SAME_SITE)
        .map_or(Ok(SameSite::Lax), |value| value.parse::<SameSite>())
        .map_err(|e| anyhow!(e))?;

    Ok(CookieSettings::new(domain)
        .with_secure(secure)
        .with_same_site(same_site))
}
