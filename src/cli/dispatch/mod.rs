//! Maps parsed CLI arguments to the action the binary runs.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_PORT, cookie, loading, portal};
use crate::cli::globals::GlobalArgs;
use anyhow::Result;

/// # Errors
/// Returns an error if an argument is missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(5173);

    let portal_opts = portal::Options::parse(matches)?;
    let cookie = cookie::parse(matches)?;
    let loading = loading::parse(matches);

    let globals = GlobalArgs {
        app_name: portal_opts.app_name,
        company_name: portal_opts.company_name,
        app_url: portal_opts.app_url,
        api_url: portal_opts.api_url,
        mode: portal_opts.mode,
        cookie,
        auth_delay: portal_opts.auth_delay,
    };

    Ok(Action::Server(Args {
        port,
        globals,
        loading,
    }))
}
