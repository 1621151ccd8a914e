use crate::{cli::globals::GlobalArgs, loading::LoadingConfig, portal};
use anyhow::Result;
use std::fmt::Write as _;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub globals: GlobalArgs,
    pub loading: LoadingConfig,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    portal::new(args.port, args.globals, args.loading).await
}

fn log_startup_args(args: &Args) {
    let globals = &args.globals;
    let loading = &args.loading;
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("mode", globals.mode.to_string()),
        ("app_url", globals.app_url.clone()),
        ("api_url", globals.api_url.clone()),
        ("cookie_domain", globals.cookie.domain().to_string()),
        ("cookie_secure", globals.cookie.secure().to_string()),
        ("cookie_same_site", globals.cookie.same_site().as_str().to_string()),
        ("auth_delay", format!("{:?}", globals.auth_delay)),
        ("loading_tick", format!("{:?}", loading.tick_interval())),
        (
            "loading_step",
            format!("+{} up to {}", loading.increment(), loading.pre_completion_cap()),
        ),
        ("loading_min_visible", format!("{:?}", loading.min_visible())),
        ("loading_hold", format!("{:?}", loading.completion_hold())),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} - {} - {}\n\nStartup configuration:",
        globals.app_name,
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ = write!(message, "\n  {key}:{padding} {value}");
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
