use crate::loading::LoadingConfig;
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;

pub const ARG_TICK_MS: &str = "loading-tick-ms";
pub const ARG_INCREMENT: &str = "loading-increment";
pub const ARG_CAP: &str = "loading-cap";
pub const ARG_MIN_VISIBLE_MS: &str = "loading-min-visible-ms";
pub const ARG_HOLD_MS: &str = "loading-hold-ms";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_TICK_MS)
                .long(ARG_TICK_MS)
                .help("Interval between simulated progress steps, in milliseconds")
                .env("HEAPMIND_LOADING_TICK_MS")
                .default_value("120")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_INCREMENT)
                .long(ARG_INCREMENT)
                .help("Progress added per step")
                .env("HEAPMIND_LOADING_INCREMENT")
                .default_value("8")
                .value_parser(clap::value_parser!(u8).range(1..=100)),
        )
        .arg(
            Arg::new(ARG_CAP)
                .long(ARG_CAP)
                .help("Highest progress reached before the operation completes")
                .env("HEAPMIND_LOADING_CAP")
                .default_value("80")
                .value_parser(clap::value_parser!(u8).range(1..=99)),
        )
        .arg(
            Arg::new(ARG_MIN_VISIBLE_MS)
                .long(ARG_MIN_VISIBLE_MS)
                .help("Minimum time the indicator stays visible, in milliseconds")
                .env("HEAPMIND_LOADING_MIN_VISIBLE_MS")
                .default_value("500")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_HOLD_MS)
                .long(ARG_HOLD_MS)
                .help("Time the completed state is shown before resetting, in milliseconds")
                .env("HEAPMIND_LOADING_HOLD_MS")
                .default_value("150")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[must_use]
pub fn parse(matches: &ArgMatches) -> LoadingConfig {
    let mut config = LoadingConfig::new();
    if let Some(ms) = matches.get_one::<u64>(ARG_TICK_MS) {
        config = config.with_tick_interval(Duration::from_millis(*ms));
    }
    if let Some(increment) = matches.get_one::<u8>(ARG_INCREMENT) {
        config = config.with_increment(*increment);
    }
    if let Some(cap) = matches.get_one::<u8>(ARG_CAP) {
        config = config.with_pre_completion_cap(*cap);
    }
    if let Some(ms) = matches.get_one::<u64>(ARG_MIN_VISIBLE_MS) {
        config = config.with_min_visible(Duration::from_millis(*ms));
    }
    if let Some(ms) = matches.get_one::<u64>(ARG_HOLD_MS) {
        config = config.with_completion_hold(Duration::from_millis(*ms));
    }
    config
}
