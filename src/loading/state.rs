//! Snapshot of the loading indicator and the timing knobs that drive it.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(120);
pub const DEFAULT_PROGRESS_INCREMENT: u8 = 8;
pub const DEFAULT_PRE_COMPLETION_CAP: u8 = 80;
pub const DEFAULT_MIN_VISIBLE: Duration = Duration::from_millis(500);
pub const DEFAULT_COMPLETION_HOLD: Duration = Duration::from_millis(150);

/// Progress reported while the completion hold is showing.
pub const COMPLETE_PROGRESS: u8 = 100;

/// Immutable view of the indicator handed to consumers.
///
/// When `is_loading` is false the snapshot is always [`LoadingState::idle`].
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_text: Option<String>,
    pub progress: u8,
}

impl LoadingState {
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            is_loading: false,
            loading_text: None,
            progress: 0,
        }
    }

    /// A loading snapshot seeded at `progress`.
    #[must_use]
    pub fn loading(text: Option<String>, progress: u8) -> Self {
        Self {
            is_loading: true,
            loading_text: text,
            progress: progress.min(COMPLETE_PROGRESS),
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.is_loading && self.progress == COMPLETE_PROGRESS
    }
}

/// Timing of the progress animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadingConfig {
    tick_interval: Duration,
    increment: u8,
    pre_completion_cap: u8,
    min_visible: Duration,
    completion_hold: Duration,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            increment: DEFAULT_PROGRESS_INCREMENT,
            pre_completion_cap: DEFAULT_PRE_COMPLETION_CAP,
            min_visible: DEFAULT_MIN_VISIBLE,
            completion_hold: DEFAULT_COMPLETION_HOLD,
        }
    }
}

impl LoadingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero intervals are bumped to one millisecond so the tick loop can't spin.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    #[must_use]
    pub fn with_increment(mut self, increment: u8) -> Self {
        self.increment = increment.clamp(1, COMPLETE_PROGRESS);
        self
    }

    /// The cap stays strictly below 100 so only `stop` can report completion.
    #[must_use]
    pub fn with_pre_completion_cap(mut self, cap: u8) -> Self {
        self.pre_completion_cap = cap.clamp(1, COMPLETE_PROGRESS - 1);
        self
    }

    #[must_use]
    pub fn with_min_visible(mut self, duration: Duration) -> Self {
        self.min_visible = duration;
        self
    }

    #[must_use]
    pub fn with_completion_hold(mut self, duration: Duration) -> Self {
        self.completion_hold = duration;
        self
    }

    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    #[must_use]
    pub const fn increment(&self) -> u8 {
        self.increment
    }

    #[must_use]
    pub const fn pre_completion_cap(&self) -> u8 {
        self.pre_completion_cap
    }

    #[must_use]
    pub const fn min_visible(&self) -> Duration {
        self.min_visible
    }

    #[must_use]
    pub const fn completion_hold(&self) -> Duration {
        self.completion_hold
    }

    /// Progress shown right after an episode starts.
    #[must_use]
    pub fn first_progress(&self) -> u8 {
        self.increment.min(self.pre_completion_cap)
    }

    /// Progress after one tick, never above the cap.
    #[must_use]
    pub fn next_progress(&self, current: u8) -> u8 {
        current
            .saturating_add(self.increment)
            .min(self.pre_completion_cap)
    }

    /// Seed for an explicit snapshot; `0` means "use the first increment".
    #[must_use]
    pub fn seed_progress(&self, requested: u8) -> u8 {
        if requested == 0 {
            self.first_progress()
        } else {
            requested.min(self.pre_completion_cap)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_snapshot_has_no_text_and_zero_progress() {
        let idle = LoadingState::idle();
        assert!(!idle.is_loading);
        assert_eq!(idle.loading_text, None);
        assert_eq!(idle.progress, 0);
        assert_eq!(idle, LoadingState::default());
    }

    #[test]
    fn loading_snapshot_clamps_progress() {
        let state = LoadingState::loading(Some("Saving...".to_string()), 250);
        assert_eq!(state.progress, 100);
        assert!(state.is_complete());
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_text() -> anyhow::Result<()> {
        let json = serde_json::to_value(LoadingState::idle())?;
        assert_eq!(
            json,
            serde_json::json!({ "isLoading": false, "progress": 0 })
        );

        let json = serde_json::to_value(LoadingState::loading(Some("x".to_string()), 8))?;
        assert_eq!(json["loadingText"], "x");
        Ok(())
    }

    #[test]
    fn next_progress_stops_at_cap() {
        let config = LoadingConfig::default();
        assert_eq!(config.first_progress(), 8);
        assert_eq!(config.next_progress(8), 16);
        assert_eq!(config.next_progress(72), 80);
        assert_eq!(config.next_progress(80), 80);
        assert_eq!(config.next_progress(78), 80);
    }

    #[test]
    fn seed_progress_defaults_and_clamps() {
        let config = LoadingConfig::default();
        assert_eq!(config.seed_progress(0), 8);
        assert_eq!(config.seed_progress(42), 42);
        assert_eq!(config.seed_progress(100), 80);
    }

    #[test]
    fn builder_keeps_cap_below_completion() {
        let config = LoadingConfig::new()
            .with_pre_completion_cap(100)
            .with_increment(0)
            .with_tick_interval(Duration::ZERO);
        assert_eq!(config.pre_completion_cap(), 99);
        assert_eq!(config.increment(), 1);
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }
}
