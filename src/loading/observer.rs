//! Trigger sources that drive the store: the manual async wrapper and the
//! navigation signal merged into a combined view.

use super::{state::LoadingState, store::LoadingStore};
use serde::{Deserialize, Serialize};
use std::{fmt, future::Future, str::FromStr};
use utoipa::ToSchema;

/// Text shown while a navigation transition is in flight.
pub const NAVIGATING_TEXT: &str = "Navigating...";

/// Router transition state, owned by the router and only read here.
#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NavigationState {
    #[default]
    Idle,
    Loading,
    Submitting,
}

impl NavigationState {
    #[must_use]
    pub const fn is_navigating(self) -> bool {
        matches!(self, Self::Loading | Self::Submitting)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Submitting => "submitting",
        }
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigationState {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "loading" => Ok(Self::Loading),
            "submitting" => Ok(Self::Submitting),
            other => Err(format!("unknown navigation state: {other}")),
        }
    }
}

/// What the progress bar renders after merging both trigger sources.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CombinedLoading {
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading_text: Option<String>,
    pub is_navigating: bool,
    pub is_custom_loading: bool,
    /// Only reported while the store itself is loading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl CombinedLoading {
    /// Navigation wins the description; progress comes from the store only.
    #[must_use]
    pub fn merge(store: &LoadingState, navigation: NavigationState) -> Self {
        let is_navigating = navigation.is_navigating();
        let loading_text = if is_navigating {
            Some(NAVIGATING_TEXT.to_string())
        } else {
            store.loading_text.clone()
        };

        Self {
            is_loading: store.is_loading || is_navigating,
            loading_text,
            is_navigating,
            is_custom_loading: store.is_loading,
            progress: store.is_loading.then_some(store.progress),
        }
    }
}

/// Calls [`LoadingStore::stop`] when dropped.
#[must_use = "the episode stops as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    store: LoadingStore,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.store.stop();
    }
}

impl LoadingStore {
    /// Start an episode that ends when the returned guard is dropped.
    pub fn begin(&self, text: Option<&str>) -> LoadingGuard {
        self.start(text);
        LoadingGuard {
            store: self.clone(),
        }
    }

    /// Run `operation` inside an episode. `stop` runs on success, on error,
    /// on panic and when the future is dropped before completion.
    pub async fn with_loading<F, T>(&self, text: Option<&str>, operation: F) -> T
    where
        F: Future<Output = T>,
    {
        let _guard = self.begin(text);
        operation.await
    }

    /// Combined view for the current snapshot and navigation state.
    #[must_use]
    pub fn combined(&self, navigation: NavigationState) -> CombinedLoading {
        CombinedLoading::merge(&self.snapshot(), navigation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{
        scheduler::{ManualScheduler, TokioScheduler},
        state::LoadingConfig,
    };
    use anyhow::{Result, anyhow};
    use std::{sync::Arc, time::Duration};

    #[test]
    fn navigation_state_parses_case_insensitive() {
        assert_eq!(
            "Submitting".parse::<NavigationState>(),
            Ok(NavigationState::Submitting)
        );
        assert_eq!(" idle ".parse::<NavigationState>(), Ok(NavigationState::Idle));
        assert!("done".parse::<NavigationState>().is_err());
        assert_eq!(NavigationState::Loading.to_string(), "loading");
    }

    #[test]
    fn navigation_text_takes_precedence() {
        let manual = LoadingState::loading(Some("Saving...".to_string()), 24);
        let combined = CombinedLoading::merge(&manual, NavigationState::Submitting);

        assert!(combined.is_loading);
        assert_eq!(combined.loading_text.as_deref(), Some(NAVIGATING_TEXT));
        assert!(combined.is_navigating);
        assert!(combined.is_custom_loading);
        assert_eq!(combined.progress, Some(24));
    }

    #[test]
    fn navigation_alone_has_no_progress() {
        let combined = CombinedLoading::merge(&LoadingState::idle(), NavigationState::Loading);
        assert!(combined.is_loading);
        assert!(!combined.is_custom_loading);
        assert_eq!(combined.progress, None);
        assert_eq!(combined.loading_text.as_deref(), Some(NAVIGATING_TEXT));
    }

    #[test]
    fn manual_text_used_when_idle_navigation() {
        let manual = LoadingState::loading(Some("Saving...".to_string()), 8);
        let combined = CombinedLoading::merge(&manual, NavigationState::Idle);
        assert_eq!(combined.loading_text.as_deref(), Some("Saving..."));

        let idle = CombinedLoading::merge(&LoadingState::idle(), NavigationState::Idle);
        assert!(!idle.is_loading);
        assert_eq!(idle.loading_text, None);
    }

    #[test]
    fn guard_stops_on_drop() {
        let scheduler = Arc::new(ManualScheduler::new());
        let store = LoadingStore::new(scheduler.clone(), LoadingConfig::default());

        {
            let _guard = store.begin(Some("Working"));
            assert!(store.snapshot().is_loading);
        }

        scheduler.advance(Duration::from_millis(650));
        assert_eq!(store.snapshot(), LoadingState::idle());
    }

    #[test]
    fn overlapping_guards_share_one_episode() {
        let scheduler = Arc::new(ManualScheduler::new());
        let store = LoadingStore::new(scheduler.clone(), LoadingConfig::default());

        let first = store.begin(Some("Signing in..."));
        scheduler.advance(Duration::from_millis(300));
        let second = store.begin(Some("Creating account..."));
        assert_eq!(store.snapshot().progress, 8);

        // The first caller finishing completes the bar the second one restarted.
        drop(first);
        scheduler.advance(Duration::from_millis(500));
        let state = store.snapshot();
        assert_eq!(state.progress, 100);
        assert_eq!(state.loading_text.as_deref(), Some("Creating account..."));

        scheduler.advance(Duration::from_millis(150));
        assert_eq!(store.snapshot(), LoadingState::idle());

        drop(second);
        assert_eq!(store.snapshot(), LoadingState::idle());
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn with_loading_stops_after_error() -> Result<()> {
        let store = LoadingStore::new(
            Arc::new(TokioScheduler::current()?),
            LoadingConfig::default(),
        );

        let result: Result<()> = store
            .with_loading(Some("Saving..."), async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Err(anyhow!("backend unavailable"))
            })
            .await;
        assert!(result.is_err());
        assert!(store.snapshot().is_loading);

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(store.snapshot(), LoadingState::idle());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn with_loading_stops_when_cancelled() -> Result<()> {
        let store = LoadingStore::new(
            Arc::new(TokioScheduler::current()?),
            LoadingConfig::default(),
        );

        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            store.with_loading(Some("Slow"), tokio::time::sleep(Duration::from_secs(10))),
        )
        .await;
        assert!(outcome.is_err());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.snapshot(), LoadingState::idle());
        Ok(())
    }
}
