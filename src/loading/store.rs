//! The loading store: owns the snapshot, the episode clock and the three
//! timer slots (tick loop, minimum-visible deferral, completion reset).

use super::{
    scheduler::{Scheduler, TimerId},
    state::{COMPLETE_PROGRESS, LoadingConfig, LoadingState},
};
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug)]
struct TimerSlot {
    ticket: u64,
    id: TimerId,
}

/// Timer handles for the current episode. At most one of each kind is armed.
#[derive(Debug, Default)]
struct Timers {
    tick: Option<TimerSlot>,
    min_visible: Option<TimerSlot>,
    reset: Option<TimerSlot>,
    next_ticket: u64,
}

impl Timers {
    fn ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn cancel_tick(&mut self, scheduler: &dyn Scheduler) {
        if let Some(slot) = self.tick.take() {
            scheduler.cancel(slot.id);
        }
    }

    fn cancel_min_visible(&mut self, scheduler: &dyn Scheduler) {
        if let Some(slot) = self.min_visible.take() {
            scheduler.cancel(slot.id);
        }
    }

    fn cancel_reset(&mut self, scheduler: &dyn Scheduler) {
        if let Some(slot) = self.reset.take() {
            scheduler.cancel(slot.id);
        }
    }

    fn cancel_all(&mut self, scheduler: &dyn Scheduler) {
        self.cancel_tick(scheduler);
        self.cancel_min_visible(scheduler);
        self.cancel_reset(scheduler);
    }

    fn armed(&self) -> usize {
        [self.tick, self.min_visible, self.reset]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

fn is_armed(slot: Option<TimerSlot>, ticket: u64) -> bool {
    slot.is_some_and(|slot| slot.ticket == ticket)
}

#[derive(Debug)]
struct Episode {
    state: LoadingState,
    started_at: Option<Duration>,
    timers: Timers,
}

struct Shared {
    config: LoadingConfig,
    scheduler: Arc<dyn Scheduler>,
    episode: Mutex<Episode>,
    snapshot: watch::Sender<LoadingState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Episode> {
        self.episode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, episode: &mut Episode, next: LoadingState) {
        if episode.state != next {
            episode.state = next.clone();
            self.snapshot.send_replace(next);
        }
    }

    fn begin(self: &Arc<Self>, episode: &mut Episode, text: Option<String>, progress: u8) {
        let scheduler = self.scheduler.as_ref();
        episode.timers.cancel_all(scheduler);
        episode.started_at = Some(scheduler.now());
        self.publish(episode, LoadingState::loading(text, progress));

        if progress < self.config.pre_completion_cap() {
            let ticket = episode.timers.ticket();
            let weak = Arc::downgrade(self);
            let id = scheduler.every(
                self.config.tick_interval(),
                Box::new(move || with_shared(&weak, |shared| shared.on_tick(ticket))),
            );
            episode.timers.tick = Some(TimerSlot { ticket, id });
        }
    }

    fn reset(&self, episode: &mut Episode) {
        episode.timers.cancel_all(self.scheduler.as_ref());
        episode.started_at = None;
        self.publish(episode, LoadingState::idle());
    }

    fn on_tick(&self, ticket: u64) {
        let mut episode = self.lock();
        if !is_armed(episode.timers.tick, ticket) || !episode.state.is_loading {
            return;
        }

        let current = episode.state.progress;
        let next = self.config.next_progress(current);
        if next > current {
            let mut state = episode.state.clone();
            state.progress = next;
            self.publish(&mut episode, state);
            trace!(progress = next, "loading progress");
        }

        if next >= self.config.pre_completion_cap() {
            episode.timers.cancel_tick(self.scheduler.as_ref());
        }
    }

    fn on_min_visible(self: &Arc<Self>, ticket: u64) {
        let mut episode = self.lock();
        if !is_armed(episode.timers.min_visible, ticket) {
            return;
        }
        episode.timers.min_visible = None;
        self.complete(&mut episode);
    }

    fn on_reset(&self, ticket: u64) {
        let mut episode = self.lock();
        if !is_armed(episode.timers.reset, ticket) {
            return;
        }
        episode.timers.reset = None;
        self.reset(&mut episode);
        debug!("loading finished");
    }

    /// Snap to 100% and arm the reset after the completion hold.
    fn complete(self: &Arc<Self>, episode: &mut Episode) {
        let scheduler = self.scheduler.as_ref();
        episode.timers.cancel_tick(scheduler);
        if !episode.state.is_loading {
            return;
        }

        let mut state = episode.state.clone();
        state.progress = COMPLETE_PROGRESS;
        self.publish(episode, state);

        episode.timers.cancel_reset(scheduler);
        let ticket = episode.timers.ticket();
        let weak = Arc::downgrade(self);
        let id = scheduler.after(
            self.config.completion_hold(),
            Box::new(move || with_shared(&weak, |shared| shared.on_reset(ticket))),
        );
        episode.timers.reset = Some(TimerSlot { ticket, id });
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let episode = self
            .episode
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        episode.timers.cancel_all(self.scheduler.as_ref());
    }
}

fn with_shared(weak: &Weak<Shared>, f: impl FnOnce(&Arc<Shared>)) {
    if let Some(shared) = weak.upgrade() {
        f(&shared);
    }
}

/// Loading indicator state shared by every consumer of one application.
///
/// Cloning is cheap and every clone drives the same episode. Consumers read
/// through [`LoadingStore::snapshot`] or [`LoadingStore::subscribe`]; only the
/// store mutates the state.
#[derive(Clone)]
pub struct LoadingStore {
    shared: Arc<Shared>,
}

impl fmt::Debug for LoadingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingStore")
            .field("config", &self.shared.config)
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl LoadingStore {
    #[must_use]
    pub fn new(scheduler: Arc<dyn Scheduler>, config: LoadingConfig) -> Self {
        let (snapshot, _) = watch::channel(LoadingState::idle());
        Self {
            shared: Arc::new(Shared {
                config,
                scheduler,
                episode: Mutex::new(Episode {
                    state: LoadingState::idle(),
                    started_at: None,
                    timers: Timers::default(),
                }),
                snapshot,
            }),
        }
    }

    /// Begin a new episode, superseding any episode in progress.
    pub fn start(&self, text: Option<&str>) {
        let mut episode = self.shared.lock();
        self.shared.begin(
            &mut episode,
            text.map(ToString::to_string),
            self.shared.config.first_progress(),
        );
        debug!(text = text.unwrap_or_default(), "loading started");
    }

    /// Finish the current episode, keeping it visible for at least the
    /// minimum duration. A no-op while idle or while the completion hold runs.
    pub fn stop(&self) {
        let mut episode = self.shared.lock();
        if !episode.state.is_loading || episode.timers.reset.is_some() {
            trace!("stop ignored, nothing to finish");
            return;
        }

        let scheduler = self.shared.scheduler.as_ref();
        let now = scheduler.now();
        let elapsed = episode
            .started_at
            .map_or(self.shared.config.min_visible(), |started| {
                now.saturating_sub(started)
            });
        let remaining = self.shared.config.min_visible().saturating_sub(elapsed);

        episode.timers.cancel_min_visible(scheduler);
        if remaining.is_zero() {
            self.shared.complete(&mut episode);
        } else {
            let ticket = episode.timers.ticket();
            let weak = Arc::downgrade(&self.shared);
            let id = scheduler.after(
                remaining,
                Box::new(move || with_shared(&weak, |shared| shared.on_min_visible(ticket))),
            );
            episode.timers.min_visible = Some(TimerSlot { ticket, id });
        }
        debug!(
            remaining_ms = remaining.as_millis(),
            "loading stop requested"
        );
    }

    /// Replace the snapshot outright. A loading snapshot restarts the
    /// animation from its progress (or the first increment when it is `0`);
    /// anything else resets to idle immediately.
    pub fn set_state(&self, next: LoadingState) {
        let mut episode = self.shared.lock();
        if next.is_loading {
            let progress = self.shared.config.seed_progress(next.progress);
            self.shared.begin(&mut episode, next.loading_text, progress);
        } else {
            self.shared.reset(&mut episode);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> LoadingState {
        self.shared.snapshot.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadingState> {
        self.shared.snapshot.subscribe()
    }

    /// True between the 100% snap and the reset to idle.
    #[must_use]
    pub fn is_completing(&self) -> bool {
        self.shared.lock().timers.reset.is_some()
    }

    /// Timers currently armed by the store, at most three.
    #[must_use]
    pub fn armed_timers(&self) -> usize {
        self.shared.lock().timers.armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::scheduler::{ManualScheduler, TokioScheduler};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn store() -> (Arc<ManualScheduler>, LoadingStore) {
        let scheduler = Arc::new(ManualScheduler::new());
        let store = LoadingStore::new(scheduler.clone(), LoadingConfig::default());
        (scheduler, store)
    }

    #[test]
    fn start_shows_first_increment() {
        let (_, store) = store();
        store.start(Some("Signing in..."));

        let state = store.snapshot();
        assert!(state.is_loading);
        assert_eq!(state.loading_text.as_deref(), Some("Signing in..."));
        assert_eq!(state.progress, 8);
        assert_eq!(store.armed_timers(), 1);
    }

    #[test]
    fn progress_climbs_by_increment_then_holds_at_cap() {
        let (scheduler, store) = store();
        store.start(None);

        let mut previous = store.snapshot().progress;
        for _ in 0..9 {
            scheduler.advance(ms(120));
            let progress = store.snapshot().progress;
            assert_eq!(progress, previous + 8);
            previous = progress;
        }
        assert_eq!(previous, 80);

        scheduler.advance(ms(10_000));
        assert_eq!(store.snapshot().progress, 80);
        assert!(store.snapshot().is_loading);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn quick_stop_stays_visible_for_min_duration() {
        let (scheduler, store) = store();
        store.start(Some("x"));
        store.stop();

        scheduler.advance(ms(499));
        let state = store.snapshot();
        assert!(state.is_loading);
        assert!(state.progress < 100);

        scheduler.advance(ms(1));
        let state = store.snapshot();
        assert!(state.is_loading);
        assert_eq!(state.progress, 100);
        assert_eq!(state.loading_text.as_deref(), Some("x"));
        assert!(store.is_completing());

        scheduler.advance(ms(149));
        assert!(store.snapshot().is_loading);

        scheduler.advance(ms(1));
        assert_eq!(store.snapshot(), LoadingState::idle());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(store.armed_timers(), 0);
    }

    #[test]
    fn late_stop_completes_synchronously() {
        let (scheduler, store) = store();
        store.start(None);
        scheduler.advance(ms(600));

        store.stop();
        let state = store.snapshot();
        assert_eq!(state.progress, 100);
        assert!(state.is_loading);

        scheduler.advance(ms(150));
        assert_eq!(store.snapshot(), LoadingState::idle());
    }

    #[test]
    fn stop_while_idle_is_noop() {
        let (scheduler, store) = store();
        store.stop();
        assert_eq!(store.snapshot(), LoadingState::idle());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn double_stop_resets_once() {
        let (scheduler, store) = store();
        let mut rx = store.subscribe();
        store.start(None);
        store.stop();
        store.stop();
        assert_eq!(scheduler.pending(), 2);

        scheduler.advance(ms(500));
        store.stop();
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(ms(150));
        assert_eq!(store.snapshot(), LoadingState::idle());
        assert_eq!(scheduler.pending(), 0);
        assert!(rx.has_changed().unwrap_or(false));
        rx.borrow_and_update();

        scheduler.advance(ms(1_000));
        assert!(!rx.has_changed().unwrap_or(true));
    }

    #[test]
    fn restart_supersedes_previous_episode() {
        let (scheduler, store) = store();
        store.start(Some("first"));
        scheduler.advance(ms(360));
        assert_eq!(store.snapshot().progress, 32);

        store.stop();
        scheduler.advance(ms(100));
        store.start(Some("second"));
        assert_eq!(store.snapshot().progress, 8);
        assert_eq!(store.snapshot().loading_text.as_deref(), Some("second"));
        assert_eq!(scheduler.pending(), 1);

        // The first episode's deferred completion would have fired here.
        scheduler.advance(ms(50));
        assert_eq!(store.snapshot().progress, 8);

        scheduler.advance(ms(70));
        assert_eq!(store.snapshot().progress, 16);

        // Minimum visibility counts from the restart.
        store.stop();
        scheduler.advance(ms(379));
        assert!(store.snapshot().progress < 100);
        scheduler.advance(ms(1));
        assert_eq!(store.snapshot().progress, 100);
    }

    #[test]
    fn restart_during_completion_hold_cancels_reset() {
        let (scheduler, store) = store();
        store.start(None);
        scheduler.advance(ms(500));
        store.stop();
        assert!(store.is_completing());

        store.start(Some("again"));
        assert!(!store.is_completing());
        scheduler.advance(ms(150));
        let state = store.snapshot();
        assert!(state.is_loading);
        assert_eq!(state.loading_text.as_deref(), Some("again"));
    }

    #[test]
    fn set_state_seeds_and_clamps_progress() {
        let (scheduler, store) = store();
        store.set_state(LoadingState::loading(Some("Uploading".to_string()), 40));
        assert_eq!(store.snapshot().progress, 40);
        scheduler.advance(ms(120));
        assert_eq!(store.snapshot().progress, 48);

        store.set_state(LoadingState::loading(None, 95));
        assert_eq!(store.snapshot().progress, 80);
        assert_eq!(scheduler.pending(), 0);

        store.set_state(LoadingState::loading(None, 0));
        assert_eq!(store.snapshot().progress, 8);
    }

    #[test]
    fn set_state_idle_resets_immediately() {
        let (scheduler, store) = store();
        store.start(Some("busy"));
        store.stop();

        let mut next = LoadingState::idle();
        next.loading_text = Some("ignored".to_string());
        next.progress = 50;
        store.set_state(next);

        assert_eq!(store.snapshot(), LoadingState::idle());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn progress_stays_in_range_for_mixed_calls() {
        let (scheduler, store) = store();
        let steps: [(u8, u64); 12] = [
            (0, 50),
            (1, 10),
            (0, 700),
            (1, 0),
            (1, 90),
            (0, 30),
            (2, 120),
            (1, 480),
            (1, 200),
            (0, 2_000),
            (1, 499),
            (1, 1_000),
        ];

        for (action, wait) in steps {
            match action {
                0 => store.start(Some("op")),
                1 => store.stop(),
                _ => store.set_state(LoadingState::loading(None, 60)),
            }
            for _ in 0..wait / 10 {
                scheduler.advance(ms(10));
                let state = store.snapshot();
                assert!(state.progress <= 100);
                if !state.is_loading {
                    assert_eq!(state, LoadingState::idle());
                }
                assert!(store.armed_timers() <= 3);
            }
        }

        assert_eq!(store.snapshot(), LoadingState::idle());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn dropping_store_cancels_timers() {
        let (scheduler, store) = store();
        store.start(None);
        store.stop();
        assert_eq!(scheduler.pending(), 2);

        drop(store);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_on_tokio_timers() -> anyhow::Result<()> {
        let store = LoadingStore::new(
            Arc::new(TokioScheduler::current()?),
            LoadingConfig::default(),
        );
        let mut rx = store.subscribe();

        store.start(Some("Saving..."));
        tokio::time::sleep(ms(250)).await;
        assert_eq!(store.snapshot().progress, 24);

        store.stop();
        tokio::time::sleep(ms(260)).await;
        assert_eq!(store.snapshot().progress, 100);

        tokio::time::sleep(ms(150)).await;
        assert_eq!(store.snapshot(), LoadingState::idle());
        rx.changed().await?;
        assert_eq!(*rx.borrow(), LoadingState::idle());
        Ok(())
    }
}
