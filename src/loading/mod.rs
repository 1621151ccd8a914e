//! Loading-state coordinator behind the portal's progress bar.
//!
//! A single [`LoadingStore`] is built at startup and handed to every consumer.
//! Each loading *episode* goes through three phases:
//!
//! 1. **Ticking:** `start` shows the first increment and a repeating timer
//!    creeps the progress toward the pre-completion cap (80% by default).
//! 2. **Completing:** `stop` snaps the bar to 100%, but never before the
//!    episode has been visible for the minimum duration (500 ms by default).
//! 3. **Holding:** the 100% state stays on screen for the completion hold
//!    (150 ms by default), then the store resets to idle.
//!
//! The store owns one slot per timer kind. Every entry point cancels the
//! armed timers before arming new ones, so a superseded episode can never
//! touch the snapshot again.
//!
//! Timers come from a [`Scheduler`]: [`TokioScheduler`] in the server and
//! [`ManualScheduler`] (a virtual clock) in tests.

mod observer;
mod scheduler;
mod state;
mod store;

pub use observer::{CombinedLoading, LoadingGuard, NAVIGATING_TEXT, NavigationState};
pub use scheduler::{ManualScheduler, RepeatingTask, Scheduler, TimerId, TimerTask, TokioScheduler};
pub use state::{
    COMPLETE_PROGRESS, DEFAULT_COMPLETION_HOLD, DEFAULT_MIN_VISIBLE, DEFAULT_PRE_COMPLETION_CAP,
    DEFAULT_PROGRESS_INCREMENT, DEFAULT_TICK_INTERVAL, LoadingConfig, LoadingState,
};
pub use store::LoadingStore;
