//! Timer scheduling behind a trait so the animator can run on tokio in
//! production and on a virtual clock in tests.

use anyhow::{Context, Result};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::AbortHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::trace;

pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// Handle returned by a [`Scheduler`]; pass it back to `cancel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Source of time and timers.
///
/// A cancelled timer never runs its task again. Cancelling an unknown or
/// already fired timer is a no-op.
pub trait Scheduler: Send + Sync {
    /// Monotonic time elapsed since the scheduler was created.
    fn now(&self) -> Duration;

    /// Run `task` once after `delay`.
    fn after(&self, delay: Duration, task: TimerTask) -> TimerId;

    /// Run `task` every `period`, first run one period from now.
    fn every(&self, period: Duration, task: RepeatingTask) -> TimerId;

    fn cancel(&self, id: TimerId);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scheduler backed by tokio timers; each timer is a spawned task.
#[derive(Debug)]
pub struct TokioScheduler {
    handle: Handle,
    origin: Instant,
    next_id: AtomicU64,
    tasks: Arc<Mutex<HashMap<TimerId, AbortHandle>>>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            origin: Instant::now(),
            next_id: AtomicU64::new(1),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Build a scheduler bound to the runtime of the calling task.
    ///
    /// # Errors
    /// Returns an error when called outside of a tokio runtime.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().context("loading scheduler needs a tokio runtime")?;
        Ok(Self::new(handle))
    }

    /// Number of timers that have not fired or been cancelled yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.tasks).len()
    }

    fn next_id(&self) -> TimerId {
        TimerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn after(&self, delay: Duration, task: TimerTask) -> TimerId {
        let id = self.next_id();
        let tasks = Arc::clone(&self.tasks);

        // Hold the registry while spawning so the entry exists before the task can remove it.
        let mut registry = lock(&self.tasks);
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&tasks).remove(&id);
            task();
        });
        registry.insert(id, join.abort_handle());

        trace!(timer = id.get(), delay_ms = delay.as_millis(), "timer scheduled");
        id
    }

    fn every(&self, period: Duration, mut task: RepeatingTask) -> TimerId {
        let id = self.next_id();

        let mut registry = lock(&self.tasks);
        let join = self.handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task();
            }
        });
        registry.insert(id, join.abort_handle());

        trace!(timer = id.get(), period_ms = period.as_millis(), "interval scheduled");
        id
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = lock(&self.tasks).remove(&id) {
            handle.abort();
            trace!(timer = id.get(), "timer cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in lock(&self.tasks).drain() {
            handle.abort();
        }
    }
}

enum Job {
    Once(TimerTask),
    Every { period: Duration, task: RepeatingTask },
}

struct Entry {
    id: TimerId,
    job: Job,
}

#[derive(Default)]
struct VirtualClock {
    now: Duration,
    next_id: u64,
    sequence: u64,
    queue: BTreeMap<(Duration, u64), Entry>,
    active: HashSet<TimerId>,
}

impl VirtualClock {
    fn push(&mut self, deadline: Duration, entry: Entry) {
        self.sequence += 1;
        self.queue.insert((deadline, self.sequence), entry);
    }

    fn pop_due(&mut self, target: Duration) -> Option<(Duration, Entry)> {
        let key = *self.queue.keys().next()?;
        if key.0 > target {
            return None;
        }
        self.queue.remove(&key).map(|entry| (key.0, entry))
    }
}

/// Deterministic scheduler driven by [`ManualScheduler::advance`].
///
/// Tasks only run inside `advance`, in deadline order, with the clock set to
/// their deadline. Tasks may schedule or cancel timers while running.
#[derive(Default)]
pub struct ManualScheduler {
    clock: Mutex<VirtualClock>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, firing every timer that comes due on the way.
    pub fn advance(&self, by: Duration) {
        let target = lock(&self.clock).now + by;

        loop {
            let due = {
                let mut clock = lock(&self.clock);
                match clock.pop_due(target) {
                    Some((deadline, entry)) => {
                        clock.now = deadline;
                        if matches!(entry.job, Job::Once(_)) {
                            clock.active.remove(&entry.id);
                        }
                        Some((deadline, entry))
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };

            let Some((deadline, entry)) = due else {
                break;
            };

            match entry.job {
                Job::Once(task) => task(),
                Job::Every { period, mut task } => {
                    task();
                    let mut clock = lock(&self.clock);
                    if clock.active.contains(&entry.id) {
                        clock.push(
                            deadline + period,
                            Entry {
                                id: entry.id,
                                job: Job::Every { period, task },
                            },
                        );
                    }
                }
            }
        }
    }

    /// Number of timers still waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.clock).active.len()
    }

    fn schedule(&self, delay: Duration, job: Job) -> TimerId {
        let mut clock = lock(&self.clock);
        clock.next_id += 1;
        let id = TimerId(clock.next_id);
        let deadline = clock.now + delay;
        clock.active.insert(id);
        clock.push(deadline, Entry { id, job });
        id
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        lock(&self.clock).now
    }

    fn after(&self, delay: Duration, task: TimerTask) -> TimerId {
        self.schedule(delay, Job::Once(task))
    }

    fn every(&self, period: Duration, task: RepeatingTask) -> TimerId {
        // A zero period would never let `advance` finish.
        let period = period.max(Duration::from_millis(1));
        self.schedule(period, Job::Every { period, task })
    }

    fn cancel(&self, id: TimerId) {
        let mut clock = lock(&self.clock);
        if clock.active.remove(&id) {
            clock.queue.retain(|_, entry| entry.id != id);
        }
    }
}
