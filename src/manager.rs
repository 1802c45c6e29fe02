//! Pomodoro manager: per-user timer lifecycle
//!
//! Each user identifier is either absent, running (countdown armed) or
//! paused (countdown disarmed, remaining time frozen). Every transition,
//! including natural expiry, takes effect while holding the store lock, so
//! operations on one user are linearizable with each other and with expiry.
//!
//! ```text
//! Absent --start--> Running --pause--> Paused --resume--> Running
//! Running|Paused --stop--> Absent
//! Running --expiry--> Absent (actions run)
//! ```

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{runtime::Handle, time::Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    error::{Result, TimerError},
    state::{
        timer_state::{Action, Phase, TimerRecord, TimerSnapshot},
        TimerStore,
    },
    tasks::spawn_countdown,
};

/// Interval used when a timer is started with a zero duration
pub const DEFAULT_POMODORO: Duration = Duration::from_secs(25 * 60);

/// Manager settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    pub default_duration: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_POMODORO,
        }
    }
}

/// Operations the transport layer needs from a timer manager
pub trait PomodoroManager: Send + Sync {
    /// Start a timer, generating a user ID when `user_id` is empty.
    ///
    /// A zero `duration` is replaced by the configured default. An active
    /// timer for the same user is cancelled and replaced. Returns the
    /// effective user ID.
    fn start(&self, user_id: &str, duration: Duration, actions: Vec<Action>) -> Result<String>;

    /// Like [`PomodoroManager::start`] with an explicit baseline for elapsed
    /// time accounting
    fn start_at(
        &self,
        user_id: &str,
        started_at: Instant,
        duration: Duration,
        actions: Vec<Action>,
    ) -> Result<String>;

    /// Pause a running timer. Pausing a paused timer is a no-op.
    fn pause(&self, user_id: &str) -> Result<()>;

    /// Resume a paused timer. Resuming a running timer is a no-op.
    fn resume(&self, user_id: &str) -> Result<()>;

    /// Stop a timer (running or paused) without running its actions
    fn stop(&self, user_id: &str) -> Result<()>;

    fn status(&self, user_id: &str) -> Result<TimerSnapshot>;

    fn active_timers(&self) -> Result<usize>;

    /// Cancel every timer without running actions. Returns how many were cancelled.
    fn shutdown(&self) -> Result<usize>;
}

/// In-memory [`PomodoroManager`] scheduling countdowns on a tokio runtime
#[derive(Clone)]
pub struct TimeKeeper {
    inner: Arc<Inner>,
}

struct Inner {
    store: TimerStore<TimerRecord>,
    config: ManagerConfig,
    runtime: Handle,
    generation: AtomicU64,
}

impl TimeKeeper {
    /// Create a manager scheduling on the current tokio runtime
    pub fn new(config: ManagerConfig) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| TimerError::Internal(format!("No tokio runtime for scheduling: {}", e)))?;
        Ok(Self::with_runtime(config, runtime))
    }

    /// Create a manager scheduling on the given runtime
    pub fn with_runtime(config: ManagerConfig, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: TimerStore::new(),
                config,
                runtime,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> ManagerConfig {
        self.inner.config
    }
}

fn require_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        error!("No user ID provided");
        return Err(TimerError::missing_user_id());
    }
    Ok(())
}

impl Inner {
    /// Arm a countdown for `user_id`. Must be called with the store lock
    /// held so the expiry can only observe the record it belongs to.
    fn arm(self: &Arc<Self>, user_id: &str, delay: Duration) -> Phase {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let keeper = Arc::downgrade(self);
        let id = user_id.to_string();
        let countdown = spawn_countdown(&self.runtime, delay, move || {
            if let Some(inner) = keeper.upgrade() {
                inner.expire(&id, generation);
            }
        });
        Phase::Running {
            generation,
            countdown,
        }
    }

    fn expire(&self, user_id: &str, generation: u64) {
        let record = match self
            .store
            .remove_if(user_id, |record| record.is_armed_with(generation))
        {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("Ignoring stale countdown for user {}", user_id);
                return;
            }
            Err(e) => {
                error!("Failed to expire timer for user {}: {}", user_id, e);
                return;
            }
        };

        info!("Timer for user {} finished, running finish actions", user_id);
        run_actions(user_id, record.into_actions());
    }
}

/// Run each action in order; failures are logged and do not stop the rest
fn run_actions(user_id: &str, actions: Vec<Action>) {
    for (index, action) in actions.into_iter().enumerate() {
        match panic::catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(())) => debug!("Finish action {} for user {} completed", index, user_id),
            Ok(Err(e)) => warn!("Finish action {} for user {} failed: {:#}", index, user_id, e),
            Err(_) => error!("Finish action {} for user {} panicked", index, user_id),
        }
    }
}

impl PomodoroManager for TimeKeeper {
    fn start(&self, user_id: &str, duration: Duration, actions: Vec<Action>) -> Result<String> {
        self.start_at(user_id, Instant::now(), duration, actions)
    }

    fn start_at(
        &self,
        user_id: &str,
        started_at: Instant,
        duration: Duration,
        actions: Vec<Action>,
    ) -> Result<String> {
        let user_id = if user_id.trim().is_empty() {
            info!("User ID not provided, generating one");
            Uuid::new_v4().to_string()
        } else {
            user_id.to_string()
        };

        let duration = if duration.is_zero() {
            self.inner.config.default_duration
        } else {
            duration
        };

        // The deadline is `started_at + duration`, even for a past baseline
        let previous = self.inner.store.put_with(user_id.clone(), || {
            let delay = duration.saturating_sub(Instant::now().saturating_duration_since(started_at));
            let phase = self.inner.arm(&user_id, delay);
            TimerRecord::new(started_at, duration, phase, actions)
        })?;

        if let Some(previous) = previous {
            warn!("Replacing active timer for user {}", user_id);
            previous.cancel();
        }

        info!("Started {:?} timer for user {}", duration, user_id);
        Ok(user_id)
    }

    fn pause(&self, user_id: &str) -> Result<()> {
        require_user_id(user_id)?;

        let paused = self
            .inner
            .store
            .update(user_id, |record| record.pause(Instant::now()))?
            .ok_or(TimerError::NotFound)?;

        if paused {
            info!("Paused timer for user {}", user_id);
        } else {
            debug!("Timer for user {} is already paused", user_id);
        }
        Ok(())
    }

    fn resume(&self, user_id: &str) -> Result<()> {
        require_user_id(user_id)?;

        let resumed = self
            .inner
            .store
            .update(user_id, |record| {
                if record.is_running() {
                    return None;
                }
                record.started_at = Instant::now();
                record.phase = self.inner.arm(user_id, record.remaining);
                Some(record.remaining)
            })?
            .ok_or(TimerError::NotFound)?;

        match resumed {
            Some(remaining) => info!("Resumed timer for user {} with {:?} left", user_id, remaining),
            None => debug!("Timer for user {} is already running", user_id),
        }
        Ok(())
    }

    fn stop(&self, user_id: &str) -> Result<()> {
        require_user_id(user_id)?;

        let record = self.inner.store.delete(user_id)?.ok_or(TimerError::NotFound)?;
        record.cancel();

        info!("Stopped timer for user {}", user_id);
        Ok(())
    }

    fn status(&self, user_id: &str) -> Result<TimerSnapshot> {
        require_user_id(user_id)?;

        self.inner
            .store
            .inspect(user_id, |record| record.snapshot(user_id, Instant::now()))?
            .ok_or(TimerError::NotFound)
    }

    fn active_timers(&self) -> Result<usize> {
        self.inner.store.len()
    }

    fn shutdown(&self) -> Result<usize> {
        let records = self.inner.store.drain()?;
        let count = records.len();
        for (_, record) in records {
            record.cancel();
        }

        info!("Cancelled {} active timers", count);
        Ok(count)
    }
}
