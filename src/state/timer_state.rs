//! Timer record and snapshot structures

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::{task::JoinHandle, time::Instant};

/// A completion action run once when a timer elapses uncancelled
pub type Action = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// Box a closure as a completion [`Action`]
pub fn action<F>(f: F) -> Action
where
    F: FnOnce() -> anyhow::Result<()> + Send + 'static,
{
    Box::new(f)
}

/// Whether a record's countdown is armed
pub(crate) enum Phase {
    /// Countdown armed; `generation` identifies this particular arm
    Running {
        generation: u64,
        countdown: JoinHandle<()>,
    },
    /// Countdown disarmed, remaining duration frozen
    Paused,
}

/// Per-user timer state tracked by the manager
pub struct TimerRecord {
    pub(crate) started_at: Instant,
    pub(crate) remaining: Duration,
    pub(crate) phase: Phase,
    actions: Vec<Action>,
}

impl TimerRecord {
    pub(crate) fn new(started_at: Instant, remaining: Duration, phase: Phase, actions: Vec<Action>) -> Self {
        Self {
            started_at,
            remaining,
            phase,
            actions,
        }
    }

    /// Check if the countdown armed under `generation` is still the live one
    pub(crate) fn is_armed_with(&self, generation: u64) -> bool {
        matches!(self.phase, Phase::Running { generation: g, .. } if g == generation)
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Disarm the countdown and freeze the remaining duration.
    ///
    /// Returns false when the record was already paused.
    pub(crate) fn pause(&mut self, now: Instant) -> bool {
        let remaining = self.remaining_at(now);
        match std::mem::replace(&mut self.phase, Phase::Paused) {
            Phase::Running { countdown, .. } => {
                countdown.abort();
                self.remaining = remaining;
                true
            }
            Phase::Paused => false,
        }
    }

    /// Remaining duration as seen at `now`
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.phase {
            Phase::Running { .. } => self
                .remaining
                .saturating_sub(now.saturating_duration_since(self.started_at)),
            Phase::Paused => self.remaining,
        }
    }

    /// Disarm the countdown and drop the actions without running them
    pub(crate) fn cancel(self) {
        if let Phase::Running { countdown, .. } = self.phase {
            countdown.abort();
        }
    }

    pub(crate) fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    pub(crate) fn snapshot(&self, user_id: &str, now: Instant) -> TimerSnapshot {
        TimerSnapshot {
            user_id: user_id.to_string(),
            status: if self.is_running() {
                TimerStatus::Running
            } else {
                TimerStatus::Paused
            },
            remaining: self.remaining_at(now),
        }
    }
}

impl fmt::Debug for TimerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRecord")
            .field("started_at", &self.started_at)
            .field("remaining", &self.remaining)
            .field("running", &self.is_running())
            .field("actions", &self.actions.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Running,
    Paused,
}

/// Read-only view of a timer at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub user_id: String,
    pub status: TimerStatus,
    pub remaining: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_remaining_once() {
        let started_at = Instant::now();
        let countdown = tokio::spawn(std::future::pending::<()>());
        let mut record = TimerRecord::new(
            started_at,
            Duration::from_secs(600),
            Phase::Running { generation: 1, countdown },
            Vec::new(),
        );
        assert!(record.is_armed_with(1));
        assert!(!record.is_armed_with(2));

        let later = started_at + Duration::from_secs(240);
        assert!(record.pause(later));
        assert_eq!(record.remaining, Duration::from_secs(360));
        assert!(!record.is_armed_with(1));

        assert!(!record.pause(later + Duration::from_secs(60)));
        assert_eq!(record.remaining_at(later + Duration::from_secs(60)), Duration::from_secs(360));
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_clamps_at_zero() {
        let started_at = Instant::now();
        let countdown = tokio::spawn(std::future::pending::<()>());
        let mut record = TimerRecord::new(
            started_at,
            Duration::from_secs(30),
            Phase::Running { generation: 7, countdown },
            Vec::new(),
        );

        let overdue = started_at + Duration::from_secs(90);
        assert_eq!(record.remaining_at(overdue), Duration::ZERO);
        record.pause(overdue);
        assert_eq!(record.snapshot("carol", overdue).remaining, Duration::ZERO);
        assert_eq!(record.snapshot("carol", overdue).status, TimerStatus::Paused);
    }
}
