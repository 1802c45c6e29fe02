//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::manager::PomodoroManager;

/// Shared state handed to every HTTP handler
pub struct AppState {
    /// Timer manager backing the slash commands
    pub timers: Arc<dyn PomodoroManager>,
    /// Interval substituted when a start request carries no duration
    pub default_duration: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<LastAction>>,
}

/// The most recent timer transition seen by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastAction {
    pub action: String,
    pub user_id: String,
    pub at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        timers: Arc<dyn PomodoroManager>,
        default_duration: Duration,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            timers,
            default_duration,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    /// Remember `action` as the latest transition for `user_id`
    pub fn record_action(&self, action: &str, user_id: &str) {
        match self.last_action.lock() {
            Ok(mut last) => {
                *last = Some(LastAction {
                    action: action.to_string(),
                    user_id: user_id.to_string(),
                    at: Utc::now(),
                });
            }
            Err(e) => warn!("Failed to record last action: {}", e),
        }
    }

    pub fn get_last_action(&self) -> Option<LastAction> {
        self.last_action.lock().ok().and_then(|last| last.clone())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
