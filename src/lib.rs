//! Pomodoro Keeper - per-user pomodoro timers behind slash commands
//!
//! This library provides a concurrency-safe timer manager that starts,
//! pauses, resumes and stops one countdown per user and runs completion
//! actions exactly once when a countdown elapses, plus the HTTP layer that
//! exposes it.

pub mod config;
pub mod error;
pub mod state;
pub mod manager;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use manager::{ManagerConfig, PomodoroManager, TimeKeeper, DEFAULT_POMODORO};
pub use state::{action, Action, AppState, TimerStore};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
