//! State management module
//!
//! This module contains the timer store, the per-user timer records and the
//! shared application state handed to HTTP handlers.

pub mod app_state;
pub mod timer_state;
pub mod timer_store;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{action, Action, TimerSnapshot, TimerStatus};
pub use timer_store::TimerStore;
