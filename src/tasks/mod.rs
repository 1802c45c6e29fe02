//! Background tasks module
//!
//! This module contains the background tasks that drive timer expiry.

pub mod countdown;

// Re-export main functions
pub use countdown::spawn_countdown;
