//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::TimerError,
    state::{TimerSnapshot, TimerStatus},
};
use super::format::FormatError;

/// Timer snapshot returned by GET /timer/status/:user_id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStatusResponse {
    pub user_id: String,
    pub status: TimerStatus,
    pub remaining_seconds: u64,
}

impl From<TimerSnapshot> for TimerStatusResponse {
    fn from(snapshot: TimerSnapshot) -> Self {
        Self {
            user_id: snapshot.user_id,
            status: snapshot.status,
            remaining_seconds: snapshot.remaining.as_secs(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub active_timers: usize,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Error reply carrying a status code and a JSON `{"error": ...}` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<TimerError> for ApiError {
    fn from(e: TimerError) -> Self {
        let status = match e {
            TimerError::NotFound => StatusCode::NOT_FOUND,
            TimerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            TimerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<FormatError> for ApiError {
    fn from(e: FormatError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("error generating message: {}", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
