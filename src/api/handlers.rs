//! HTTP endpoint handlers

use std::{
    sync::{Arc, OnceLock, Weak},
    time::Duration,
};
use axum::{
    extract::{Path, State},
    response::Json,
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::state::{action, AppState};
use super::{
    format,
    responses::{ApiError, HealthResponse, TimerStatusResponse},
};

/// Form body of a slash command. Other fields (token, channel, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

/// Parse the free-text duration of a start command as minutes.
///
/// Empty text yields a zero duration, which the manager replaces with its
/// default interval.
pub fn parse_minutes(text: &str) -> Result<Duration, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Duration::ZERO);
    }

    let minutes: f64 = text
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid duration: {}", text)))?;

    Duration::try_from_secs_f64(minutes * 60.0)
        .map_err(|_| ApiError::bad_request(format!("invalid duration: {}", text)))
}

fn format_minutes(duration: Duration) -> String {
    (duration.as_secs_f64() / 60.0).to_string()
}

/// User ID a completion action reports: the caller's own, or the one the
/// manager generated, which is only known once `start` returns
#[derive(Debug, Clone)]
enum NotifyId {
    Given(String),
    Generated(Arc<OnceLock<String>>),
}

impl NotifyId {
    fn get(&self) -> &str {
        match self {
            Self::Given(id) => id,
            Self::Generated(id) => id.get().map(String::as_str).unwrap_or("unknown"),
        }
    }
}

/// Completion action for slash-command timers
fn notify_user(state: &Weak<AppState>, user_id: &NotifyId) {
    let user_id = user_id.get();
    info!("Time's up for user {}!", user_id);
    if let Some(state) = state.upgrade() {
        state.record_action("expired", user_id);
    }
}

/// Handle POST /timer/start - Start (or restart) the caller's timer
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Result<Json<Value>, ApiError> {
    let requested = parse_minutes(&command.text)?;

    let weak = Arc::downgrade(&state);
    let generated = Arc::new(OnceLock::new());
    let notify_id = if command.user_id.trim().is_empty() {
        NotifyId::Generated(Arc::clone(&generated))
    } else {
        NotifyId::Given(command.user_id.clone())
    };
    let user_id = state
        .timers
        .start(
            &command.user_id,
            requested,
            vec![action(move || {
                notify_user(&weak, &notify_id);
                Ok(())
            })],
        )
        .map_err(|e| {
            error!("Failed to start timer: {}", e);
            ApiError::from(e)
        })?;
    let _ = generated.set(user_id.clone());

    state.record_action("start", &user_id);

    let effective = if requested.is_zero() {
        state.default_duration
    } else {
        requested
    };
    info!("Start endpoint called - timer started for user {}", user_id);
    Ok(Json(format::message(
        "start",
        &json!({ "minutes": format_minutes(effective) }),
    )?))
}

/// Handle POST /timer/pause - Pause the caller's timer
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Result<Json<Value>, ApiError> {
    state.timers.pause(&command.user_id).map_err(|e| {
        error!("Failed to pause timer: {}", e);
        ApiError::from(e)
    })?;

    state.record_action("pause", &command.user_id);
    Ok(Json(format::message("pause", &Value::Null)?))
}

/// Handle POST /timer/resume - Resume the caller's paused timer
pub async fn resume_handler(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Result<Json<Value>, ApiError> {
    state.timers.resume(&command.user_id).map_err(|e| {
        error!("Failed to resume timer: {}", e);
        ApiError::from(e)
    })?;

    state.record_action("resume", &command.user_id);
    Ok(Json(format::message("resume", &Value::Null)?))
}

/// Handle POST /timer/stop - Stop and discard the caller's timer
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
    Form(command): Form<SlashCommand>,
) -> Result<Json<Value>, ApiError> {
    state.timers.stop(&command.user_id).map_err(|e| {
        error!("Failed to stop timer: {}", e);
        ApiError::from(e)
    })?;

    state.record_action("stop", &command.user_id);
    Ok(Json(format::message("stop", &Value::Null)?))
}

/// Handle GET /timer/status/:user_id - Report a user's timer
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<TimerStatusResponse>, ApiError> {
    let snapshot = state.timers.status(&user_id)?;
    Ok(Json(snapshot.into()))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let active_timers = state.timers.active_timers().unwrap_or_else(|e| {
        error!("Failed to count active timers: {}", e);
        0
    });
    let last = state.get_last_action();

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.get_uptime(),
        active_timers,
        last_action: last.as_ref().map(|l| format!("{} ({})", l.action, l.user_id)),
        last_action_time: last.map(|l| l.at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes() {
        assert_eq!(parse_minutes("").unwrap(), Duration::ZERO);
        assert_eq!(parse_minutes("  ").unwrap(), Duration::ZERO);
        assert_eq!(parse_minutes("25").unwrap(), Duration::from_secs(25 * 60));
        assert_eq!(parse_minutes("1.5").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_minutes("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn rejects_bad_minutes() {
        for text in ["soon", "-5", "NaN", "inf", "10m"] {
            assert_eq!(
                parse_minutes(text).unwrap_err().status,
                axum::http::StatusCode::BAD_REQUEST,
                "{text}"
            );
        }
    }

    #[test]
    fn given_user_id_is_known_before_start_returns() {
        let given = NotifyId::Given("U1".to_string());
        assert_eq!(given.get(), "U1");

        let slot = Arc::new(OnceLock::new());
        let generated = NotifyId::Generated(Arc::clone(&slot));
        assert_eq!(generated.get(), "unknown");
        slot.set("abc".to_string()).unwrap();
        assert_eq!(generated.get(), "abc");
    }

    #[tokio::test]
    async fn expiry_before_start_returns_reports_given_user() {
        use crate::manager::{ManagerConfig, TimeKeeper};

        let keeper = Arc::new(TimeKeeper::new(ManagerConfig::default()).unwrap());
        let state = Arc::new(AppState::new(
            keeper,
            ManagerConfig::default().default_duration,
            8080,
            "127.0.0.1".to_string(),
        ));

        // Fired before the handler learns the effective ID
        notify_user(&Arc::downgrade(&state), &NotifyId::Given("U9".to_string()));

        let last = state.get_last_action().unwrap();
        assert_eq!(last.action, "expired");
        assert_eq!(last.user_id, "U9");
    }

    #[test]
    fn formats_whole_and_fractional_minutes() {
        assert_eq!(format_minutes(Duration::from_secs(25 * 60)), "25");
        assert_eq!(format_minutes(Duration::from_secs(90)), "1.5");
    }
}
