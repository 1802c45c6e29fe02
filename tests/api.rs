use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pomodoro_keeper::{create_router, AppState, ManagerConfig, TimeKeeper};

fn setup() -> (Router, Arc<AppState>) {
    let keeper = Arc::new(TimeKeeper::new(ManagerConfig::default()).unwrap());
    let state = Arc::new(AppState::new(
        keeper,
        ManagerConfig::default().default_duration,
        8080,
        "127.0.0.1".to_string(),
    ));
    (create_router(Arc::clone(&state)), state)
}

async fn command(app: &Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn block_text(payload: &Value) -> &str {
    payload["blocks"][0]["text"]["text"].as_str().unwrap()
}

#[tokio::test(start_paused = true)]
async fn full_lifecycle() {
    let (app, state) = setup();

    let (status, body) = command(&app, "/timer/start", "user_id=U1&text=10&token=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(block_text(&body), "Time to focus! You've got *10* minutes.");

    tokio::time::sleep(Duration::from_secs(4 * 60)).await;

    let (status, body) = command(&app, "/timer/pause", "user_id=U1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(block_text(&body).starts_with("Timer is paused."));

    let request = Request::get("/timer/status/U1").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["remaining_seconds"], 6 * 60);

    let (status, body) = command(&app, "/timer/resume", "user_id=U1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(block_text(&body), "Resuming the timer!");

    let (status, _) = command(&app, "/timer/stop", "user_id=U1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.timers.active_timers().unwrap(), 0);

    let (status, body) = command(&app, "/timer/stop", "user_id=U1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no timer associated with given user");
}

#[tokio::test(start_paused = true)]
async fn empty_text_uses_default_interval() {
    let (app, state) = setup();

    let (status, body) = command(&app, "/timer/start", "user_id=U2&text=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(block_text(&body), "Time to focus! You've got *25* minutes.");

    tokio::time::sleep(Duration::from_secs(25 * 60 + 1)).await;
    assert_eq!(state.timers.active_timers().unwrap(), 0);
    let last = state.get_last_action().unwrap();
    assert_eq!(last.action, "expired");
    assert_eq!(last.user_id, "U2");
}

#[tokio::test]
async fn rejects_bad_requests() {
    let (app, _) = setup();

    let (status, body) = command(&app, "/timer/start", "user_id=U3&text=later").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid duration: later");

    let (status, _) = command(&app, "/timer/pause", "user_id=nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = command(&app, "/timer/resume", "user_id=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no user ID provided");
}

#[tokio::test]
async fn health_reports_active_timers() {
    let (app, _) = setup();
    command(&app, "/timer/start", "user_id=U4&text=5").await;

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_timers"], 1);
    assert_eq!(body["last_action"], "start (U4)");
}
