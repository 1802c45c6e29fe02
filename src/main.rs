//! Pomodoro Keeper - per-user pomodoro timers behind slash commands
//!
//! This is the main entry point for the pomodoro-keeper server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_keeper::{
    api::create_router,
    config::Config,
    manager::{PomodoroManager, TimeKeeper},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_keeper={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-keeper server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, default timer={}min",
          config.host, config.port, config.default_minutes);

    let keeper = Arc::new(TimeKeeper::new(config.manager_config())?);
    let state = Arc::new(AppState::new(
        keeper.clone(),
        config.default_duration(),
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start            - Start a timer (text = minutes)");
    info!("  POST /timer/pause            - Pause the running timer");
    info!("  POST /timer/resume           - Resume a paused timer");
    info!("  POST /timer/stop             - Stop and discard the timer");
    info!("  GET  /timer/status/:user_id  - Inspect a user's timer");
    info!("  GET  /health                 - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    keeper.shutdown()?;
    info!("Server shutdown complete");
    Ok(())
}
