//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::manager::ManagerConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-keeper")]
#[command(about = "A per-user pomodoro timer service driven by slash commands")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, env = "POMODORO_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "POMODORO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Timer length in minutes used when a start command gives none
    #[arg(
        short,
        long,
        env = "POMODORO_DEFAULT_MINUTES",
        default_value = "25",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub default_minutes: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn default_duration(&self) -> Duration {
        Duration::from_secs(self.default_minutes * 60)
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            default_duration: self.default_duration(),
        }
    }
}
