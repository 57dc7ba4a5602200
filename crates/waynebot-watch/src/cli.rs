use std::path::PathBuf;

use clap::Parser;
use waynebot_config::{LogLevel, WaynebotConfig};

const DEFAULT_DIRECTIVE: &str = "waynebot=info";

/// Follow a waynebot server's realtime event stream and log it.
#[derive(Parser, Debug)]
#[command(name = "waynebot-watch", version, about)]
pub struct Args {
    /// Server origin, e.g. https://chat.example.com.
    #[arg(short, long)]
    pub server: Option<String>,

    /// Bearer token used to request connection tickets.
    #[arg(long, env = "WAYNEBOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (e.g. `debug`, `waynebot_realtime=trace`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

impl Args {
    /// Command-line values win over the config file.
    pub fn apply_overrides(&self, config: &mut WaynebotConfig) {
        if let Some(server) = &self.server {
            config.server.base_url = server.clone();
        }
        if let Some(token) = &self.token {
            config.auth.token = Some(token.clone());
        }
    }

    /// Filter directive for the subscriber: `--log-level`, then the config
    /// file's level, then the default.
    pub fn log_directive(&self, configured: Option<LogLevel>) -> String {
        match (&self.log_level, configured) {
            (Some(level), _) if level.contains('=') => level.clone(),
            (Some(level), _) => format!("waynebot={level}"),
            (None, Some(level)) => format!("waynebot={}", level.as_str()),
            (None, None) => DEFAULT_DIRECTIVE.to_string(),
        }
    }
}
