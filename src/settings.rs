//! Endpoint resolution and client settings.
//!
//! The backend URL resolution order: an explicit override wins, then the
//! `VOICECHAT_SERVER` environment variable, then the named environment's
//! well-known address.

use clap::ValueEnum;
use std::time::Duration;

use crate::cli::CliArgs;

pub const SERVER_ENV_VAR: &str = "VOICECHAT_SERVER";

const PRODUCTION_BASE_URL: &str = "http://27.111.72.61:5001";
const LOCAL_BASE_URL: &str = "http://127.0.0.1:5001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServerEnv {
    /// Production deployment
    Production,
    /// Local development server
    Local,
}

impl ServerEnv {
    fn base_url(self) -> &'static str {
        match self {
            ServerEnv::Production => PRODUCTION_BASE_URL,
            ServerEnv::Local => LOCAL_BASE_URL,
        }
    }
}

/// Pick the backend base URL: flag → env var → named environment.
/// Blank values are treated as unset; trailing slashes are trimmed.
pub fn resolve_base_url(flag: Option<&str>, env_var: Option<&str>, env: ServerEnv) -> String {
    let url = flag
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| env_var.map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| env.base_url());
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub device: Option<String>,
    pub no_greet: bool,
    pub mute: bool,
    pub timeout: Duration,
}

impl Settings {
    pub fn from_args(args: &CliArgs) -> Self {
        let env_override = std::env::var(SERVER_ENV_VAR).ok();
        Self {
            base_url: resolve_base_url(args.server.as_deref(), env_override.as_deref(), args.env),
            device: args.device.clone(),
            no_greet: args.no_greet,
            mute: args.mute,
            timeout: Duration::from_secs(args.timeout),
        }
    }
}
