use clap::Parser;
use std::path::PathBuf;

use crate::settings::ServerEnv;

#[derive(Parser, Debug, Clone)]
#[command(name = "voicechat", about = "voicechat - terminal client for the Vocab Assist voice agent")]
pub struct CliArgs {
    /// Backend base URL (overrides --env and VOICECHAT_SERVER)
    #[arg(long)]
    pub server: Option<String>,

    /// Named backend environment to talk to
    #[arg(long, value_enum, default_value_t = ServerEnv::Local)]
    pub env: ServerEnv,

    /// Input device name (defaults to the system default microphone)
    #[arg(long)]
    pub device: Option<String>,

    /// List available input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Send a prerecorded WAV file instead of recording, then exit
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Skip fetching the greeting on startup
    #[arg(long)]
    pub no_greet: bool,

    /// Do not play synthesized speech for agent responses
    #[arg(long)]
    pub mute: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Enable debug mode with verbose logging
    #[arg(long)]
    pub debug: bool,
}
