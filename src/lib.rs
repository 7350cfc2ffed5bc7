pub mod api;
pub mod audio_toolkit;
pub mod cli;
pub mod playback;
pub mod session;
pub mod settings;
pub mod transcript;

pub use cli::CliArgs;

use anyhow::Result;
use log::info;

use crate::api::ApiClient;
use crate::session::ConversationSession;
use crate::settings::Settings;

pub async fn run(args: CliArgs) -> Result<()> {
    if args.list_devices {
        for name in audio_toolkit::list_input_devices()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let settings = Settings::from_args(&args);
    info!("Using backend at {}", settings.base_url);

    let client = ApiClient::new(&settings.base_url, settings.timeout)?;
    let mut session = ConversationSession::new(client, settings);

    match args.input {
        Some(path) => session.run_file(&path).await,
        None => session.run().await,
    }
}
