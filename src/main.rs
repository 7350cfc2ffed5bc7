use anyhow::Result;
use clap::Parser;
use voicechat::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Console logging follows RUST_LOG, falling back to info-level output;
    // --debug raises the floor regardless of the environment
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    voicechat::run(args).await
}
