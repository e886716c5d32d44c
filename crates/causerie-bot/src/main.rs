//! Causerie entry point.
//!
//! Binary name: `causerie`
//!
//! Parses CLI arguments, initializes logging and application state, then
//! starts the Telegram long-polling loop. All secrets come from the
//! environment; nothing is compiled in.

mod bot;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[derive(Parser)]
#[command(
    name = "causerie",
    about = "Telegram bot relaying chat and voice questions to the Groq API",
    version
)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Data directory for config.toml and the credential store
    #[arg(long, env = "CAUSERIE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Telegram bot token
    #[arg(long, env = "CAUSERIE_TELEGRAM_TOKEN", hide_env_values = true)]
    telegram_token: String,

    /// API key for the speech-to-text service (empty for keyless deployments)
    #[arg(
        long,
        env = "CAUSERIE_STT_API_KEY",
        hide_env_values = true,
        default_value = ""
    )]
    stt_api_key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,causerie=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(causerie_infra::config::resolve_data_dir);
    let config = causerie_infra::config::load_config(&data_dir).await;
    tracing::info!(
        "model={}, language={}, data dir {}",
        config.model,
        config.language,
        data_dir.display()
    );

    let state = AppState::init(config, data_dir, cli.stt_api_key).await?;

    let bot = teloxide::Bot::new(cli.telegram_token);
    tracing::info!("starting long polling");
    bot::run(bot, state).await;

    Ok(())
}
