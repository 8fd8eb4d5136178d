#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;
mod terminal;

use bookchat_config::Config;
use clap::{Parser, Subcommand};
use command::{
    ChatInput, ChatStrategy, CommandStrategy, HealthStrategy, InfoStrategy, InitStrategy,
    VersionStrategy,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "bookchat")]
#[command(about = "Ask questions about the book from your terminal", long_about = None)]
struct Cli {
    /// Backend base URL; overrides the config file and RAG_CHATBOT_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the assistant in the terminal
    Chat {
        /// Ask a single question and exit
        #[arg(short = 'm', long)]
        message: Option<String>,
    },
    /// Probe the backend's /health endpoint
    Health,
    /// Show the resolved configuration
    Info,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

/// Logs go to stderr so they never interleave with the transcript.
fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load();
    let level = config
        .as_ref()
        .map_or("info", |config| config.logging.level.as_str());
    init_tracing(level)?;

    match cli.command {
        Commands::Chat { message } => {
            ChatStrategy
                .execute(ChatInput {
                    config: config?,
                    api_url: cli.api_url,
                    message,
                })
                .await
        }
        Commands::Health => HealthStrategy.execute((config?, cli.api_url)).await,
        Commands::Info => InfoStrategy.execute((config?, cli.api_url)).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
