//! resumotube - Chapter-style summaries of YouTube videos
//!
//! Entry point for the resumotube CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resumotube::cli::{Cli, Commands};
use resumotube::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            resumotube::cli::completions::print(shell);
        }
        Commands::Transcript { url, output } => {
            resumotube::cli::commands::show_transcript(&url, output).await?;
        }
        command => {
            // Credentials are read fresh for every runtime command.
            let settings = Settings::load()?;

            match command {
                Commands::Summarize {
                    url,
                    provider,
                    supplement,
                    output,
                } => {
                    resumotube::cli::commands::summarize(
                        &settings,
                        &url,
                        &provider,
                        &supplement,
                        output,
                    )
                    .await?;
                }
                Commands::Doctor { json } => {
                    resumotube::cli::commands::run_doctor(&settings, json)?;
                }
                Commands::Config(config_cmd) => {
                    resumotube::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } | Commands::Transcript { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
