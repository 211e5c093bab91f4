//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// resumotube - Chapter-style summaries of YouTube videos
#[derive(Parser, Debug)]
#[command(name = "resumotube")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a YouTube video from its transcript
    Summarize {
        /// Video URL (watch, youtu.be, embed or shorts link)
        url: String,

        /// Summary provider (gemini, openai)
        #[arg(short, long, default_value = "gemini")]
        provider: String,

        /// Extra directive appended to the summary instructions
        #[arg(short, long, default_value = "")]
        supplement: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the flattened transcript of a YouTube video
    Transcript {
        /// Video URL
        url: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check which provider credentials are configured
    Doctor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration (API keys masked)
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., credentials.gemini_api_key)
        key: String,

        /// Value to set
        value: String,
    },
}
