//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::llm::Provider;
use crate::pipeline::{summarize_video, SummarizeRequest};
use crate::transcript::{self, YouTubeTranscripts};

/// Summarize a video and print or save the result
pub async fn summarize(
    settings: &Settings,
    url: &str,
    provider: &str,
    supplement: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let request = SummarizeRequest::new(url, provider, supplement)?;
    let source = YouTubeTranscripts::new();

    let summary = summarize_video(settings, &source, &request).await?;

    write_output(&summary, output.as_deref())
}

/// Print or save the flattened transcript of a video
pub async fn show_transcript(url: &str, output: Option<PathBuf>) -> Result<()> {
    let source = YouTubeTranscripts::new();
    let transcript = transcript::resolve(&source, url).await?;

    tracing::info!(
        "Transcript {} ({}{})",
        transcript.video_id,
        transcript.language_code,
        if transcript.is_generated {
            ", auto-generated"
        } else {
            ""
        }
    );

    write_output(&transcript.text, output.as_deref())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&settings.redacted())?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
        ConfigCommand::Set { key, value } => {
            let path = Settings::config_path()?;
            set_config_value(&path, &key, &value)?;
            println!("Updated {} in {}", key, path.display());
        }
    }

    Ok(())
}

/// Update one key in the config file at `path`.
///
/// Starts from the file contents rather than the runtime settings so that
/// environment overrides are never written to disk.
fn set_config_value(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut stored = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    } else {
        Settings::default()
    };

    stored.set(key, value)?;
    stored.save_to(path)
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    config_path: String,
    checks: Vec<DoctorCheck>,
    notes: Vec<String>,
}

/// Report which parts of the local setup are in place.
pub fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("resumotube doctor");
    println!("config: {}", report.config_path);
    println!();

    for check in &report.checks {
        println!("{:<10} {:<8} {}", check.name, check.status, check.detail);
    }

    if !report.notes.is_empty() {
        println!();
        for note in &report.notes {
            println!("{}", note);
        }
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> Result<DoctorReport> {
    let config_path = Settings::config_path()?;
    let mut notes = Vec::new();

    let mut checks = vec![DoctorCheck {
        name: "config",
        status: if config_path.exists() { "ok" } else { "missing" },
        detail: "persisted provider credentials".to_string(),
    }];

    for provider in [Provider::Gemini, Provider::OpenAi] {
        let configured = provider.api_key(&settings.credentials).is_ok();
        checks.push(DoctorCheck {
            name: if provider == Provider::Gemini {
                "gemini"
            } else {
                "openai"
            },
            status: if configured { "ok" } else { "missing" },
            detail: format!("{} API key (model {})", provider.name(), provider.model()),
        });
    }

    if checks.iter().skip(1).all(|c| c.status == "missing") {
        notes.push(
            "hint: run `resumotube config set credentials.gemini_api_key <KEY>` or export RESUMOTUBE_GEMINI_API_KEY."
                .to_string(),
        );
    }

    Ok(DoctorReport {
        config_path: config_path.display().to_string(),
        checks,
        notes,
    })
}

// Helper functions

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Saved to: {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}
