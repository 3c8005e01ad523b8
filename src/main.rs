mod commands;
mod gateway;

use clap::{Parser, Subcommand};
use remi_agent::{AgentExecutor, PromptBuilder, ReminderTool};
use remi_channels::LineChannel;
use remi_core::{
    config,
    reminder::DRY_RUN_OWNER,
    traits::{Channel, Provider, ReminderStore},
};
use remi_memory::Store;
use remi_providers::OpenAiProvider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "remi", version, about = "Remi — chat reminder agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the reminder agent.
    Start,
    /// Check configuration and provider availability.
    Status,
    /// Run one reasoning session from the terminal, without persisting.
    Ask {
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.remi.log_level)),
        )
        .init();

    if !std::path::Path::new(&cli.config).exists() {
        tracing::warn!("config file {} not found, using defaults", cli.config);
    }

    match cli.command {
        Commands::Start => {
            let provider = build_provider(&cfg)?;

            if !provider.is_available().await {
                anyhow::bail!("provider '{}' is not available", provider.name());
            }

            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();

            if let Some(ref line) = cfg.channel.line {
                if line.enabled {
                    if line.channel_access_token.is_empty() {
                        anyhow::bail!(
                            "LINE is enabled but channel_access_token is empty. \
                             Set it in config.toml."
                        );
                    }
                    channels.insert("line".to_string(), Arc::new(LineChannel::new(line.clone())));
                }
            }

            if channels.is_empty() {
                anyhow::bail!("No channels enabled. Enable at least one channel in config.toml.");
            }

            let store = Store::new(&cfg.memory).await?;

            println!("Remi — starting agent...");
            let gw = Arc::new(gateway::Gateway::new(
                provider,
                channels,
                store,
                cfg.agent.clone(),
                cfg.scheduler.clone(),
            ));
            gw.run().await?;
        }
        Commands::Status => {
            println!("Remi — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Default provider: {}", cfg.provider.default);
            println!();

            let provider = build_provider(&cfg)?;
            println!(
                "  {}: {}",
                provider.name(),
                if provider.is_available().await {
                    "available"
                } else {
                    "not available"
                }
            );
            println!();

            if let Some(ref line) = cfg.channel.line {
                println!(
                    "  line: {}",
                    if line.enabled && !line.channel_access_token.is_empty() {
                        "configured"
                    } else if line.enabled {
                        "enabled but missing channel_access_token"
                    } else {
                        "disabled"
                    }
                );
            } else {
                println!("  line: not configured");
            }

            println!();
            println!("Database: {}", cfg.memory.db_path);
            println!(
                "Scheduler: {} (every {}s via '{}')",
                if cfg.scheduler.enabled { "enabled" } else { "disabled" },
                cfg.scheduler.poll_interval_secs,
                cfg.scheduler.channel,
            );
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: remi ask <message>");
            }
            let input = message.join(" ");

            let provider = build_provider(&cfg)?;
            if !provider.is_available().await {
                anyhow::bail!("provider '{}' is not available", provider.name());
            }

            // Dry-run owner: the tool confirms but nothing is persisted.
            let store = Store::new(&cfg.memory).await?;
            let tool = Arc::new(ReminderTool::new(
                DRY_RUN_OWNER,
                Arc::new(store) as Arc<dyn ReminderStore>,
            ));
            let executor = AgentExecutor::new(
                provider,
                vec![tool],
                PromptBuilder::new(&cfg.agent.tone_of_voice),
                cfg.agent.max_steps,
                Duration::from_secs(cfg.agent.model_timeout_secs),
            )?;

            let answer = executor.run(&input).await?;
            println!("{answer}");
        }
    }

    Ok(())
}

/// Build the configured provider.
fn build_provider(cfg: &config::Config) -> anyhow::Result<Arc<dyn Provider>> {
    match cfg.provider.default.as_str() {
        "openai" => {
            let oa = cfg.provider.openai.as_ref().cloned().unwrap_or_default();
            Ok(Arc::new(OpenAiProvider::from_config(&oa)))
        }
        other => anyhow::bail!("unsupported provider: {other}"),
    }
}
