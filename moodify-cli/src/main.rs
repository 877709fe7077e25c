//! CLI entry point for moodify

use anyhow::Result;
use axum::Router;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use moodify_agent::emotion::PolarityScores;
use moodify_agent::{classifier_from_config, ConversationOrchestrator, EmotionClassifier};
use moodify_core::config::schema::{EmotionStrategy, GatewayMode};
use moodify_core::config::{Config, ConfigLoader};
use moodify_core::keepalive::KeepAliveProbe;
use moodify_core::logging::init_logging;
use moodify_manager::{chat_router, relay_router, run_server, AppState, RelayState};
use moodify_providers::{gateway_from_config, CompletionGateway, ProviderClient, RelayClient};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "moodify")]
#[command(about = "Emotion-aware chat front-end and LLM relay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the chat front-end
    Serve {
        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the completion relay
    Relay {
        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Classify the emotion of a message
    Classify {
        /// Text to classify
        text: String,
        /// Classifier to use instead of the configured one
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,
    },
    /// Show configuration and upstream status
    Status {
        /// Ping the relay's keep-alive endpoint once
        #[arg(long)]
        ping: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Lexical,
    Hosted,
}

impl From<StrategyArg> for EmotionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Lexical => EmotionStrategy::Lexical,
            StrategyArg::Hosted => EmotionStrategy::Hosted,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_loader = if let Some(dir) = cli.config_dir {
        ConfigLoader::with_dir(dir)
    } else {
        ConfigLoader::new()
    };
    let mut config = config_loader.load()?;
    let _log_guard = init_logging(&config.logging);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting chat front-end");
            run_serve(config).await?;
        }
        Commands::Relay { port } => {
            if let Some(port) = port {
                config.relay.port = port;
            }
            info!("Starting relay");
            run_relay(config).await?;
        }
        Commands::Classify { text, strategy } => {
            run_classify(config, &text, strategy).await?;
        }
        Commands::Status { ping } => {
            run_status(&config_loader, &config, ping).await?;
        }
    }

    Ok(())
}

/// Keep-alive probe for the front-end.
///
/// In direct mode there is no relay to keep warm unless a URL is configured.
fn build_keepalive(config: &Config) -> Option<KeepAliveProbe> {
    let has_target = config.gateway.mode == GatewayMode::Relay || config.keepalive.url.is_some();
    if !has_target {
        return None;
    }
    let target =
        RelayClient::from_config(&config.gateway).with_keepalive_url(config.keepalive_url());
    Some(KeepAliveProbe::new(Arc::new(target), config.keepalive.clone()))
}

async fn run_serve(config: Config) -> Result<()> {
    // Fails before binding when direct mode has no provider key.
    let gateway = gateway_from_config(&config)?;
    let orchestrator = Arc::new(ConversationOrchestrator::from_config(&config, gateway.clone()));

    println!("{}", style("Starting Moodify...").bold().cyan());
    println!("Completion endpoint: {}", gateway.endpoint());
    println!(
        "Emotion: {}",
        orchestrator.classifier_name().unwrap_or("disabled")
    );

    let probe = build_keepalive(&config);
    if let Some(probe) = &probe {
        probe.start().await;
    }

    let app = chat_router(AppState::new(orchestrator));
    let result = serve_until_shutdown(app, config.server.host.clone(), config.server.port).await;

    if let Some(probe) = &probe {
        probe.stop().await;
    }
    result
}

async fn run_relay(config: Config) -> Result<()> {
    let provider = ProviderClient::from_config(&config.relay)?;

    println!("{}", style("Starting Moodify relay...").bold().cyan());
    println!("Provider: {}", config.relay.provider_url);
    println!("Model: {}", config.relay.model);

    let app = relay_router(RelayState::new(Arc::new(provider)));
    serve_until_shutdown(app, config.relay.host.clone(), config.relay.port).await
}

async fn serve_until_shutdown(app: Router, host: String, port: u16) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let mut server: JoinHandle<Result<()>> =
        tokio::spawn(async move { run_server(app, &host, port, shutdown_rx).await });

    println!(
        "\n{}",
        style("Server is running. Press Ctrl+C to stop.").green()
    );

    tokio::select! {
        joined = &mut server => {
            // The server stopped on its own, most likely a bind failure.
            return joined?;
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("Failed to listen for shutdown signal: {}", e);
            }
        }
    }

    println!("\n{}", style("Shutting down...").yellow());
    let _ = shutdown_tx.send(());
    server.await??;
    Ok(())
}

async fn run_classify(mut config: Config, text: &str, strategy: Option<StrategyArg>) -> Result<()> {
    config.emotion.enabled = true;
    if let Some(strategy) = strategy {
        config.emotion.strategy = strategy.into();
    }

    let Some(classifier) = classifier_from_config(&config.emotion) else {
        anyhow::bail!("emotion classification is disabled");
    };
    let result = classifier.classify(text).await;

    println!(
        "{} {}",
        style(&result.label).bold(),
        result.emoji()
    );
    if let Some(confidence) = result.confidence {
        println!("Confidence: {:.2}", confidence);
    }
    if config.emotion.strategy == EmotionStrategy::Lexical {
        let scores = PolarityScores::of(text);
        println!(
            "Polarity: positive {:.3}, neutral {:.3}, negative {:.3}",
            scores.positive, scores.neutral, scores.negative
        );
    }
    Ok(())
}

async fn run_status(loader: &ConfigLoader, config: &Config, ping: bool) -> Result<()> {
    println!("{}", style("Moodify Status").bold().cyan());
    println!("Version: {}\n", env!("CARGO_PKG_VERSION"));

    println!("{}", style("Configuration:").bold());
    println!("  Config file: {}", loader.config_path().display());
    println!(
        "  Front-end: {}:{}",
        config.server.host, config.server.port
    );
    println!("  Relay: {}:{}", config.relay.host, config.relay.port);
    println!();

    println!("{}", style("Gateway:").bold());
    let mode = match config.gateway.mode {
        GatewayMode::Relay => format!("relay ({})", config.gateway.base_url),
        GatewayMode::Direct => format!("direct ({})", config.relay.provider_url),
    };
    println!("  Mode: {}", mode);
    let key_status = if config.provider_api_key().is_ok() {
        style("configured").green()
    } else {
        style("not configured").red()
    };
    println!("  Provider API key: {}", key_status);
    println!("  Model: {}", config.relay.model);
    println!();

    println!("{}", style("Conversation:").bold());
    println!("  History cap: {}", config.conversation.history_cap);
    println!("  Prompt mode: {:?}", config.conversation.prompt_mode);
    println!("  Clear policy: {:?}", config.conversation.clear_policy);
    let emotion = if config.emotion.enabled {
        style(format!("{:?}", config.emotion.strategy).to_lowercase()).green()
    } else {
        style("disabled".to_string()).dim()
    };
    println!("  Emotion: {}", emotion);
    println!();

    println!("{}", style("Keep-alive:").bold());
    match build_keepalive(config) {
        Some(probe) => {
            let status = probe.status().await;
            println!(
                "  Target: {} (every {}s, {})",
                status["target"].as_str().unwrap_or("-"),
                config.keepalive.interval_s,
                if config.keepalive.enabled { "enabled" } else { "disabled" }
            );
            if ping {
                match probe.trigger_now().await {
                    Ok(body) => println!("  Ping: {} {}", style("ok").green(), body.trim()),
                    Err(e) => println!("  Ping: {} {}", style("failed").red(), e),
                }
            }
        }
        None => println!("  {}", style("no target in direct mode").dim()),
    }

    Ok(())
}
