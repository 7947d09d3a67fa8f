use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tax_chat::prompt::SystemPrompt;
use tax_chat::provider::{ProviderRegistry, ProviderSettings};
use tax_chat::{AppState, ChatConfig, app};

/// Serve the chat proxy endpoint (`POST /api/chatbot`).
///
/// The provider API key is read from MISTRAL_API_KEY or GEMINI_API_KEY.
#[derive(Parser, Debug)]
#[command(name = "tax-chat")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the config file
    #[arg(long)]
    bind: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = ChatConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    let system_prompt =
        SystemPrompt::load(&config.knowledge_base_path).context("Failed to load knowledge base")?;

    let settings = ProviderSettings::from_config(&config);
    if settings.api_key.is_none() {
        warn!(
            provider = %settings.name,
            "no API key in the environment; chat requests will fail until one is set"
        );
    }
    let provider = ProviderRegistry::with_builtin()
        .create(&settings)
        .context("Failed to create chat provider")?;

    let allowed_origin = HeaderValue::from_str(&config.allowed_origin)
        .with_context(|| format!("Invalid allowed_origin: {}", config.allowed_origin))?;

    let state = Arc::new(AppState {
        provider,
        system_prompt,
        max_history_turns: config.max_history_turns,
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!(
        address = %listener.local_addr()?,
        provider = %settings.name,
        model = %config.model,
        origin = %config.allowed_origin,
        "listening"
    );

    axum::serve(listener, app(state, allowed_origin))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
