use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use icebreaker::api::{create_router, AppState};
use icebreaker::config::Config;
use icebreaker::llm::LlmProvider;

#[derive(Parser)]
#[command(name = "icebreaker")]
#[command(about = "Profile-aware outreach relay with caching and request deduplication")]
struct Args {
    /// Override the listen port from ICEBREAKER_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "icebreaker=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if config.server.api_secret.is_none() {
        tracing::warn!(
            "API_SECRET_KEY is not set - /api/* routes are open. Set API_SECRET_KEY to require the X-API-Secret header."
        );
    }

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable - message customization will fail until LLM_MODEL is configured");
    }

    tracing::info!(
        "Message cache: {} entries, {}s TTL",
        config.cache.max_entries,
        config.cache.ttl_secs
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, llm);
    let app = create_router(state);

    tracing::info!("Icebreaker starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  Customize:    http://{}/api/customize-message", addr);
    tracing::info!("  Parse:        http://{}/api/parse-profile", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
