//! CyberQuest HTTP service.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cyberquest::{
    AppConfig, AuthContext, Backend, Cli, Command, PlayManager, ProgressService, SupabaseBackend,
    server, spawn_profile_bootstrap,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cyberquest=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host, config } => {
            let mut app_config = AppConfig::from_env();
            if let Some(path) = config {
                app_config = app_config.with_file(path)?;
            }
            run_server(app_config.with_bind(host, port)).await
        }
    }
}

/// Serves the JSON API until the process is stopped.
async fn run_server(config: AppConfig) -> Result<()> {
    if config.uses_placeholders() {
        warn!("Running with placeholder backend credentials; backend calls will fail");
    }

    let backend: Arc<dyn Backend> = Arc::new(SupabaseBackend::new(&config));
    let auth = AuthContext::new(backend.clone());
    let progress = ProgressService::new(backend.clone(), auth.clone());
    let _bootstrap = spawn_profile_bootstrap(&auth, progress.clone());
    let play = PlayManager::new(progress.clone());

    let state = server::AppState::from_parts(backend, auth, progress, play);
    let app = server::router(state);

    let addr = format!("{}:{}", config.host(), config.port());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "CyberQuest listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
