use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brainbox_api::config::{self, AppConfig};
use brainbox_api::database::{collections, DocumentStore, MemoryStore, PgDocumentStore};
use brainbox_api::{app, is_production, AppState};

#[derive(Parser)]
#[command(name = "brainbox")]
#[command(about = "Brainbox API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Bind host (overrides HOST)")]
        host: Option<String>,

        #[arg(long, help = "Bind port (overrides PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Use the in-memory store instead of postgres")]
        memory: bool,
    },

    #[command(about = "Create collection tables and indexes, then exit")]
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("brainbox_api=info,brainbox=info,tower_http=info")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Brainbox API in {:?} mode", config.environment);

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        memory: false,
    }) {
        Commands::Serve { host, port, memory } => serve(config, host, port, memory).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    memory: bool,
) -> anyhow::Result<()> {
    let mut pg = None;
    let store: Arc<dyn DocumentStore> = if memory {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let store = PgDocumentStore::connect(&config.database)
            .await
            .context("failed to connect to postgres")?;
        if config.database.run_migrations {
            collections::bootstrap(store.pool())
                .await
                .context("failed to bootstrap collections")?;
        }
        pg = Some(store.clone());
        Arc::new(store)
    };

    if is_production!() && config.security.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS allows any origin in production");
    }

    let app = app(AppState::new(store), config);

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Brainbox server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(store) = pg {
        store.close().await;
    }
    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let store = PgDocumentStore::connect(&config.database)
        .await
        .context("failed to connect to postgres")?;
    collections::bootstrap(store.pool()).await?;
    store.close().await;
    tracing::info!("Migrations complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting shutdown"),
    }
}
