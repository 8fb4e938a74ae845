use clap::{Parser, Subcommand};
use inferd::api::{create_router, AppState};
use inferd::config::AppConfig;
use inferd::error::Result;
use inferd::loader;
use inferd::model::Model;
use inferd::serving::{InferenceMetrics, ServiceState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inferd", about = "Single-model classification serving service")]
struct Cli {
    /// Configuration directory
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the model and serve predictions (default)
    Serve,
    /// Print the metadata of a snapshot bundle without serving
    Inspect {
        /// Path to the snapshot bundle
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = AppConfig::load_from(&cli.config_dir)?;
            init_logging(&config);

            if let Err(errors) = config.validate() {
                for e in &errors {
                    warn!("config: {}", e);
                }
                return Err(inferd::InferdError::Internal(
                    "invalid configuration".to_string(),
                ));
            }

            run_serve(config).await
        }
        Commands::Inspect { path } => {
            init_logging_simple();
            run_inspect(&path)
        }
    }
}

async fn run_serve(config: AppConfig) -> Result<()> {
    let service = Arc::new(ServiceState::new());
    let metrics = Arc::new(InferenceMetrics::new());

    // Model resolution happens once, before the listener accepts traffic.
    // A failed load leaves the service up but not ready.
    match loader::resolve(&config).await {
        Some(artifact) => service.install(artifact).await,
        None => warn!("no model available; serving in unloaded state"),
    }

    let state = AppState::new(Arc::clone(&service), metrics);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| inferd::InferdError::Internal(format!("invalid bind address: {e}")))?;
    info!("Starting inference server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| inferd::InferdError::Internal(format!("Server error: {}", e)))?;

    service.teardown().await;
    info!("Shutdown complete");
    Ok(())
}

fn run_inspect(path: &std::path::Path) -> Result<()> {
    let artifact = loader::snapshot::load(path)?;
    let info = artifact.describe();
    println!("name:      {}", info.name);
    println!("version:   {}", info.version);
    println!("framework: {}", info.framework);
    println!("features:  {}", info.features.join(", "));
    println!("classes:   {}", info.classes.join(", "));
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn init_logging_simple() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
