use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{info, warn};

use learnhub::logging::{init_tracing, shutdown_tracer};
use learnhub::metrics::{init_metrics, metrics_app};
use learnhub::router::init_router;
use learnhub::state::{DataBackend, init_app_state};

#[derive(Debug, Parser)]
#[command(name = "learnhub", version, about = "LearnHub API server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Where business rows are kept
    #[arg(long, env = "DATA_BACKEND", value_enum, default_value_t = DataBackend::Postgrest)]
    data_backend: DataBackend,

    /// Port of the Prometheus scrape endpoint
    #[arg(long, env = "METRICS_PORT", default_value_t = 9090)]
    metrics_port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    init_tracing()?;

    if let Some(handle) = init_metrics()? {
        let metrics_addr = format!("{}:{}", args.host, args.metrics_port);
        let listener = tokio::net::TcpListener::bind(&metrics_addr)
            .await
            .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
        info!(addr = %metrics_addr, "Metrics endpoint listening");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                warn!(error = %e, "metrics server stopped");
            }
        });
    }

    let state = init_app_state(args.data_backend)?;
    info!(
        provider = state.provider.name(),
        store = state.store.name(),
        "Application state initialized"
    );
    let app = init_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("🚀 Server running on http://{}", addr);
    info!("📖 Scalar UI available at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;

    shutdown_tracer().await;
    Ok(())
}
