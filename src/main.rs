use campaign_sync_service::sync::funds::FundReconcileJob;
use campaign_sync_service::sync::ingest::IngestJob;
use campaign_sync_service::sync::issuance::TokenIssuanceJob;
use campaign_sync_service::{config::Config, db, scheduler, state::AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting campaign-sync-service");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        "Configuration loaded: program {}, rpc {}",
        config.program_id,
        config.solana_rpc_url
    );

    // Setup database connection
    let db_pool = db::connection::establish_connection(&config.database_url).await?;
    sqlx::query("SELECT 1").execute(&db_pool).await?;
    tracing::info!("Database connection established");

    // Shared dependencies, one instance per process
    let state = Arc::new(AppState::new(config.clone(), db_pool)?);

    let shutdown = CancellationToken::new();

    // Ingest + status reconciliation + claim automation
    let ingest_job = Arc::new(IngestJob::new(state.clone()));
    let ingest_handle = {
        let job = ingest_job.clone();
        let token = shutdown.clone();
        let period = state.config.ingest_interval;
        tokio::spawn(async move {
            scheduler::run_job("ingest", period, Duration::ZERO, token, || {
                let job = job.clone();
                async move { job.run().await }
            })
            .await;
        })
    };

    // Token issuance
    let issuance_job = Arc::new(TokenIssuanceJob::new(state.clone()));
    let issuance_handle = {
        let job = issuance_job.clone();
        let token = shutdown.clone();
        let period = state.config.issuance_interval;
        tokio::spawn(async move {
            scheduler::run_job("issuance", period, Duration::ZERO, token, || {
                let job = job.clone();
                async move { job.run().await }
            })
            .await;
        })
    };

    // Fund reconciliation, staggered to reduce initial contention
    let fund_job = Arc::new(FundReconcileJob::new(state.clone()));
    let fund_handle = {
        let job = fund_job.clone();
        let token = shutdown.clone();
        let period = state.config.fund_interval;
        let delay = state.config.fund_start_delay;
        tokio::spawn(async move {
            scheduler::run_job("fund-reconcile", period, delay, token, || {
                let job = job.clone();
                async move { job.run().await }
            })
            .await;
        })
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    shutdown.cancel();

    let _ = ingest_handle.await;
    let _ = issuance_handle.await;
    let _ = fund_handle.await;

    tracing::info!("campaign-sync-service stopped");
    Ok(())
}
