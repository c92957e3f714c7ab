//! Standalone Worker process binary. Grounded in
//! `tasker-orchestration/src/bin/server.rs`'s bootstrap/shutdown shape:
//! init logging, load config, wire up the concrete backends, then run until
//! Ctrl+C/SIGTERM.

use hydrofind_artifact::ArtifactBuilder;
use hydrofind_broker::{Broker, RabbitBroker};
use hydrofind_catalog::CatalogAdapter;
use hydrofind_llm::{LlmGateway, OracleClient};
use hydrofind_shared::{logging, HydroConfig};
use hydrofind_store::{RedisTaskStore, TaskStoreClient};
use hydrofind_worker::Worker;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing(std::env::var("LOG_FORMAT").as_deref() == Ok("json"));

    info!(version = env!("CARGO_PKG_VERSION"), "starting hydrofind worker");

    let config = match HydroConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let rabbit = match RabbitBroker::connect(&config.broker.amqp_uri(), &config.broker.queue, config.worker.prefetch).await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "broker unreachable at startup");
            std::process::exit(1);
        }
    };
    let broker = Broker::rabbit(rabbit);

    let store = match RedisTaskStore::connect(
        &config.store.redis_url(),
        config.ttl.task_ttl_secs,
        config.ttl.search_cache_ttl_secs,
        config.ttl.artifact_ttl_secs,
    )
    .await
    {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "task store unreachable at startup");
            std::process::exit(1);
        }
    };
    let store: Box<dyn TaskStoreClient> = Box::new(store);
    let store: &'static dyn TaskStoreClient = Box::leak(store);

    let pool = match PgPoolOptions::new().connect(&config.catalog.database_url).await {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "catalog database unreachable at startup");
            std::process::exit(1);
        }
    };
    let catalog = CatalogAdapter::new(pool);

    let oracle = OracleClient::new(
        config.oracle.base_url.clone(),
        config.oracle.api_key.clone(),
        config.oracle.model_name.clone(),
        config.oracle.timeout_secs,
        config.oracle.max_tokens,
    );
    let llm = LlmGateway::new(oracle);

    let worker = Worker {
        broker: &broker,
        llm: &llm,
        catalog: &catalog,
        store,
        artifact_builder: ArtifactBuilder::default(),
        max_retries: config.worker.max_retries,
        partial_results_enabled: config.worker.partial_results_enabled,
    };

    info!("worker started, press Ctrl+C to shutdown gracefully");

    tokio::select! {
        result = worker.run_forever() => {
            if let Err(e) = result {
                error!(error = %e, "worker loop exited unrecoverably");
            }
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    info!("worker shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { info!("received Ctrl+C"); }
        _ = terminate => { info!("received SIGTERM"); }
    }
}
