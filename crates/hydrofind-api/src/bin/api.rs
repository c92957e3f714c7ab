//! Standalone StatusAPI/Producer process binary. Bootstrap/shutdown shape
//! mirrors the Worker binary, grounded in
//! `tasker-orchestration/src/bin/server.rs`.

use std::sync::Arc;

use hydrofind_api::{router, AppState};
use hydrofind_broker::{Broker, RabbitBroker};
use hydrofind_shared::{logging, HydroConfig};
use hydrofind_store::RedisTaskStore;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing(std::env::var("LOG_FORMAT").as_deref() == Ok("json"));

    info!(version = env!("CARGO_PKG_VERSION"), "starting hydrofind api");

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

    let state = Arc::new(AppState {
        broker,
        store: Box::new(store),
        cache_short_circuit_enabled: config.features.cache_short_circuit_enabled,
        reclaim_after_secs: config.worker.processing_timeout_secs as i64,
    });

    let app = router(state);
    let listener = TcpListener::bind(config.api.socket_addr()).await?;
    info!(addr = %config.api.socket_addr(), "api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("api shutdown complete");
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
