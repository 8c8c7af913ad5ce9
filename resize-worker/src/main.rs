use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use resize_worker::health;
use resize_worker::types::environment::Environment;
use resize_worker::worker::ResizeWorker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Get environment
    let env = Environment::from_env();
    info!("Starting resize worker in {:?} environment", env);

    // Create and start the worker
    match ResizeWorker::new(env).await {
        Ok(worker) => {
            // Get shutdown token for signal handling
            let shutdown_token = worker.shutdown_token();

            // Start health check server
            let health_shutdown = shutdown_token.clone();
            tokio::spawn(async move {
                if let Err(e) = health::start_health_server(health_shutdown).await {
                    error!("Health server error: {}", e);
                }
            });

            // Spawn signal handler
            let signal_shutdown = shutdown_token.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Received Ctrl+C, initiating graceful shutdown...");
                        signal_shutdown.cancel();
                    }
                    Err(e) => {
                        error!("Failed to listen for Ctrl+C: {}", e);
                    }
                }
            });

            // Run the worker
            if let Err(e) = worker.start().await {
                error!("Worker error: {}", e);
                return Err(e);
            }
        }
        Err(e) => {
            error!("Failed to create worker: {}", e);
            return Err(e);
        }
    }

    info!("Resize worker stopped");
    Ok(())
}
