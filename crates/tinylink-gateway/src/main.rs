use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tinylink_core::{Clock, Repository, Shortener, SystemClock};
use tinylink_gateway::cli::{GeneratorArg, StorageBackendArg, CLI};
use tinylink_gateway::telemetry::init_tracing;
use tinylink_gateway::{App, AppState};
use tinylink_generator::{
    Generator, HashGenerator, HashGeneratorSettings, RandomGenerator, RandomGeneratorSettings,
};
use tinylink_shortener::ShortenerService;
use tinylink_storage::{InMemoryRepository, SqliteRepository};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        generator = %config.generator,
        code_bytes = config.code_bytes,
        max_attempts = config.max_attempts,
        "starting tinylink gateway"
    );

    let shortener = match config.storage {
        StorageBackendArg::InMemory => build_shortener(&config, InMemoryRepository::new()),
        StorageBackendArg::Sqlite => {
            let sqlite_url = config
                .sqlite_url
                .as_deref()
                .context("sqlite url is required when storage backend is sqlite")?;
            let repository = SqliteRepository::connect(sqlite_url)
                .await
                .with_context(|| format!("failed to open sqlite database {sqlite_url}"))?;
            build_shortener(&config, repository)
        }
    };

    let router = App::router(AppState::new(shortener));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening for HTTP traffic");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn build_shortener<R: Repository>(config: &CLI, repository: R) -> Arc<dyn Shortener> {
    let code_bytes = usize::from(config.code_bytes);
    match config.generator {
        GeneratorArg::Random => {
            let settings = RandomGeneratorSettings::builder()
                .code_bytes(code_bytes)
                .build();
            build_service(config, repository, RandomGenerator::new(settings))
        }
        GeneratorArg::Hash => {
            let settings = HashGeneratorSettings::builder()
                .code_bytes(code_bytes)
                .salt(config.hash_salt.clone())
                .build();
            build_service(config, repository, HashGenerator::new(settings))
        }
    }
}

fn build_service<R: Repository, G: Generator>(
    config: &CLI,
    repository: R,
    generator: G,
) -> Arc<dyn Shortener> {
    let service =
        ShortenerService::new(repository, generator).with_max_attempts(config.max_attempts);

    if config.purge_interval_secs > 0 {
        spawn_purge_task(
            Arc::clone(service.repository()),
            Duration::from_secs(config.purge_interval_secs),
        );
    }

    Arc::new(service)
}

/// Periodically drops expired links so the store does not grow forever.
fn spawn_purge_task<R: Repository>(repository: Arc<R>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match repository.purge_expired(SystemClock.now()).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "purged expired short links"),
                Err(err) => warn!(error = %err, "failed to purge expired short links"),
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
