pub mod utils;

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

use crate::http_server;
use crate::{ServiceConfig, ServiceState, StateSetupError};

/// Handle for gracefully shutting down the mock server.
pub struct ShutdownHandle {
    graceful_waiter: tokio::task::JoinHandle<()>,
    server: tokio::task::JoinHandle<Result<(), http_server::HttpServerError>>,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Block until the server stops (via signal or explicit shutdown).
    pub async fn wait(self) -> Result<(), ServiceError> {
        let mut server = self.server;

        // The server can also stop on its own, e.g. when the bind fails
        tokio::select! {
            result = &mut server => return flatten(result),
            _ = self.graceful_waiter => {}
        }

        match timeout(FINAL_SHUTDOWN_TIMEOUT, server).await {
            Ok(result) => flatten(result),
            Err(_) => {
                tracing::error!(
                    "Failed to shut down within {} seconds",
                    FINAL_SHUTDOWN_TIMEOUT.as_secs()
                );
                Err(ServiceError::ShutdownTimeout(FINAL_SHUTDOWN_TIMEOUT))
            }
        }
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

fn flatten(
    result: Result<Result<(), http_server::HttpServerError>, tokio::task::JoinError>,
) -> Result<(), ServiceError> {
    match result {
        Ok(inner) => inner.map_err(ServiceError::from),
        Err(e) => Err(ServiceError::Join(e)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to set up service state: {0}")]
    State(#[from] StateSetupError),
    #[error("failed to install signal handlers: {0}")]
    Signal(std::io::Error),
    #[error("http server error: {0}")]
    Http(#[from] http_server::HttpServerError),
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("failed to shut down within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Initialize logging and the panic handler.
/// Returns guards that must be kept alive for the duration of the program.
pub fn init_logging(
    service_config: &ServiceConfig,
) -> Vec<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::fmt::format::FmtSpan;

    let mut guards = Vec::new();

    // Stdout layer
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);

    let stdout_env_filter = EnvFilter::builder()
        .with_default_directive(service_config.log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(stdout_env_filter);

    // File layer (if log_dir is set)
    if let Some(log_dir) = &service_config.log_dir {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
        }

        let file_appender = tracing_appender::rolling::daily(log_dir, "gcs-mock.log");
        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        guards.push(file_guard);

        let file_env_filter = EnvFilter::builder()
            .with_default_directive(service_config.log_level.into())
            .from_env_lossy();

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(file_env_filter);

        tracing_subscriber::registry()
            .with(stdout_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry().with(stdout_layer).init();
    }

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

/// Preload state and spawn the storage API server.
///
/// The manifest is fully loaded before the listener is bound; a preload
/// failure is returned and nothing is served.
pub async fn start_service(
    service_config: &ServiceConfig,
) -> Result<(ServiceState, ShutdownHandle), ServiceError> {
    let state = ServiceState::from_config(service_config).map_err(|e| {
        tracing::error!("error creating server state: {}", e);
        e
    })?;

    let (graceful_waiter, shutdown_tx, shutdown_rx) =
        utils::shutdown_signal_watcher().map_err(ServiceError::Signal)?;

    let http_config =
        http_server::Config::new(service_config.listen_addr, service_config.log_level);
    let http_state = state.clone();
    let server = tokio::spawn(async move {
        let result = http_server::run(http_config, http_state, shutdown_rx).await;
        if let Err(e) = &result {
            tracing::error!("storage API server error: {}", e);
        }
        result
    });

    tracing::info!(addr = %service_config.listen_addr, "Running: storage API");

    let handle = ShutdownHandle {
        graceful_waiter,
        server,
        shutdown_tx,
    };

    Ok((state, handle))
}

/// Spawns the mock server and blocks until it shuts down. Use for CLI binary usage.
pub async fn spawn_service(service_config: &ServiceConfig) -> Result<(), ServiceError> {
    let _guards = init_logging(service_config);
    let (_, handle) = start_service(service_config).await?;
    handle.wait().await
}
