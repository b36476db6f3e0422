use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Watch for SIGINT or SIGTERM and broadcast a stop to the HTTP server.
///
/// Both signals stop the server right away; in-flight requests still finish
/// through axum's graceful shutdown. Returns the watcher task, a sender for
/// stopping programmatically, and the receiver the server listens on.
pub fn shutdown_signal_watcher(
) -> std::io::Result<(JoinHandle<()>, watch::Sender<()>, watch::Receiver<()>)> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let (stop_tx, stop_rx) = watch::channel(());
    let signal_tx = stop_tx.clone();

    let watcher = tokio::spawn(async move {
        let received = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        };
        tracing::info!(signal = received, "stopping storage API");
        let _ = signal_tx.send(());
    });

    Ok((watcher, stop_tx, stop_rx))
}

/// Route panics through `tracing` so they land in the log file too.
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| {
        let location = panic.location();
        tracing::error!(
            message = %panic,
            panic.file = location.map(|l| l.file()),
            panic.line = location.map(|l| l.line()),
        );
    }));
}

pub fn report_build_info() {
    tracing::info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        build_profile = if cfg!(debug_assertions) { "debug" } else { "release" },
        "service starting up"
    );
}
